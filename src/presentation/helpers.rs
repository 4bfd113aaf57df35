use std::fmt::Display;

use crate::infrastructure::logging::logger;
use crate::presentation::errors::ApiError;

pub fn log_request(operation: impl AsRef<str>) {
    logger::debug(&format!("Request: {}", operation.as_ref()));
}

/// Logs `error` with `context` before turning it into an [`ApiError`].
pub fn map_api_error<E>(context: impl AsRef<str>) -> impl FnOnce(E) -> ApiError
where
    E: Display + Into<ApiError>,
{
    let context = context.as_ref().to_string();

    move |error| {
        logger::error(&format!("{}: {}", context, error));
        error.into()
    }
}
