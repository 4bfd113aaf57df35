use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::app::AppState;
use crate::application::dto::access_dto::{AccessRequestDto, AccessStatusDto};
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{AnyUser, ApiJson};
use crate::presentation::helpers::{log_request, map_api_error};

pub async fn request_access(
    State(app_state): State<Arc<AppState>>,
    AnyUser(user): AnyUser,
    ApiJson(dto): ApiJson<AccessRequestDto>,
) -> Result<Json<AccessStatusDto>, ApiError> {
    log_request("request_access");

    app_state
        .access_service
        .request_access(&user, dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to request access"))
}

pub async fn access_status(
    State(app_state): State<Arc<AppState>>,
    AnyUser(user): AnyUser,
) -> Result<Json<AccessStatusDto>, ApiError> {
    log_request("access_status");

    app_state
        .access_service
        .access_status(&user)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to get access status"))
}
