use thiserror::Error;

use crate::domain::errors::DomainError;

/// Service-level failures. Each variant maps onto one HTTP status in the presentation layer.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Request content the service refuses, such as a short password or an unknown role.
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Missing, expired or invalid credentials.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated, but the account lacks the role or state for the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// The message without the variant prefix, as shown to API clients.
    pub fn detail(&self) -> &str {
        match self {
            ApplicationError::Internal(msg)
            | ApplicationError::BadInput(msg)
            | ApplicationError::NotFound(msg)
            | ApplicationError::Unauthenticated(msg)
            | ApplicationError::Forbidden(msg) => msg,
        }
    }

    pub fn not_authorized() -> Self {
        ApplicationError::Forbidden("Not authorized".to_string())
    }
}

impl From<DomainError> for ApplicationError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::RecordNotFound(msg) => ApplicationError::NotFound(msg),
            DomainError::MalformedRecord(msg) => ApplicationError::BadInput(msg),
            DomainError::CredentialRejected(msg) => ApplicationError::Unauthenticated(msg),
            DomainError::Internal(msg) => ApplicationError::Internal(msg),
        }
    }
}
