use thiserror::Error;

/// Failures raised by repositories and security primitives, below the service layer.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A lookup by id, email or path found nothing.
    #[error("{0}")]
    RecordNotFound(String),

    /// Stored or submitted data could not be decoded or encoded.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A bearer token failed signature, expiry or claim checks.
    #[error("Credential rejected: {0}")]
    CredentialRejected(String),

    /// Storage or crypto failure the caller cannot fix.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn user_not_found(id: &str) -> Self {
        DomainError::RecordNotFound(format!("User not found: {}", id))
    }
}
