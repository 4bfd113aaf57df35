use crate::domain::errors::DomainError;
use crate::domain::models::audit::AuditLog;
use async_trait::async_trait;

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: &AuditLog) -> Result<(), DomainError>;
    /// All entries, newest first.
    async fn find_all(&self) -> Result<Vec<AuditLog>, DomainError>;
    async fn delete_by_user(&self, user_id: &str) -> Result<usize, DomainError>;
}
