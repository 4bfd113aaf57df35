use std::sync::Arc;

use crate::application::dto::admin_dto::AuditLogDto;
use crate::application::errors::ApplicationError;
use crate::domain::models::audit::AuditLog;
use crate::domain::repositories::audit_log_repository::AuditLogRepository;

/// How many entries the admin audit view returns.
pub const RECENT_AUDIT_LIMIT: usize = 100;

/// Records who did what. Writing an entry never fails the caller.
pub struct AuditService {
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl AuditService {
    pub fn new(audit_log_repository: Arc<dyn AuditLogRepository>) -> Self {
        Self {
            audit_log_repository,
        }
    }

    pub async fn log(&self, user_id: Option<&str>, action: &str, detail: impl Into<String>) {
        let entry = AuditLog::new(user_id.map(str::to_string), action, detail);
        if let Err(e) = self.audit_log_repository.append(&entry).await {
            tracing::error!("Failed to write audit log entry '{}': {}", action, e);
        }
    }

    /// Newest entries first, capped at [`RECENT_AUDIT_LIMIT`].
    pub async fn recent(&self) -> Result<Vec<AuditLogDto>, ApplicationError> {
        tracing::debug!("Listing recent audit logs");

        let logs = self.audit_log_repository.find_all().await?;
        Ok(logs
            .into_iter()
            .take(RECENT_AUDIT_LIMIT)
            .map(AuditLogDto::from)
            .collect())
    }

    /// All entries, newest first.
    pub async fn all(&self) -> Result<Vec<AuditLog>, ApplicationError> {
        Ok(self.audit_log_repository.find_all().await?)
    }

    pub async fn delete_for_user(&self, user_id: &str) -> Result<usize, ApplicationError> {
        Ok(self.audit_log_repository.delete_by_user(user_id).await?)
    }
}
