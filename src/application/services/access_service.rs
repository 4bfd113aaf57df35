use std::sync::Arc;

use chrono::Utc;

use crate::application::dto::access_dto::{AccessRequestDto, AccessStatusDto};
use crate::application::errors::ApplicationError;
use crate::application::services::audit_service::AuditService;
use crate::domain::models::access::{AccessStatus, decide, latest_by_user};
use crate::domain::models::audit::ACTION_ACCESS_REQUEST;
use crate::domain::models::user::{Role, User};
use crate::domain::repositories::user_repository::UserRepository;

/// Self-service access requests for accounts waiting on admin approval.
pub struct AccessService {
    user_repository: Arc<dyn UserRepository>,
    audit_service: Arc<AuditService>,
}

impl AccessService {
    pub fn new(user_repository: Arc<dyn UserRepository>, audit_service: Arc<AuditService>) -> Self {
        Self {
            user_repository,
            audit_service,
        }
    }

    /// Files a request. Non-admin accounts are deactivated until an admin decides.
    pub async fn request_access(
        &self,
        user: &User,
        dto: AccessRequestDto,
    ) -> Result<AccessStatusDto, ApplicationError> {
        tracing::info!("Access requested by {}", user.id);

        let detail = dto
            .detail
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| format!("Requested access ({})", user.role));

        if user.role != Role::Admin {
            let mut stored = self.user_repository.find_by_id(&user.id).await?;
            stored.active = false;
            self.user_repository.update(&stored).await?;
        }

        self.audit_service
            .log(Some(&user.id), ACTION_ACCESS_REQUEST, detail)
            .await;

        Ok(AccessStatusDto {
            status: AccessStatus::Pending,
            requested_at: Some(Utc::now().to_rfc3339()),
            updated_at: None,
        })
    }

    pub async fn access_status(&self, user: &User) -> Result<AccessStatusDto, ApplicationError> {
        tracing::debug!("Checking access status for {}", user.id);

        if user.role == Role::Admin {
            return Ok(AccessStatusDto::bare(AccessStatus::Approved));
        }

        let logs = self.audit_service.all().await?;
        let latest = latest_by_user(&logs);
        let decision = latest
            .get(&user.id)
            .and_then(|log| decide(log, Utc::now()));

        Ok(match decision {
            Some(decision) => {
                let at = Some(decision.at.to_rfc3339());
                if decision.is_request {
                    AccessStatusDto {
                        status: decision.status,
                        requested_at: at,
                        updated_at: None,
                    }
                } else {
                    AccessStatusDto {
                        status: decision.status,
                        requested_at: None,
                        updated_at: at,
                    }
                }
            }
            None if user.active => AccessStatusDto::bare(AccessStatus::Approved),
            None => AccessStatusDto::bare(AccessStatus::Pending),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        MockAuditLogRepository, MockUserRepository, audit_service,
    };
    use crate::domain::models::audit::{ACTION_ACCESS_APPROVED, AuditLog};
    use crate::domain::repositories::audit_log_repository::AuditLogRepository;
    use chrono::Duration;

    fn fixture(users: Vec<User>) -> (AccessService, Arc<MockUserRepository>, Arc<MockAuditLogRepository>) {
        let users = Arc::new(MockUserRepository::with_users(users));
        let audit = Arc::new(MockAuditLogRepository::default());
        (
            AccessService::new(users.clone(), audit_service(&audit)),
            users,
            audit,
        )
    }

    #[tokio::test]
    async fn request_deactivates_non_admins() {
        let student = User::new("s@example.com".to_string(), "h".to_string(), Role::Student);
        let (service, users, audit) = fixture(vec![student.clone()]);

        let response = service
            .request_access(&student, AccessRequestDto::default())
            .await
            .unwrap();
        assert_eq!(response.status, AccessStatus::Pending);
        assert!(response.requested_at.is_some());
        assert!(!users.find_by_id(&student.id).await.unwrap().active);

        let logs = audit.find_all().await.unwrap();
        assert_eq!(logs[0].detail, "Requested access (student)");

        let status = service.access_status(&student).await.unwrap();
        assert_eq!(status.status, AccessStatus::Pending);
    }

    #[tokio::test]
    async fn status_without_history_follows_active_flag() {
        let mut inactive = User::new("s@example.com".to_string(), "h".to_string(), Role::Student);
        inactive.active = false;
        let active = User::new("t@example.com".to_string(), "h".to_string(), Role::Student);
        let admin = User::new("a@example.com".to_string(), "h".to_string(), Role::Admin);
        let (service, _, _) = fixture(vec![inactive.clone(), active.clone(), admin.clone()]);

        assert_eq!(service.access_status(&inactive).await.unwrap().status, AccessStatus::Pending);
        assert_eq!(service.access_status(&active).await.unwrap().status, AccessStatus::Approved);
        assert_eq!(service.access_status(&admin).await.unwrap().status, AccessStatus::Approved);
    }

    #[tokio::test]
    async fn status_reports_expired_and_decided_requests() {
        let student = User::new("s@example.com".to_string(), "h".to_string(), Role::Student);
        let (service, _, audit) = fixture(vec![student.clone()]);

        let mut stale = AuditLog::new(Some(student.id.clone()), ACTION_ACCESS_REQUEST, "please");
        stale.created_at = Utc::now() - Duration::hours(2);
        audit.append(&stale).await.unwrap();
        let status = service.access_status(&student).await.unwrap();
        assert_eq!(status.status, AccessStatus::Expired);
        assert!(status.requested_at.is_some());

        audit
            .append(&AuditLog::new(Some(student.id.clone()), ACTION_ACCESS_APPROVED, "Access approved"))
            .await
            .unwrap();
        let status = service.access_status(&student).await.unwrap();
        assert_eq!(status.status, AccessStatus::Approved);
        assert!(status.updated_at.is_some());
    }
}
