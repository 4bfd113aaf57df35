use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::application::dto::admin_dto::{
    AccessDecisionDto, CreateUserDto, CreatedUserDto, DeletedUserDto, PendingAccessRequestDto,
    ResetSelectedExamsDto, ResetSelectedExamsResultDto, TemporaryPasswordDto,
    UserAccessStatusDto, UserStatusDto, UserSummaryDto,
};
use crate::application::dto::auth_dto::normalize_email;
use crate::application::dto::question_dto::DeletedCountDto;
use crate::application::errors::ApplicationError;
use crate::application::services::audit_service::AuditService;
use crate::domain::models::access::{
    AccessStatus, decide, is_access_action, latest_by_user, request_cutoff,
};
use crate::domain::models::audit::{
    ACTION_ACCESS_APPROVED, ACTION_ACCESS_DENIED, ACTION_ACCESS_REQUEST, ACTION_EXAM_RESET,
    ACTION_EXAM_RESET_BULK, ACTION_EXAM_RESET_SELECTED, ACTION_PASSWORD_RESET_ISSUED,
    ACTION_USER_CREATE, ACTION_USER_DELETE, ACTION_USER_STATUS,
};
use crate::domain::errors::DomainError;
use crate::domain::models::user::{Role, User};
use crate::domain::repositories::exam_result_repository::ExamResultRepository;
use crate::domain::repositories::profile_repository::ProfileRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::security::password::{
    PasswordHasher, TEMP_PASSWORD_LENGTH, generate_temp_password,
};

/// Account management, exam resets and access decisions for admins.
pub struct AdminService {
    user_repository: Arc<dyn UserRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    exam_result_repository: Arc<dyn ExamResultRepository>,
    audit_service: Arc<AuditService>,
    password_hasher: PasswordHasher,
}

impl AdminService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        exam_result_repository: Arc<dyn ExamResultRepository>,
        audit_service: Arc<AuditService>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            user_repository,
            profile_repository,
            exam_result_repository,
            audit_service,
            password_hasher,
        }
    }

    async fn find_user(&self, user_id: &str) -> Result<User, ApplicationError> {
        match self.user_repository.find_by_id(user_id).await {
            Err(DomainError::RecordNotFound(_)) => {
                Err(ApplicationError::NotFound("User not found".to_string()))
            }
            other => Ok(other?),
        }
    }

    /// Every account, newest first.
    pub async fn list_users(&self) -> Result<Vec<UserSummaryDto>, ApplicationError> {
        tracing::debug!("Listing users");

        let mut users = self.user_repository.find_all().await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users.into_iter().map(UserSummaryDto::from).collect())
    }

    pub async fn create_user(&self, dto: CreateUserDto) -> Result<CreatedUserDto, ApplicationError> {
        tracing::info!("Creating {} account for {}", dto.role, dto.email);

        let role: Role = dto
            .role
            .parse()
            .map_err(ApplicationError::BadInput)?;
        let email = normalize_email(&dto.email)?;
        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(ApplicationError::BadInput(
                "User already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let (password, generated, must_change) = match dto.password.filter(|p| !p.is_empty()) {
            Some(password) => (password, false, dto.require_password_change),
            None => (generate_temp_password(TEMP_PASSWORD_LENGTH), true, true),
        };

        let mut user = User::new(email, self.password_hasher.hash(&password).await?, role);
        let expires_at = must_change.then(|| user.require_password_change(now));
        self.user_repository.save(&user).await?;

        self.audit_service
            .log(
                Some(&user.id),
                ACTION_USER_CREATE,
                format!("Created {} {}", user.role, user.email),
            )
            .await;

        Ok(CreatedUserDto {
            id: user.id,
            email: user.email,
            role: user.role.to_string(),
            active: user.active,
            created_at: user.created_at.to_rfc3339(),
            temporary_password: generated.then_some(password),
            expires_at: expires_at
                .filter(|_| generated)
                .map(|expires_at| expires_at.to_rfc3339()),
        })
    }

    pub async fn set_user_status(
        &self,
        user_id: &str,
        active: bool,
    ) -> Result<UserStatusDto, ApplicationError> {
        tracing::info!("Setting user {} active={}", user_id, active);

        let mut user = self.find_user(user_id).await?;
        user.active = active;
        self.user_repository.update(&user).await?;

        let detail = if active {
            "User activated"
        } else {
            "User deactivated"
        };
        self.audit_service
            .log(Some(&user.id), ACTION_USER_STATUS, detail)
            .await;

        Ok(UserStatusDto {
            id: user.id,
            active,
        })
    }

    /// Removes a deactivated account with its results, audit trail and profiles.
    pub async fn delete_user(&self, user_id: &str) -> Result<DeletedUserDto, ApplicationError> {
        tracing::info!("Deleting user {}", user_id);

        let user = self.find_user(user_id).await?;
        if user.active {
            return Err(ApplicationError::BadInput(
                "Deactivate user before deleting".to_string(),
            ));
        }

        let ids = [user.id.clone()];
        self.exam_result_repository.delete_by_user_ids(&ids).await?;
        self.audit_service.delete_for_user(&user.id).await?;
        self.profile_repository.delete_student(&user.id).await?;
        self.profile_repository.delete_instructor(&user.id).await?;
        self.user_repository.delete(&user.id).await?;

        self.audit_service
            .log(None, ACTION_USER_DELETE, format!("Deleted user {}", user.email))
            .await;

        Ok(DeletedUserDto { deleted: user.id })
    }

    pub async fn reset_user_exams(&self, user_id: &str) -> Result<DeletedCountDto, ApplicationError> {
        tracing::info!("Resetting exams for {}", user_id);

        let user = self.find_user(user_id).await?;
        let deleted = self
            .exam_result_repository
            .delete_by_user_ids(&[user.id.clone()])
            .await?;

        self.audit_service
            .log(
                Some(&user.id),
                ACTION_EXAM_RESET,
                format!("Deleted {} exam results", deleted),
            )
            .await;

        Ok(DeletedCountDto { deleted })
    }

    pub async fn reset_student_exams(&self) -> Result<DeletedCountDto, ApplicationError> {
        tracing::info!("Resetting exams for all students");

        let student_ids: Vec<String> = self
            .user_repository
            .find_all()
            .await?
            .into_iter()
            .filter(|user| user.role == Role::Student)
            .map(|user| user.id)
            .collect();
        if student_ids.is_empty() {
            return Ok(DeletedCountDto { deleted: 0 });
        }

        let deleted = self
            .exam_result_repository
            .delete_by_user_ids(&student_ids)
            .await?;
        self.audit_service
            .log(
                None,
                ACTION_EXAM_RESET_BULK,
                format!("Deleted {} student exam results", deleted),
            )
            .await;

        Ok(DeletedCountDto { deleted })
    }

    pub async fn reset_selected_student_exams(
        &self,
        dto: ResetSelectedExamsDto,
    ) -> Result<ResetSelectedExamsResultDto, ApplicationError> {
        tracing::info!("Resetting exams for {} selected users", dto.user_ids.len());

        if dto.user_ids.is_empty() || dto.user_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(ApplicationError::BadInput(
                "Invalid user id list".to_string(),
            ));
        }

        let selected: HashSet<&str> = dto.user_ids.iter().map(String::as_str).collect();
        let student_ids: Vec<String> = self
            .user_repository
            .find_all()
            .await?
            .into_iter()
            .filter(|user| user.role == Role::Student && selected.contains(user.id.as_str()))
            .map(|user| user.id)
            .collect();
        if student_ids.is_empty() {
            return Ok(ResetSelectedExamsResultDto {
                deleted: 0,
                students: 0,
            });
        }

        let deleted = self
            .exam_result_repository
            .delete_by_user_ids(&student_ids)
            .await?;
        self.audit_service
            .log(
                None,
                ACTION_EXAM_RESET_SELECTED,
                format!(
                    "Deleted {} exam results for {} students",
                    deleted,
                    student_ids.len()
                ),
            )
            .await;

        Ok(ResetSelectedExamsResultDto {
            deleted,
            students: student_ids.len(),
        })
    }

    /// Replaces the account password with a short-lived temporary one.
    pub async fn issue_password_reset(
        &self,
        admin: &User,
        user_id: &str,
    ) -> Result<TemporaryPasswordDto, ApplicationError> {
        tracing::info!("Issuing temporary password for {}", user_id);

        let mut user = self.find_user(user_id).await?;
        let temporary_password = generate_temp_password(TEMP_PASSWORD_LENGTH);
        user.password_hash = self.password_hasher.hash(&temporary_password).await?;
        let expires_at = user.require_password_change(Utc::now()).to_rfc3339();
        self.user_repository.update(&user).await?;

        self.audit_service
            .log(
                Some(&user.id),
                ACTION_PASSWORD_RESET_ISSUED,
                format!("Reset by {}; expires {}", admin.email, expires_at),
            )
            .await;

        Ok(TemporaryPasswordDto {
            temporary_password,
            expires_at,
        })
    }

    /// Users whose most recent access event inside the request window is an open request.
    pub async fn pending_access_requests(
        &self,
    ) -> Result<Vec<PendingAccessRequestDto>, ApplicationError> {
        tracing::debug!("Listing pending access requests");

        let cutoff = request_cutoff(Utc::now());
        let logs: Vec<_> = self
            .audit_service
            .all()
            .await?
            .into_iter()
            .filter(|log| is_access_action(&log.action) && log.created_at >= cutoff)
            .collect();

        let mut latest: Vec<_> = latest_by_user(&logs)
            .into_values()
            .filter(|log| log.action == ACTION_ACCESS_REQUEST)
            .collect();
        latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut requests = Vec::with_capacity(latest.len());
        for log in latest {
            let Some(user_id) = log.user_id.as_deref() else {
                continue;
            };
            let Ok(user) = self.user_repository.find_by_id(user_id).await else {
                continue;
            };
            requests.push(PendingAccessRequestDto {
                id: user.id,
                email: user.email,
                role: user.role.to_string(),
                requested_at: log.created_at.to_rfc3339(),
            });
        }

        Ok(requests)
    }

    pub async fn access_statuses(&self) -> Result<Vec<UserAccessStatusDto>, ApplicationError> {
        tracing::debug!("Listing access statuses");

        let now = Utc::now();
        let logs = self.audit_service.all().await?;
        let latest = latest_by_user(&logs);

        let mut users = self.user_repository.find_all().await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(users
            .into_iter()
            .map(|user| {
                if user.role == Role::Admin {
                    return UserAccessStatusDto {
                        id: user.id,
                        status: AccessStatus::Approved,
                        detail: None,
                    };
                }
                match latest.get(&user.id).and_then(|log| decide(log, now)) {
                    Some(decision) => UserAccessStatusDto {
                        id: user.id,
                        status: decision.status,
                        detail: decision.is_request.then_some(decision.detail),
                    },
                    None => UserAccessStatusDto {
                        id: user.id,
                        status: AccessStatus::Pending,
                        detail: None,
                    },
                }
            })
            .collect())
    }

    pub async fn decide_access(
        &self,
        user_id: &str,
        approve: bool,
    ) -> Result<AccessDecisionDto, ApplicationError> {
        tracing::info!("Access decision for {}: approve={}", user_id, approve);

        let mut user = self.find_user(user_id).await?;
        user.active = approve;
        self.user_repository.update(&user).await?;

        let (action, detail, status) = if approve {
            (ACTION_ACCESS_APPROVED, "Access approved", AccessStatus::Approved)
        } else {
            (ACTION_ACCESS_DENIED, "Access denied", AccessStatus::Denied)
        };
        self.audit_service.log(Some(&user.id), action, detail).await;

        Ok(AccessDecisionDto {
            id: user.id,
            status,
        })
    }
}
