use serde::{Deserialize, Serialize};

use crate::domain::models::access::AccessStatus;
use crate::domain::models::audit::AuditLog;
use crate::domain::models::settings::ExamSettings;
use crate::domain::models::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSettingsDto {
    pub exam_time_limit_minutes: u32,
    pub exam_question_count: u32,
    pub exam_major_question_count: u32,
}

impl From<ExamSettings> for ExamSettingsDto {
    fn from(settings: ExamSettings) -> Self {
        Self {
            exam_time_limit_minutes: settings.exam_time_limit_minutes,
            exam_question_count: settings.exam_question_count,
            exam_major_question_count: settings.exam_major_question_count,
        }
    }
}

impl From<ExamSettingsDto> for ExamSettings {
    fn from(dto: ExamSettingsDto) -> Self {
        Self {
            exam_time_limit_minutes: dto.exam_time_limit_minutes,
            exam_question_count: dto.exam_question_count,
            exam_major_question_count: dto.exam_major_question_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummaryDto {
    pub id: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub created_at: String,
}

impl From<User> for UserSummaryDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role.to_string(),
            active: user.active,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_true")]
    pub require_password_change: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUserDto {
    pub id: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusDto {
    pub id: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedUserDto {
    pub deleted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetSelectedExamsDto {
    #[serde(default)]
    pub user_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetSelectedExamsResultDto {
    pub deleted: usize,
    pub students: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporaryPasswordDto {
    pub temporary_password: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogDto {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub detail: String,
    pub created_at: String,
}

impl From<AuditLog> for AuditLogDto {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            action: log.action,
            detail: log.detail,
            created_at: log.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAccessRequestDto {
    pub id: String,
    pub email: String,
    pub role: String,
    pub requested_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccessStatusDto {
    pub id: String,
    pub status: AccessStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecisionDto {
    pub id: String,
    pub status: AccessStatus,
}
