use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(user_id: Option<String>, action: &str, detail: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            action: action.to_string(),
            detail: detail.into(),
            created_at: Utc::now(),
        }
    }
}

// Audit actions
pub const ACTION_LOGIN: &str = "login";
pub const ACTION_REGISTER: &str = "register";
pub const ACTION_ADMIN_SEED: &str = "admin_seed";
pub const ACTION_PASSWORD_CHANGE: &str = "password_change";
pub const ACTION_PROFILE_SAVE: &str = "profile_save";
pub const ACTION_INSTRUCTOR_PROFILE_SAVE: &str = "instructor_profile_save";
pub const ACTION_EXAM_SUBMIT: &str = "exam_submit";
pub const ACTION_SETTINGS_UPDATE: &str = "settings_update";
pub const ACTION_USER_CREATE: &str = "user_create";
pub const ACTION_USER_STATUS: &str = "user_status";
pub const ACTION_USER_DELETE: &str = "user_delete";
pub const ACTION_EXAM_RESET: &str = "exam_reset";
pub const ACTION_EXAM_RESET_BULK: &str = "exam_reset_bulk";
pub const ACTION_EXAM_RESET_SELECTED: &str = "exam_reset_selected";
pub const ACTION_PASSWORD_RESET_ISSUED: &str = "password_reset_issued";
pub const ACTION_QUESTIONS_IMPORT: &str = "questions_import";
pub const ACTION_ACCESS_REQUEST: &str = "access_request";
pub const ACTION_ACCESS_APPROVED: &str = "access_approved";
pub const ACTION_ACCESS_DENIED: &str = "access_denied";
