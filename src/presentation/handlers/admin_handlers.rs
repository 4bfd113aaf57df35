use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::application::dto::admin_dto::{
    AccessDecisionDto, AuditLogDto, CreateUserDto, CreatedUserDto, DeletedUserDto,
    ExamSettingsDto, PendingAccessRequestDto, ResetSelectedExamsDto, ResetSelectedExamsResultDto,
    TemporaryPasswordDto, UserAccessStatusDto, UserStatusDto, UserSummaryDto,
};
use crate::application::dto::question_dto::DeletedCountDto;
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{AdminUser, ApiJson, CurrentUser};
use crate::presentation::helpers::{log_request, map_api_error};

#[derive(Debug, Deserialize)]
pub struct UserStatusQuery {
    pub active: bool,
}

pub async fn get_settings(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ExamSettingsDto>, ApiError> {
    log_request("get_settings");

    app_state
        .settings_service
        .get_settings()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to get settings"))
}

pub async fn get_public_settings(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<ExamSettingsDto>, ApiError> {
    log_request("get_public_settings");

    app_state
        .settings_service
        .get_settings()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to get settings"))
}

pub async fn update_settings(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    ApiJson(dto): ApiJson<ExamSettingsDto>,
) -> Result<Json<ExamSettingsDto>, ApiError> {
    log_request("update_settings");

    app_state
        .settings_service
        .update_settings(dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to update settings"))
}

pub async fn list_users(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserSummaryDto>>, ApiError> {
    log_request("list_users");

    app_state
        .admin_service
        .list_users()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to list users"))
}

pub async fn create_user(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    ApiJson(dto): ApiJson<CreateUserDto>,
) -> Result<Json<CreatedUserDto>, ApiError> {
    log_request(format!("create_user {}", dto.email));

    app_state
        .admin_service
        .create_user(dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to create user"))
}

pub async fn set_user_status(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
    query: Result<Query<UserStatusQuery>, QueryRejection>,
) -> Result<Json<UserStatusDto>, ApiError> {
    log_request(format!("set_user_status {}", user_id));
    let Query(query) = query?;

    app_state
        .admin_service
        .set_user_status(&user_id, query.active)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to update user status"))
}

pub async fn delete_user(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedUserDto>, ApiError> {
    log_request(format!("delete_user {}", user_id));

    app_state
        .admin_service
        .delete_user(&user_id)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to delete user"))
}

pub async fn reset_user_exams(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedCountDto>, ApiError> {
    log_request(format!("reset_user_exams {}", user_id));

    app_state
        .admin_service
        .reset_user_exams(&user_id)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to reset exams"))
}

pub async fn reset_student_exams(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<DeletedCountDto>, ApiError> {
    log_request("reset_student_exams");

    app_state
        .admin_service
        .reset_student_exams()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to reset student exams"))
}

pub async fn reset_selected_student_exams(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    ApiJson(dto): ApiJson<ResetSelectedExamsDto>,
) -> Result<Json<ResetSelectedExamsResultDto>, ApiError> {
    log_request("reset_selected_student_exams");

    app_state
        .admin_service
        .reset_selected_student_exams(dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to reset selected exams"))
}

pub async fn issue_password_reset(
    State(app_state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<TemporaryPasswordDto>, ApiError> {
    log_request(format!("issue_password_reset {}", user_id));

    app_state
        .admin_service
        .issue_password_reset(&admin, &user_id)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to issue password reset"))
}

pub async fn audit_logs(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<AuditLogDto>>, ApiError> {
    log_request("audit_logs");

    app_state
        .audit_service
        .recent()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to list audit logs"))
}

pub async fn access_requests(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<PendingAccessRequestDto>>, ApiError> {
    log_request("access_requests");

    app_state
        .admin_service
        .pending_access_requests()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to list access requests"))
}

pub async fn access_statuses(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserAccessStatusDto>>, ApiError> {
    log_request("access_statuses");

    app_state
        .admin_service
        .access_statuses()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to list access statuses"))
}

pub async fn approve_access(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<AccessDecisionDto>, ApiError> {
    log_request(format!("approve_access {}", user_id));

    app_state
        .admin_service
        .decide_access(&user_id, true)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to approve access"))
}

pub async fn deny_access(
    State(app_state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<AccessDecisionDto>, ApiError> {
    log_request(format!("deny_access {}", user_id));

    app_state
        .admin_service
        .decide_access(&user_id, false)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to deny access"))
}
