use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::app::AppState;
use crate::application::dto::profile_dto::{InstructorProfileDto, StudentProfileDto};
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{ApiJson, CurrentUser};
use crate::presentation::helpers::{log_request, map_api_error};

pub async fn get_profile(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Option<StudentProfileDto>>, ApiError> {
    log_request("get_profile");

    app_state
        .profile_service
        .get_student_profile(&user)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to get profile"))
}

pub async fn save_profile(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(dto): ApiJson<StudentProfileDto>,
) -> Result<Json<StudentProfileDto>, ApiError> {
    log_request("save_profile");

    app_state
        .profile_service
        .save_student_profile(&user, dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to save profile"))
}

pub async fn get_instructor_profile(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Option<InstructorProfileDto>>, ApiError> {
    log_request("get_instructor_profile");

    app_state
        .profile_service
        .get_instructor_profile(&user)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to get instructor profile"))
}

pub async fn save_instructor_profile(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(dto): ApiJson<InstructorProfileDto>,
) -> Result<Json<InstructorProfileDto>, ApiError> {
    log_request("save_instructor_profile");

    app_state
        .profile_service
        .save_instructor_profile(&user, dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to save instructor profile"))
}
