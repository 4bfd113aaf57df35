use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::app::AppState;
use crate::application::dto::exam_dto::{
    ExamResultDto, ExamStatsDto, ExamSubmissionDto, ExamSubmissionResultDto,
};
use crate::application::dto::question_dto::ExamQuestionDto;
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{ApiJson, CurrentUser, StaffUser};
use crate::presentation::helpers::{log_request, map_api_error};

pub async fn start_exam(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ExamQuestionDto>>, ApiError> {
    log_request("start_exam");

    app_state
        .exam_service
        .start_exam(&user)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to start exam"))
}

pub async fn submit_exam(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(dto): ApiJson<ExamSubmissionDto>,
) -> Result<Json<ExamSubmissionResultDto>, ApiError> {
    log_request("submit_exam");

    app_state
        .exam_service
        .submit_exam(&user, dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to submit exam"))
}

pub async fn exam_results(
    State(app_state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ExamResultDto>>, ApiError> {
    log_request("exam_results");

    app_state
        .exam_service
        .list_results(&user)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to list exam results"))
}

pub async fn exam_stats(
    State(app_state): State<Arc<AppState>>,
    StaffUser(_user): StaffUser,
) -> Result<Json<ExamStatsDto>, ApiError> {
    log_request("exam_stats");

    app_state
        .exam_service
        .stats()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to compute exam stats"))
}
