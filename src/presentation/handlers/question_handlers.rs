use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use bytes::Bytes;

use crate::app::AppState;
use crate::application::dto::question_dto::{
    CreateQuestionDto, DeletedCountDto, QuestionDto, UploadResultDto,
};
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{ApiJson, StaffUser};
use crate::presentation::helpers::{log_request, map_api_error};

const UPLOAD_FIELD: &str = "file";

pub async fn list_questions(
    State(app_state): State<Arc<AppState>>,
    StaffUser(_user): StaffUser,
) -> Result<Json<Vec<QuestionDto>>, ApiError> {
    log_request("list_questions");

    app_state
        .question_service
        .list_questions()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to list questions"))
}

pub async fn add_question(
    State(app_state): State<Arc<AppState>>,
    StaffUser(_user): StaffUser,
    ApiJson(dto): ApiJson<CreateQuestionDto>,
) -> Result<Json<QuestionDto>, ApiError> {
    log_request("add_question");

    app_state
        .question_service
        .add_question(dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to add question"))
}

pub async fn clear_questions(
    State(app_state): State<Arc<AppState>>,
    StaffUser(_user): StaffUser,
) -> Result<Json<DeletedCountDto>, ApiError> {
    log_request("clear_questions");

    app_state
        .question_service
        .clear_questions()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to clear questions"))
}

pub async fn upload_questions(
    State(app_state): State<Arc<AppState>>,
    StaffUser(user): StaffUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResultDto>, ApiError> {
    log_request("upload_questions");

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        upload = Some((filename, content));
        break;
    }

    let (filename, content) = upload.ok_or_else(|| {
        ApiError::UnprocessableEntity(format!("Missing multipart field '{}'", UPLOAD_FIELD))
    })?;

    app_state
        .question_service
        .import_csv(&user, &filename, &content)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to import questions"))
}
