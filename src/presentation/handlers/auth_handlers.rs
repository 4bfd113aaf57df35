use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::app::AppState;
use crate::application::dto::auth_dto::{
    AdminRegisterDto, AdminRegisteredDto, ChangePasswordDto, LoginDto, RegisterDto,
    TokenResponseDto,
};
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{ApiJson, PasswordResetUser};
use crate::presentation::helpers::{log_request, map_api_error};

pub async fn register(
    State(app_state): State<Arc<AppState>>,
    ApiJson(dto): ApiJson<RegisterDto>,
) -> Result<Json<()>, ApiError> {
    log_request(format!("register {} ({})", dto.email, dto.role));

    app_state
        .auth_service
        .register()
        .map(Json)
        .map_err(map_api_error("Self-registration rejected"))
}

pub async fn login(
    State(app_state): State<Arc<AppState>>,
    ApiJson(dto): ApiJson<LoginDto>,
) -> Result<Json<TokenResponseDto>, ApiError> {
    log_request("login");

    app_state
        .auth_service
        .login(dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to log in"))
}

pub async fn register_admin(
    State(app_state): State<Arc<AppState>>,
    ApiJson(dto): ApiJson<AdminRegisterDto>,
) -> Result<Json<AdminRegisteredDto>, ApiError> {
    log_request("register_admin");

    app_state
        .auth_service
        .register_admin(dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to register admin"))
}

pub async fn change_password(
    State(app_state): State<Arc<AppState>>,
    PasswordResetUser(user): PasswordResetUser,
    ApiJson(dto): ApiJson<ChangePasswordDto>,
) -> Result<Json<TokenResponseDto>, ApiError> {
    log_request("change_password");

    app_state
        .auth_service
        .change_password(&user, dto)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to change password"))
}
