use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::Json;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::app::AppState;
use crate::application::services::auth_service::AccessPolicy;
use crate::domain::models::user::{Role, User};
use crate::presentation::errors::ApiError;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(ApiError::not_authenticated)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(ApiError::not_authenticated)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ApiError::not_authenticated());
    }
    Ok(token)
}

async fn authenticate(
    parts: &Parts,
    state: &Arc<AppState>,
    policy: AccessPolicy,
) -> Result<User, ApiError> {
    let token = bearer_token(parts)?;
    state
        .auth_service
        .authenticate(token, policy)
        .await
        .map_err(|error| {
            tracing::debug!("Rejected bearer token: {}", error);
            ApiError::from(error)
        })
}

/// Active account without a pending password change.
pub struct CurrentUser(pub User);

/// Active account; a pending password change is allowed.
pub struct PasswordResetUser(pub User);

/// Any existing account, including deactivated ones.
pub struct AnyUser(pub User);

/// [`CurrentUser`] with the instructor or admin role.
pub struct StaffUser(pub User);

/// [`CurrentUser`] with the admin role.
pub struct AdminUser(pub User);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, AccessPolicy::Active)
            .await
            .map(CurrentUser)
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for PasswordResetUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, AccessPolicy::AllowPasswordReset)
            .await
            .map(PasswordResetUser)
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AnyUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, AccessPolicy::AllowInactive)
            .await
            .map(AnyUser)
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(ApiError::not_authorized());
        }
        Ok(StaffUser(user))
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(ApiError::not_authorized());
        }
        Ok(AdminUser(user))
    }
}

/// JSON body whose rejections render as `{"detail": ...}` like every other error.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
