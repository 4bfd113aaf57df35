use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use serde_json::{Value, json};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::app::AppState;
use crate::presentation::errors::ApiError;
use crate::presentation::handlers::{
    access_handlers, admin_handlers, auth_handlers, exam_handlers, profile_handlers,
    question_handlers,
};

/// Question bank uploads are the largest bodies the API accepts.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(root))
        .nest("/auth", auth_routes())
        .nest("/profile", profile_routes())
        .nest("/questions", question_routes())
        .nest("/exam", exam_routes())
        .nest("/admin", admin_routes())
        .nest("/access", access_routes())
        .fallback(not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/register-admin", post(auth_handlers::register_admin))
        .route("/change-password", post(auth_handlers::change_password))
}

fn profile_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(profile_handlers::get_profile).post(profile_handlers::save_profile),
        )
        .route(
            "/instructor",
            get(profile_handlers::get_instructor_profile)
                .post(profile_handlers::save_instructor_profile),
        )
}

fn question_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(question_handlers::list_questions)
                .post(question_handlers::add_question)
                .delete(question_handlers::clear_questions),
        )
        .route("/upload", post(question_handlers::upload_questions))
}

fn exam_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", post(exam_handlers::start_exam))
        .route("/submit", post(exam_handlers::submit_exam))
        .route("/results", get(exam_handlers::exam_results))
        .route("/stats", get(exam_handlers::exam_stats))
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/settings",
            get(admin_handlers::get_settings).put(admin_handlers::update_settings),
        )
        .route("/settings/public", get(admin_handlers::get_public_settings))
        .route(
            "/users",
            get(admin_handlers::list_users).post(admin_handlers::create_user),
        )
        .route("/users/:id", delete(admin_handlers::delete_user))
        .route("/users/:id/status", put(admin_handlers::set_user_status))
        .route("/users/:id/exams", delete(admin_handlers::reset_user_exams))
        .route(
            "/users/:id/password-reset",
            post(admin_handlers::issue_password_reset),
        )
        .route("/exams/students", delete(admin_handlers::reset_student_exams))
        .route(
            "/exams/students/selected",
            post(admin_handlers::reset_selected_student_exams),
        )
        .route("/audit-logs", get(admin_handlers::audit_logs))
        .route("/access-requests", get(admin_handlers::access_requests))
        .route("/access-statuses", get(admin_handlers::access_statuses))
        .route(
            "/access-requests/:id/approve",
            post(admin_handlers::approve_access),
        )
        .route("/access-requests/:id/deny", post(admin_handlers::deny_access))
}

fn access_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/request", post(access_handlers::request_access))
        .route("/status", get(access_handlers::access_status))
}

/// Explicit origins with credentials; methods and headers mirror the preflight.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "Reviewer API is running" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}
