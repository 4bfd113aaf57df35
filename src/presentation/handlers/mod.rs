pub mod access_handlers;
pub mod admin_handlers;
pub mod auth_handlers;
pub mod exam_handlers;
pub mod profile_handlers;
pub mod question_handlers;
