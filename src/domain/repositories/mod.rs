pub mod audit_log_repository;
pub mod exam_result_repository;
pub mod profile_repository;
pub mod question_repository;
pub mod settings_repository;
pub mod user_repository;
