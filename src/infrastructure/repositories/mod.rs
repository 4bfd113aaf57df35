// File-backed implementations of the domain repositories
pub mod file_audit_log_repository;
pub mod file_exam_result_repository;
pub mod file_profile_repository;
pub mod file_question_repository;
pub mod file_settings_repository;
pub mod file_user_repository;
