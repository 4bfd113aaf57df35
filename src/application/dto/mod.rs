// Data Transfer Objects
pub mod access_dto;
pub mod admin_dto;
pub mod auth_dto;
pub mod exam_dto;
pub mod profile_dto;
pub mod question_dto;
