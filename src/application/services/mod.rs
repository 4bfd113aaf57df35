pub mod access_service;
pub mod admin_service;
pub mod audit_service;
pub mod auth_service;
pub mod exam_service;
pub mod profile_service;
pub mod question_service;
pub mod settings_service;

#[cfg(test)]
pub(crate) mod test_support;
