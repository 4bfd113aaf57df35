use serde::{Deserialize, Serialize};

use crate::application::errors::ApplicationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// Self-registration request; accepted only to be refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDto {
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRegisterDto {
    pub email: String,
    pub password: String,
    pub admin_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub role: String,
    pub must_change_password: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRegisteredDto {
    pub message: String,
    pub email: String,
    pub role: String,
}

/// Trims and checks the basic `local@domain.tld` shape of an email address.
pub fn normalize_email(email: &str) -> Result<String, ApplicationError> {
    let email = email.trim();
    let invalid = || ApplicationError::BadInput("Invalid email address".to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(email.to_string())
}
