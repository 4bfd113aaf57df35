use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long an admin-issued temporary password stays usable.
pub const TEMP_PASSWORD_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// Instructors and admins curate the question bank and read exam stats.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Instructor | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub must_change_password: bool,
    #[serde(default)]
    pub temp_password_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            role,
            active: true,
            must_change_password: false,
            temp_password_expires_at: None,
            created_at: Utc::now(),
        }
    }

    /// Marks the current password as temporary, expiring `TEMP_PASSWORD_TTL_MINUTES` from `now`.
    pub fn require_password_change(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let expires_at = now + Duration::minutes(TEMP_PASSWORD_TTL_MINUTES);
        self.must_change_password = true;
        self.temp_password_expires_at = Some(expires_at);
        expires_at
    }

    pub fn clear_password_change(&mut self) {
        self.must_change_password = false;
        self.temp_password_expires_at = None;
    }

    pub fn temp_password_expired(&self, now: DateTime<Utc>) -> bool {
        match (self.must_change_password, self.temp_password_expires_at) {
            (true, Some(expires_at)) => now > expires_at,
            _ => false,
        }
    }

    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_form() {
        assert_eq!("instructor".parse::<Role>().unwrap(), Role::Instructor);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn temp_password_expiry_only_applies_while_change_is_required() {
        let now = Utc::now();
        let mut user = User::new("a@b.c".to_string(), "hash".to_string(), Role::Student);
        user.require_password_change(now);

        assert!(!user.temp_password_expired(now));
        assert!(user.temp_password_expired(now + Duration::minutes(16)));

        user.clear_password_change();
        assert!(!user.temp_password_expired(now + Duration::minutes(16)));
    }

    #[test]
    fn missing_flags_default_when_deserializing_legacy_records() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "1",
            "email": "legacy@example.com",
            "password_hash": "x",
            "role": "student",
            "created_at": "2026-01-09T00:00:00Z"
        }))
        .unwrap();

        assert!(user.active);
        assert!(!user.must_change_password);
        assert!(user.temp_password_expires_at.is_none());
    }
}
