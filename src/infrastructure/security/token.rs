use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::models::user::User;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Account email
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// Issues and validates HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, DomainError> {
        let expires_at = Utc::now() + self.ttl;
        let claims = AccessClaims {
            sub: user.email.clone(),
            role: user.role.to_string(),
            exp: expires_at.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {}", e);
            DomainError::Internal(format!("Failed to encode access token: {}", e))
        })
    }

    pub fn decode(&self, token: &str) -> Result<AccessClaims, DomainError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected access token: {}", e);
            DomainError::CredentialRejected("Invalid token".to_string())
        })?;

        if data.claims.sub.is_empty() {
            return Err(DomainError::CredentialRejected("Invalid token".to_string()));
        }
        Ok(data.claims)
    }
}
