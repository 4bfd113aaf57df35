use rand::Rng;
use rand::distr::Alphanumeric;

use crate::domain::errors::DomainError;

pub const TEMP_PASSWORD_LENGTH: usize = 12;

/// bcrypt hashing with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes on the blocking pool; bcrypt at the default cost takes a noticeable slice of CPU.
    pub async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(blocking_task_failed)?
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                DomainError::Internal(format!("Failed to hash password: {}", e))
            })
    }

    /// Malformed stored hashes verify as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_string();
        let hash = hash.to_string();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(blocking_task_failed)?;

        Ok(match outcome {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Password hash could not be verified: {}", e);
                false
            }
        })
    }
}

fn blocking_task_failed(error: tokio::task::JoinError) -> DomainError {
    tracing::error!("Password task failed: {}", error);
    DomainError::Internal(format!("Password task failed: {}", error))
}

/// Random letters and digits, drawn from the thread-local CSPRNG.
pub fn generate_temp_password(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
