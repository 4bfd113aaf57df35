use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::models::user::User;

/// Account storage. Emails are unique ignoring case; ids are immutable.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts or overwrites the account with `user.id`.
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Overwrites an existing account; `RecordNotFound` if the id is unknown.
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<User, DomainError>;

    /// Case-insensitive lookup on the trimmed email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}
