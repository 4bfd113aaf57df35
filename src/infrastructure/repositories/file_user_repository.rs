use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::domain::models::user::User;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::persistence::record_store::{JsonRecordStore, StoredRecord};

impl StoredRecord for User {
    fn record_key(&self) -> &str {
        &self.id
    }
}

pub struct FileUserRepository {
    store: JsonRecordStore<User>,
}

impl FileUserRepository {
    pub fn new(users_dir: PathBuf) -> Self {
        Self {
            store: JsonRecordStore::new(users_dir),
        }
    }
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        self.store.put(user).await
    }

    async fn find_by_id(&self, id: &str) -> Result<User, DomainError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.store.find(|user| user.email_matches(email)).await
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        self.store.all().await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        if !self.store.remove(id).await? {
            return Err(DomainError::user_not_found(id));
        }
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        if !self.store.contains(&user.id).await? {
            return Err(DomainError::user_not_found(&user.id));
        }

        self.save(user).await
    }
}
