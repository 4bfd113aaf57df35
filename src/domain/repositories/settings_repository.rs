use crate::domain::errors::DomainError;
use crate::domain::models::settings::ExamSettings;
use async_trait::async_trait;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn save(&self, settings: &ExamSettings) -> Result<(), DomainError>;
    /// Returns `None` until settings have been saved once.
    async fn load(&self) -> Result<Option<ExamSettings>, DomainError>;
}
