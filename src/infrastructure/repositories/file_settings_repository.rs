use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;
use crate::domain::models::settings::ExamSettings;
use crate::domain::repositories::settings_repository::SettingsRepository;
use crate::infrastructure::persistence::file_system::{read_json_file, write_json_file};

/// Exam settings kept in a single `settings.json` document.
pub struct FileSettingsRepository {
    settings_file: PathBuf,
    cache: Mutex<Option<ExamSettings>>,
}

impl FileSettingsRepository {
    pub fn new(settings_file: PathBuf) -> Self {
        tracing::info!(
            "Settings repository initialized with settings file: {:?}",
            settings_file
        );

        Self {
            settings_file,
            cache: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SettingsRepository for FileSettingsRepository {
    async fn save(&self, settings: &ExamSettings) -> Result<(), DomainError> {
        let mut cache = self.cache.lock().await;
        write_json_file(&self.settings_file, settings).await?;
        *cache = Some(settings.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<ExamSettings>, DomainError> {
        let mut cache = self.cache.lock().await;
        if let Some(settings) = cache.as_ref() {
            return Ok(Some(settings.clone()));
        }

        match read_json_file::<ExamSettings>(&self.settings_file).await {
            Ok(settings) => {
                *cache = Some(settings.clone());
                Ok(Some(settings))
            }
            Err(DomainError::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::random;

    #[tokio::test]
    async fn load_is_empty_until_first_save() {
        let root = std::env::temp_dir().join(format!("reviewer-settings-{}", random::<u64>()));
        let repository = FileSettingsRepository::new(root.join("settings.json"));

        assert!(repository.load().await.unwrap().is_none());

        let settings = ExamSettings {
            exam_time_limit_minutes: 60,
            ..ExamSettings::default()
        };
        repository.save(&settings).await.unwrap();

        let reopened = FileSettingsRepository::new(root.join("settings.json"));
        assert_eq!(reopened.load().await.unwrap(), Some(settings));

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
