use std::sync::Arc;

use crate::application::dto::admin_dto::ExamSettingsDto;
use crate::application::errors::ApplicationError;
use crate::application::services::audit_service::AuditService;
use crate::domain::models::audit::ACTION_SETTINGS_UPDATE;
use crate::domain::models::settings::ExamSettings;
use crate::domain::repositories::question_repository::QuestionRepository;
use crate::domain::repositories::settings_repository::SettingsRepository;

/// Exam timer and item counts.
pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepository>,
    question_repository: Arc<dyn QuestionRepository>,
    audit_service: Arc<AuditService>,
}

impl SettingsService {
    pub fn new(
        settings_repository: Arc<dyn SettingsRepository>,
        question_repository: Arc<dyn QuestionRepository>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self {
            settings_repository,
            question_repository,
            audit_service,
        }
    }

    /// Returns the stored settings, persisting the defaults on first access.
    pub async fn get_or_create(&self) -> Result<ExamSettings, ApplicationError> {
        if let Some(settings) = self.settings_repository.load().await? {
            return Ok(settings);
        }

        tracing::info!("No exam settings stored, writing defaults");
        let settings = ExamSettings::default();
        self.settings_repository.save(&settings).await?;
        Ok(settings)
    }

    pub async fn get_settings(&self) -> Result<ExamSettingsDto, ApplicationError> {
        Ok(ExamSettingsDto::from(self.get_or_create().await?))
    }

    pub async fn update_settings(
        &self,
        dto: ExamSettingsDto,
    ) -> Result<ExamSettingsDto, ApplicationError> {
        tracing::info!("Updating exam settings: {:?}", dto);

        let settings = ExamSettings::from(dto);
        settings
            .validate()
            .map_err(ApplicationError::BadInput)?;

        let available = self.question_repository.count().await?;
        if settings.exam_question_count as usize > available {
            return Err(ApplicationError::BadInput(format!(
                "Exam item count exceeds the available question bank. Requested {}, but only {} available.",
                settings.exam_question_count, available
            )));
        }
        if settings.exam_major_question_count as usize > available {
            return Err(ApplicationError::BadInput(format!(
                "Major item count exceeds the available question bank. Requested {}, but only {} available.",
                settings.exam_major_question_count, available
            )));
        }

        self.settings_repository.save(&settings).await?;
        self.audit_service
            .log(
                None,
                ACTION_SETTINGS_UPDATE,
                format!(
                    "Exam timer set to {} minutes; exam questions set to {}; major questions set to {}",
                    settings.exam_time_limit_minutes,
                    settings.exam_question_count,
                    settings.exam_major_question_count
                ),
            )
            .await;

        Ok(ExamSettingsDto::from(settings))
    }
}
