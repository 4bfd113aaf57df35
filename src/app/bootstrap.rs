use std::path::Path;
use std::sync::Arc;

use crate::application::services::access_service::AccessService;
use crate::application::services::admin_service::AdminService;
use crate::application::services::audit_service::AuditService;
use crate::application::services::auth_service::AuthService;
use crate::application::services::exam_service::ExamService;
use crate::application::services::profile_service::ProfileService;
use crate::application::services::question_service::QuestionService;
use crate::application::services::settings_service::SettingsService;
use crate::domain::errors::DomainError;
use crate::domain::repositories::audit_log_repository::AuditLogRepository;
use crate::domain::repositories::exam_result_repository::ExamResultRepository;
use crate::domain::repositories::profile_repository::ProfileRepository;
use crate::domain::repositories::question_repository::QuestionRepository;
use crate::domain::repositories::settings_repository::SettingsRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::file_system::DataDirectory;
use crate::infrastructure::repositories::file_audit_log_repository::FileAuditLogRepository;
use crate::infrastructure::repositories::file_exam_result_repository::FileExamResultRepository;
use crate::infrastructure::repositories::file_profile_repository::FileProfileRepository;
use crate::infrastructure::repositories::file_question_repository::FileQuestionRepository;
use crate::infrastructure::repositories::file_settings_repository::FileSettingsRepository;
use crate::infrastructure::repositories::file_user_repository::FileUserRepository;
use crate::infrastructure::security::password::PasswordHasher;
use crate::infrastructure::security::token::TokenService;

pub(super) struct AppServices {
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub question_service: Arc<QuestionService>,
    pub exam_service: Arc<ExamService>,
    pub settings_service: Arc<SettingsService>,
    pub admin_service: Arc<AdminService>,
    pub access_service: Arc<AccessService>,
    pub audit_service: Arc<AuditService>,
}

struct AppRepositories {
    user_repository: Arc<dyn UserRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    question_repository: Arc<dyn QuestionRepository>,
    exam_result_repository: Arc<dyn ExamResultRepository>,
    settings_repository: Arc<dyn SettingsRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

pub(super) async fn initialize_data_directory(
    data_root: &Path,
) -> Result<DataDirectory, DomainError> {
    let data_directory = DataDirectory::new(data_root.to_path_buf());
    data_directory.initialize().await?;
    Ok(data_directory)
}

pub(super) fn build_services(config: &AppConfig, data_directory: &DataDirectory) -> AppServices {
    let repositories = build_repositories(data_directory);

    let token_service = Arc::new(TokenService::new(
        &config.secret_key,
        config.access_token_expire_minutes,
    ));
    let password_hasher = PasswordHasher::new(config.bcrypt_cost);

    let audit_service = Arc::new(AuditService::new(
        repositories.audit_log_repository.clone(),
    ));
    let settings_service = Arc::new(SettingsService::new(
        repositories.settings_repository.clone(),
        repositories.question_repository.clone(),
        audit_service.clone(),
    ));
    let auth_service = Arc::new(AuthService::new(
        repositories.user_repository.clone(),
        token_service,
        password_hasher,
        audit_service.clone(),
        config.admin_register_key.clone(),
    ));
    let profile_service = Arc::new(ProfileService::new(
        repositories.profile_repository.clone(),
        audit_service.clone(),
    ));
    let question_service = Arc::new(QuestionService::new(
        repositories.question_repository.clone(),
        audit_service.clone(),
    ));
    let exam_service = Arc::new(ExamService::new(
        repositories.question_repository.clone(),
        repositories.exam_result_repository.clone(),
        repositories.profile_repository.clone(),
        repositories.user_repository.clone(),
        settings_service.clone(),
        audit_service.clone(),
    ));
    let admin_service = Arc::new(AdminService::new(
        repositories.user_repository.clone(),
        repositories.profile_repository.clone(),
        repositories.exam_result_repository.clone(),
        audit_service.clone(),
        password_hasher,
    ));
    let access_service = Arc::new(AccessService::new(
        repositories.user_repository.clone(),
        audit_service.clone(),
    ));

    AppServices {
        auth_service,
        profile_service,
        question_service,
        exam_service,
        settings_service,
        admin_service,
        access_service,
        audit_service,
    }
}

fn build_repositories(data_directory: &DataDirectory) -> AppRepositories {
    AppRepositories {
        user_repository: Arc::new(FileUserRepository::new(
            data_directory.users().to_path_buf(),
        )),
        profile_repository: Arc::new(FileProfileRepository::new(
            data_directory.student_profiles().to_path_buf(),
            data_directory.instructor_profiles().to_path_buf(),
        )),
        question_repository: Arc::new(FileQuestionRepository::new(
            data_directory.questions().to_path_buf(),
        )),
        exam_result_repository: Arc::new(FileExamResultRepository::new(
            data_directory.exam_results().to_path_buf(),
        )),
        settings_repository: Arc::new(FileSettingsRepository::new(
            data_directory.settings_file().to_path_buf(),
        )),
        audit_log_repository: Arc::new(FileAuditLogRepository::new(
            data_directory.audit_log_file().to_path_buf(),
        )),
    }
}
