use std::sync::Arc;

use tokio::net::TcpListener;

use crate::application::errors::ApplicationError;
use crate::application::services::access_service::AccessService;
use crate::application::services::admin_service::AdminService;
use crate::application::services::audit_service::AuditService;
use crate::application::services::auth_service::AuthService;
use crate::application::services::exam_service::ExamService;
use crate::application::services::profile_service::ProfileService;
use crate::application::services::question_service::QuestionService;
use crate::application::services::settings_service::SettingsService;
use crate::domain::errors::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::file_system::DataDirectory;
use crate::presentation::router::build_router;

mod bootstrap;

pub struct AppState {
    pub config: AppConfig,
    pub data_directory: DataDirectory,
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub question_service: Arc<QuestionService>,
    pub exam_service: Arc<ExamService>,
    pub settings_service: Arc<SettingsService>,
    pub admin_service: Arc<AdminService>,
    pub access_service: Arc<AccessService>,
    pub audit_service: Arc<AuditService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, DomainError> {
        tracing::info!("Initializing application with data root: {:?}", config.data_dir);

        let data_directory = bootstrap::initialize_data_directory(&config.data_dir).await?;
        let services = bootstrap::build_services(&config, &data_directory);

        tracing::info!("Application initialized successfully");

        Ok(Self {
            config,
            data_directory,
            auth_service: services.auth_service,
            profile_service: services.profile_service,
            question_service: services.question_service,
            exam_service: services.exam_service,
            settings_service: services.settings_service,
            admin_service: services.admin_service,
            access_service: services.access_service,
            audit_service: services.audit_service,
        })
    }

    /// Seeds the question bank, persists default settings and ensures an admin exists.
    pub async fn seed_defaults(&self) -> Result<(), ApplicationError> {
        let seeded = self.question_service.seed_questions().await?;
        if seeded > 0 {
            tracing::info!("Seeded {} default questions", seeded);
        }

        self.settings_service.get_or_create().await?;

        self.auth_service
            .ensure_admin_user(&self.config.admin_email, &self.config.admin_password)
            .await
    }
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub async fn serve(state: Arc<AppState>) -> std::io::Result<()> {
    let address = state.config.bind_address();
    let state_root = state.data_directory.root().to_path_buf();
    let app = build_router(state);

    let listener = TcpListener::bind(address).await.map_err(|e| {
        tracing::error!("Failed to bind {}: {}", address, e);
        e
    })?;
    tracing::info!(
        "Reviewer API listening on http://{} (data: {:?})",
        address,
        state_root
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Reviewer API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
