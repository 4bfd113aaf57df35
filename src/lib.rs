use std::sync::Arc;

mod app;
mod application;
mod domain;
mod infrastructure;
mod presentation;

use app::AppState;
use infrastructure::config::AppConfig;
use infrastructure::logging::logger;

/// Loads configuration, prepares the data directory and serves the API until shutdown.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    if let Err(error) = logger::init_logger(&config.log_dir) {
        eprintln!("Failed to initialize logger: {}", error);
    }

    tracing::info!("Starting Reviewer API");
    announce_config(&config);

    let state = AppState::new(config).await?;
    state.seed_defaults().await?;

    app::serve(Arc::new(state)).await?;
    Ok(())
}

/// Startup notes about where configuration came from. Runs once the logger is installed.
fn announce_config(config: &AppConfig) {
    if let Some(path) = &config.env_file {
        tracing::debug!("Loaded environment overrides from {:?}", path);
    }
    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; using the built-in development secret");
    }
}
