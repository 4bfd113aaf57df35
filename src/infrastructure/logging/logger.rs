use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "reviewer";
const LOG_FILE_SUFFIX: &str = "log";
const DEFAULT_FILTER: &str = "info";

static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the process-wide subscriber: colored console output plus a daily
/// `reviewer.<date>.log` under `log_dir`. `RUST_LOG` overrides the level.
///
/// A second call is a no-op.
pub fn init_logger(log_dir: &Path) -> Result<(), String> {
    if FILE_WRITER_GUARD.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)
        .map_err(|error| format!("Failed to create log directory {:?}: {}", log_dir, error))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)
        .map_err(|error| format!("Failed to open log file in {:?}: {}", log_dir, error))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|error| format!("Failed to install log subscriber: {}", error))?;

    // Dropping the guard would stop the background file writer.
    let _ = FILE_WRITER_GUARD.set(guard);

    tracing::debug!(directory = ?log_dir, "Logger initialized");
    Ok(())
}

pub fn debug(message: &str) {
    tracing::debug!("{}", message);
}

pub fn warn(message: &str) {
    tracing::warn!("{}", message);
}

/// Logs at error level, skipping blank messages.
pub fn error(message: &str) {
    let message = message.trim();
    if !message.is_empty() {
        tracing::error!("{}", message);
    }
}
