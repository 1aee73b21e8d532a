//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr once the app is running.

use crate::CONFIG_DIRECTORY;
use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "overture.log";

/// `$DATA_LOCAL/overture/logs`, or `.logs` when there is no data directory.
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(CONFIG_DIRECTORY).join("logs"))
        .unwrap_or_else(|| PathBuf::from(".logs"))
}

/// Daily rotating log file. Level comes from `RUST_LOG`, defaulting to
/// debug for this crate and warn for everything else.
pub fn init_logging() -> Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes on drop; must outlive every log call
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("overture=debug,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(log_dir)
}
