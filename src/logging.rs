use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_LOG_FILE: &str = "organize_desktop.log";
pub const LOG_FILTER_ENV: &str = "DESKTIDY_LOG";

/// Sends tracing events to `log_file`, filtered by `DESKTIDY_LOG`
/// (default `info`). Terminal output is left to `OutputFormatter`.
///
/// Keep the returned guard alive until the program exits, or buffered
/// events are lost.
pub fn init_logger(log_file: &Path) -> Result<WorkerGuard, String> {
    let filter_layer =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| format!("cannot open log file {}: {}", log_file.display(), e))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .try_init()
        .map_err(|e| e.to_string())?;

    info!(log_file = %log_file.display(), "logging initialized");
    Ok(guard)
}
