//! Tracing subscriber setup.
//!
//! Console output is human-readable and filtered by `logging.level`. With
//! `logging.json_file` set, a second layer writes JSON lines to a daily-rotated
//! `flowhook.log`.

use std::path::PathBuf;

use flowhook_config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// File name prefix for the rotating JSON log.
const LOG_FILE_NAME: &str = "flowhook.log";

/// Filter for the JSON file layer; always verbose for flowhook crates.
const FILE_FILTER: &str = "flowhook_triggers=trace,flowhook_config=trace,info";

/// Install the global tracing subscriber.
///
/// Returns the file writer guard when file logging is enabled; keep it alive
/// for the life of the process or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, TryInitError> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(EnvFilter::new(&config.level));

    let (file, guard) = if config.json_file {
        let appender = tracing_appender::rolling::daily(log_directory(config), LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_filter(EnvFilter::new(FILE_FILTER));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;
    Ok(guard)
}

/// Directory for the JSON log file.
pub fn log_directory(config: &LoggingConfig) -> PathBuf {
    config
        .directory
        .clone()
        .or_else(|| flowhook_config::xdg_config_dir().map(|d| d.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
