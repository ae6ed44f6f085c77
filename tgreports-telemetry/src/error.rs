use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Cannot create log directory {0}: {1}")]
    LogDirectory(PathBuf, #[source] std::io::Error),

    #[error("Cannot open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid log rotation: {0}")]
    InvalidRotation(String),

    #[error("A global logging subscriber is already installed")]
    AlreadyInitialized,

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
