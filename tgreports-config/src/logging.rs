//! File logging configuration.
//!
//! Two append-mode destinations: the journal (every report) and the error
//! log (warnings, errors and failed chat deliveries).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Directory holding the log files; created on startup.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Journal file name (rotated files get a date suffix).
    #[serde(default = "default_journal_file")]
    pub journal_file: String,

    /// Error log file name.
    #[serde(default = "default_error_file")]
    pub error_file: String,

    /// Minimum level written to the journal.
    #[validate(custom(function = validation::validate_level))]
    #[serde(default = "default_level")]
    pub level: String,

    /// File rotation: never, minutely, hourly or daily.
    #[validate(custom(function = validation::validate_rotation))]
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Mirror reports to stdout.
    #[serde(default = "default_true")]
    pub console: bool,
}

fn default_directory() -> PathBuf {
    "logs".into()
}

fn default_journal_file() -> String {
    "journal.log".into()
}

fn default_error_file() -> String {
    "errors.log".into()
}

fn default_level() -> String {
    "debug".into()
}

fn default_rotation() -> String {
    "never".into()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            journal_file: default_journal_file(),
            error_file: default_error_file(),
            level: default_level(),
            rotation: default_rotation(),
            console: default_true(),
        }
    }
}
