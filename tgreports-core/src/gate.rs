//! Delivery gate: whether a report is only journaled or also sent to chat.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Deployment modes that turn `info` reports into chat messages.
pub const ALERTING_MODES: [&str; 2] = ["PRE", "PROD"];

/// Deployment mode label, e.g. `DEV`, `PRE`, `PROD`. Free-form and compared
/// case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mode(String);

impl Mode {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_alerting(&self) -> bool {
        ALERTING_MODES.contains(&self.0.as_str())
    }

    /// The hashtag every report carries, without the leading `#`.
    pub fn tag(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mode {
    fn from(label: &str) -> Self {
        Mode::new(label)
    }
}

impl From<String> for Mode {
    fn from(label: String) -> Self {
        Mode(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    LogOnly,
    LogAndDispatch,
}

impl Delivery {
    /// Applies the gate to an effective severity.
    pub fn decide(severity: Severity, mode: &Mode, silent: bool) -> Self {
        let dispatch = match severity {
            Severity::Debug => false,
            Severity::Info => mode.is_alerting() && !silent,
            Severity::Warning
            | Severity::Error
            | Severity::Critical
            | Severity::Important
            | Severity::Request => !silent,
        };
        if dispatch {
            Delivery::LogAndDispatch
        } else {
            Delivery::LogOnly
        }
    }

    pub fn dispatches(self) -> bool {
        self == Delivery::LogAndDispatch
    }
}
