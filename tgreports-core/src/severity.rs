//! Report severities.
//!
//! The set is closed and ordered from least to most specific: the five
//! classic log levels followed by the two "business" severities used for
//! tracked user actions and requests that need an administrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Sequence of function calls, internal values.
    Debug,
    /// System logs and event journal.
    Info,
    /// Unexpected behavior without consequences.
    Warning,
    /// An unhandled error occurred.
    Error,
    /// An error that affects the operation of the service.
    Critical,
    /// A tracked user action fired.
    Important,
    /// A user request that needs administrator intervention.
    Request,
}

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Important,
        Severity::Request,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Severity::Debug => "💬",
            Severity::Info => "🟢",
            Severity::Warning => "🟡",
            Severity::Error => "🔴",
            Severity::Critical => "❗️",
            Severity::Important => "✅",
            Severity::Request => "🛎",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Important => "IMPORTANT",
            Severity::Request => "REQUEST",
        }
    }

    /// Severities that are not code-fault signals; file/line context is
    /// left out of their rendered message.
    pub fn suppresses_source(self) -> bool {
        matches!(
            self,
            Severity::Info | Severity::Important | Severity::Request
        )
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReportError::UnknownSeverity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_severity_has_a_glyph() {
        for severity in Severity::ALL {
            assert!(!severity.emoji().is_empty(), "{severity} has no emoji");
        }
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" CRITICAL ".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!("Request".parse::<Severity>(), Ok(Severity::Request));
    }

    #[test]
    fn unknown_label_fails_fast() {
        assert_eq!(
            "fatal".parse::<Severity>(),
            Err(ReportError::UnknownSeverity("fatal".into()))
        );
    }

    #[test]
    fn source_suppression_covers_non_fault_signals() {
        let suppressed: Vec<_> = Severity::ALL
            .into_iter()
            .filter(|s| s.suppresses_source())
            .collect();
        assert_eq!(
            suppressed,
            vec![Severity::Info, Severity::Important, Severity::Request]
        );
    }
}
