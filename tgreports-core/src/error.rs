use thiserror::Error;

/// Caller-input errors. These indicate a programming mistake at the call site
/// and are surfaced immediately instead of being logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Unknown severity: {0:?}")]
    UnknownSeverity(String),

    #[error("Payload must be a JSON object, got {0}")]
    MalformedPayload(&'static str),
}
