//! Effective severity of a report.

use crate::payload::Extra;
use crate::severity::Severity;

/// Error-shaped payloads escalate any declared severity to [`Severity::Error`],
/// so an upstream error forwarded through `info` is handled like one.
pub fn effective_severity(declared: Severity, extra: Option<&Extra>) -> Severity {
    match extra {
        Some(Extra::Error(_)) => Severity::Error,
        _ => declared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{ErrorPayload, Payload};
    use serde_json::json;

    #[test]
    fn plain_payload_keeps_declared_severity() {
        let extra = Extra::from(Payload::new().with("name", "Alice"));
        assert_eq!(
            effective_severity(Severity::Info, Some(&extra)),
            Severity::Info
        );
        assert_eq!(effective_severity(Severity::Request, None), Severity::Request);
    }

    #[test]
    fn error_payload_escalates() {
        let extra = Extra::from(ErrorPayload(Payload::new().with("code", 500)));
        for declared in Severity::ALL {
            assert_eq!(effective_severity(declared, Some(&extra)), Severity::Error);
        }
    }

    #[test]
    fn forwarded_json_error_escalates() {
        let extra = Extra::from_json(json!({"title": "Error", "detail": "timeout"})).unwrap();
        assert_eq!(
            effective_severity(Severity::Info, Some(&extra)),
            Severity::Error
        );
    }
}
