//! Report composition.
//!
//! A rendered report is made of blocks separated by a blank line:
//!
//! ```text
//! 🔴 PROD ERROR
//! src/api/users.rs:42
//! api.users
//!
//! Could not create user
//!
//! Error: connection refused
//!
//! user = alice
//! attempt = 3
//!
//! #prod #signup
//! ```

use crate::classify::effective_severity;
use crate::gate::{Delivery, Mode};
use crate::payload::Extra;
use crate::severity::Severity;
use crate::source::{CallSite, Fault};

/// One report call.
#[derive(Debug, Clone)]
pub struct Event {
    pub severity: Severity,
    pub text: String,
    pub extra: Option<Extra>,
    pub tags: Vec<String>,
    pub fault: Option<Fault>,
    pub silent: bool,
    pub call_site: Option<CallSite>,
}

impl Event {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            extra: None,
            tags: Vec::new(),
            fault: None,
            silent: false,
            call_site: None,
        }
    }

    /// Where the report points to: the fault's capture site, else the call site.
    pub fn source(&self) -> Option<&CallSite> {
        self.fault
            .as_ref()
            .and_then(Fault::origin)
            .or(self.call_site.as_ref())
    }
}

/// The outcome of rendering an [`Event`] for a given mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Severity after escalation.
    pub severity: Severity,
    /// Chat message text.
    pub text: String,
    /// Line written to the log file.
    pub journal: String,
    pub delivery: Delivery,
}

pub fn render(mode: &Mode, event: &Event) -> RenderedMessage {
    let severity = effective_severity(event.severity, event.extra.as_ref());

    let mut header = format!("{} {} {}", severity.emoji(), mode, severity.label());
    if !severity.suppresses_source() {
        if let Some(source) = event.source() {
            header.push('\n');
            header.push_str(&source.to_string());
        }
    }

    let mut blocks = vec![header];
    if !event.text.is_empty() {
        blocks.push(event.text.clone());
    }
    if let Some(fault) = &event.fault {
        blocks.push(fault.traceback());
    }
    if let Some(extra) = &event.extra {
        let lines = extra.payload().lines();
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }
    blocks.push(hashtags(mode, &event.tags));

    RenderedMessage {
        severity,
        text: blocks.join("\n\n"),
        journal: journal_line(severity, event),
        delivery: Delivery::decide(severity, mode, event.silent),
    }
}

/// `#<mode>` followed by the caller's tags.
pub fn hashtags(mode: &Mode, tags: &[String]) -> String {
    let mut line = format!("#{}", mode.tag());
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#');
        if !tag.is_empty() {
            line.push_str(" #");
            line.push_str(tag);
        }
    }
    line
}

fn journal_line(severity: Severity, event: &Event) -> String {
    match &event.fault {
        Some(fault) => format!("{}  {}", severity.emoji(), fault.traceback()),
        None => {
            let extra = event
                .extra
                .as_ref()
                .map_or(serde_json::Value::Null, |extra| extra.payload().to_json());
            format!("{}  {}  {}", severity.emoji(), event.text, extra)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{ErrorPayload, Payload};
    use serde_json::json;
    use std::collections::HashSet;

    fn site() -> CallSite {
        CallSite::new("service/src/api/users.rs", 42)
    }

    #[test]
    fn full_layout() {
        let mut event = Event::new(Severity::Warning, "Slow query");
        event.call_site = Some(site());
        event.extra = Some(Payload::new().with("ms", 1200).with("table", "users").into());
        event.tags = vec!["db".into()];

        let rendered = render(&Mode::new("PROD"), &event);
        assert_eq!(
            rendered.text,
            "🟡 PROD WARNING\nservice/src/api/users.rs:42\napi.users\n\n\
             Slow query\n\n\
             ms = 1200\ntable = users\n\n\
             #prod #db"
        );
        assert_eq!(rendered.severity, Severity::Warning);
        assert_eq!(rendered.delivery, Delivery::LogAndDispatch);
        assert_eq!(rendered.journal, r#"🟡  Slow query  {"ms":1200,"table":"users"}"#);
    }

    #[test]
    fn info_leaves_out_the_source() {
        let mut event = Event::new(Severity::Info, "User signed in");
        event.call_site = Some(site());
        let rendered = render(&Mode::new("DEV"), &event);
        assert_eq!(rendered.text, "🟢 DEV INFO\n\nUser signed in\n\n#dev");
        assert_eq!(rendered.delivery, Delivery::LogOnly);
        assert_eq!(rendered.journal, "🟢  User signed in  null");
    }

    #[test]
    fn fault_adds_traceback_and_points_to_its_origin() {
        let mut event = Event::new(Severity::Error, "Import failed");
        event.call_site = Some(site());
        event.fault = Some(Fault::from_message("disk full").at(CallSite::new("src/jobs/import.rs", 9)));

        let rendered = render(&Mode::new("PROD"), &event);
        assert!(rendered.text.contains("src/jobs/import.rs:9\njobs.import"));
        assert!(!rendered.text.contains("users.rs:42"));
        assert!(rendered.text.contains("\n\nError: disk full"));
        assert!(rendered.journal.starts_with("🔴  Error: disk full"));
    }

    #[test]
    fn warning_with_fault_journals_the_traceback() {
        let mut event = Event::new(Severity::Warning, "Cache refresh failed");
        event.fault = Some(Fault::from_message("redis timeout"));

        let rendered = render(&Mode::new("PROD"), &event);
        assert!(rendered.text.contains("\n\nError: redis timeout"));
        assert!(rendered.journal.starts_with("🟡  Error: redis timeout"));
    }

    #[test]
    fn fault_without_origin_falls_back_to_the_call_site() {
        let mut event = Event::new(Severity::Error, "Import failed");
        event.call_site = Some(site());
        event.fault = Some(Fault::from_message("disk full").without_origin());

        let rendered = render(&Mode::new("PROD"), &event);
        assert!(rendered.text.contains("service/src/api/users.rs:42"));
    }

    #[test]
    fn without_fault_the_call_site_is_shown() {
        let mut event = Event::new(Severity::Error, "Import failed");
        event.call_site = Some(site());
        let rendered = render(&Mode::new("PROD"), &event);
        assert!(rendered.text.contains("service/src/api/users.rs:42"));
        assert!(!rendered.text.contains("Error:"));
    }

    #[test]
    fn error_shaped_info_matches_error() {
        let payload = Payload::new().with("name", "Error").with("message", "boom");

        let mut forwarded = Event::new(Severity::Info, "Upstream failure");
        forwarded.extra = Some(Extra::from_json(json!({"name": "Error", "message": "boom"})).unwrap());
        let mut direct = Event::new(Severity::Error, "Upstream failure");
        direct.extra = Some(ErrorPayload(payload).into());

        for mode in ["DEV", "PROD"] {
            let mode = Mode::new(mode);
            let a = render(&mode, &forwarded);
            let b = render(&mode, &direct);
            assert_eq!(a.severity, Severity::Error);
            assert_eq!(a.severity, b.severity);
            assert_eq!(a.delivery, b.delivery);
            assert_eq!(a.text, b.text);
        }
    }

    #[test]
    fn mode_tag_always_leads() {
        assert_eq!(hashtags(&Mode::new("PRE"), &[]), "#pre");
        assert_eq!(
            hashtags(&Mode::new("PRE"), &["cache".into(), "#hot".into(), " ".into()]),
            "#pre #cache #hot"
        );
    }

    #[test]
    fn absent_values_and_sets_in_message() {
        let mut event = Event::new(Severity::Important, "Order placed");
        event.extra = Some(
            Payload::new()
                .with("coupon", None::<String>)
                .with("items", HashSet::from(["book"]))
                .into(),
        );
        let rendered = render(&Mode::new("PROD"), &event);
        assert!(!rendered.text.contains("coupon"));
        assert!(rendered.text.contains("items = {\"book\"}"));
    }
}
