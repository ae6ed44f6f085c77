//! The reporter handle and its per-call report builder.

use std::error::Error;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use tgreports_config::ReportsConfig;
use tgreports_core::{
    render, CallSite, Delivery, Event, Extra, Fault, Mode, RenderedMessage, ReportError, Severity,
};
use tgreports_telemetry::{ReportMetrics, ERROR_TARGET, JOURNAL_TARGET};
use tracing::{debug, error, info, warn};

use crate::transport::{ChatTransport, TelegramTransport, TransportError};

/// Writes reports to the log files and forwards them to a chat.
///
/// Construct one per service and hand out clones; it is immutable and cheap
/// to clone.
#[derive(Clone)]
pub struct Reporter {
    mode: Mode,
    chat_id: String,
    transport: Arc<dyn ChatTransport>,
    metrics: Option<ReportMetrics>,
}

impl Reporter {
    /// A reporter that sends to Telegram with the given bot token.
    pub fn new(
        mode: impl Into<Mode>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let transport = TelegramTransport::new(token)?;
        Ok(Self::with_transport(mode, chat_id, Arc::new(transport)))
    }

    pub fn from_config(config: &ReportsConfig) -> Result<Self, TransportError> {
        let transport =
            TelegramTransport::with_api_url(&config.telegram.token, &config.telegram.api_url)?;
        Ok(Self::with_transport(
            config.reporter.mode.as_str(),
            &config.telegram.chat_id,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        mode: impl Into<Mode>,
        chat_id: impl Into<String>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            mode: mode.into(),
            chat_id: chat_id.into(),
            transport,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: ReportMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Sequence of function calls, internal values. Journal only.
    #[track_caller]
    pub fn debug(&self, text: impl Into<String>) -> Report<'_> {
        self.report(Severity::Debug, text)
    }

    /// System logs and event journal. Sent to chat in `PRE` and `PROD`.
    #[track_caller]
    pub fn info(&self, text: impl Into<String>) -> Report<'_> {
        self.report(Severity::Info, text)
    }

    /// Unexpected behavior that does not entail consequences.
    #[track_caller]
    pub fn warning(&self, text: impl Into<String>) -> Report<'_> {
        self.report(Severity::Warning, text)
    }

    /// An unhandled error occurred.
    #[track_caller]
    pub fn error(&self, text: impl Into<String>) -> Report<'_> {
        self.report(Severity::Error, text)
    }

    /// An error occurred that affects the operation of the service.
    #[track_caller]
    pub fn critical(&self, text: impl Into<String>) -> Report<'_> {
        self.report(Severity::Critical, text)
    }

    /// A tracked user action fired.
    #[track_caller]
    pub fn important(&self, text: impl Into<String>) -> Report<'_> {
        self.report(Severity::Important, text)
    }

    /// A user request needs an administrator.
    #[track_caller]
    pub fn request(&self, text: impl Into<String>) -> Report<'_> {
        self.report(Severity::Request, text)
    }

    /// Starts a report with a severity chosen at runtime.
    #[track_caller]
    pub fn report(&self, severity: Severity, text: impl Into<String>) -> Report<'_> {
        let mut event = Event::new(severity, text);
        event.call_site = Some(CallSite::caller());
        Report {
            reporter: self,
            event,
        }
    }

    /// Renders an event the way it would be journaled and sent.
    pub fn render(&self, event: &Event) -> RenderedMessage {
        render(&self.mode, event)
    }

    async fn submit(&self, event: Event) -> Delivery {
        let rendered = self.render(&event);
        self.journal(&rendered);
        if let Some(metrics) = &self.metrics {
            metrics.record_report(rendered.severity.label());
        }

        if rendered.delivery.dispatches() {
            match self.transport.send(&self.chat_id, &rendered.text).await {
                Ok(()) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_dispatched();
                    }
                }
                Err(err) => {
                    error!(
                        target: ERROR_TARGET,
                        mode = %self.mode,
                        "{}  Send report  {} {}  {}",
                        Severity::Error.emoji(),
                        rendered.severity,
                        rendered.text,
                        err,
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_dispatch_failures();
                    }
                }
            }
        }

        rendered.delivery
    }

    fn journal(&self, rendered: &RenderedMessage) {
        let line = &rendered.journal;
        match rendered.severity {
            Severity::Debug => debug!(target: JOURNAL_TARGET, mode = %self.mode, "{line}"),
            Severity::Info | Severity::Important | Severity::Request => {
                info!(target: JOURNAL_TARGET, mode = %self.mode, "{line}")
            }
            Severity::Warning => warn!(target: ERROR_TARGET, mode = %self.mode, "{line}"),
            Severity::Error => error!(target: ERROR_TARGET, mode = %self.mode, "{line}"),
            Severity::Critical => {
                error!(target: ERROR_TARGET, mode = %self.mode, critical = true, "{line}")
            }
        }
    }
}

/// A report being assembled. Nothing is written or sent until it is awaited.
#[must_use = "a report does nothing until it is awaited"]
pub struct Report<'a> {
    reporter: &'a Reporter,
    event: Event,
}

impl<'a> Report<'a> {
    /// Attaches a payload. An [`ErrorPayload`](tgreports_core::ErrorPayload)
    /// escalates the report to an error.
    pub fn extra(mut self, extra: impl Into<Extra>) -> Self {
        self.event.extra = Some(extra.into());
        self
    }

    /// Attaches an untyped JSON payload, such as one forwarded by another
    /// service. Objects with `"Error"` under `name` or `title` escalate.
    pub fn extra_json(mut self, value: serde_json::Value) -> Result<Self, ReportError> {
        self.event.extra = Some(Extra::from_json(value)?);
        Ok(self)
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.event.tags.push(tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.event.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Keeps the report out of the chat; it is still journaled.
    pub fn silent(mut self, silent: bool) -> Self {
        self.event.silent = silent;
        self
    }

    /// Attaches an error: its traceback is rendered and the report points to
    /// this call instead of the report's own call site.
    #[track_caller]
    pub fn error<E: Error + ?Sized>(mut self, err: &E) -> Self {
        self.event.fault = Some(Fault::capture(err));
        self
    }

    pub fn fault(mut self, fault: Fault) -> Self {
        self.event.fault = Some(fault);
        self
    }

    /// Overrides the captured call site, e.g. with [`tgreports_core::call_site!`].
    pub fn at(mut self, call_site: CallSite) -> Self {
        self.event.call_site = Some(call_site);
        self
    }

    /// Drops the captured call site, for reports relayed on behalf of code
    /// that is not in this process.
    pub fn without_call_site(mut self) -> Self {
        self.event.call_site = None;
        self
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn render(&self) -> RenderedMessage {
        self.reporter.render(&self.event)
    }

    /// Journals the report and, when the gate allows, sends it to chat.
    /// Delivery failures are logged, never returned.
    pub async fn send(self) -> Delivery {
        self.reporter.submit(self.event).await
    }
}

impl<'a> IntoFuture for Report<'a> {
    type Output = Delivery;
    type IntoFuture = Pin<Box<dyn Future<Output = Delivery> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}
