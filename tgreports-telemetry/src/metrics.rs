//! ## tgreports-telemetry::metrics
//! **Prometheus counters for reports**
//!
//! - `tgreports_reports_total{severity}`: every report, by effective severity
//! - `tgreports_dispatched_total`: chat messages accepted by the transport
//! - `tgreports_dispatch_failures_total`: chat messages that failed

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::TelemetryError;

#[derive(Debug, Clone)]
pub struct ReportMetrics {
    pub registry: Registry,
    pub reports: IntCounterVec,
    pub dispatched: IntCounter,
    pub dispatch_failures: IntCounter,
}

impl ReportMetrics {
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();
        let reports = IntCounterVec::new(
            Opts::new("tgreports_reports_total", "Reports by effective severity"),
            &["severity"],
        )?;
        let dispatched =
            IntCounter::new("tgreports_dispatched_total", "Reports delivered to chat")?;
        let dispatch_failures = IntCounter::new(
            "tgreports_dispatch_failures_total",
            "Reports whose chat delivery failed",
        )?;

        registry.register(Box::new(reports.clone()))?;
        registry.register(Box::new(dispatched.clone()))?;
        registry.register(Box::new(dispatch_failures.clone()))?;

        Ok(Self {
            registry,
            reports,
            dispatched,
            dispatch_failures,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, TelemetryError> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn record_report(&self, severity: &str) {
        self.reports.with_label_values(&[severity]).inc();
    }

    pub fn inc_dispatched(&self) {
        self.dispatched.inc();
    }

    pub fn inc_dispatch_failures(&self) {
        self.dispatch_failures.inc();
    }
}
