//! # tgreports telemetry
//!
//! File logging destinations for reports and prometheus counters for
//! delivery outcomes.

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{LogGuard, ReportLogger, ERROR_TARGET, JOURNAL_TARGET};
pub use metrics::ReportMetrics;
