//! # tgreports
//!
//! Report logs and notifications: every report is written to the log files,
//! and depending on its severity and the deployment mode it is also sent to
//! a Telegram chat.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use tgreports::{Payload, Reporter};
//!
//! let reporter = Reporter::new("PROD", "123456:bot-token", "-1001234567890")?;
//!
//! reporter.info("Service started").await;
//! reporter
//!     .warning("Slow query")
//!     .extra(Payload::new().with("ms", 1200).with("table", "users"))
//!     .tag("db")
//!     .await;
//!
//! if let Err(err) = std::fs::read_to_string("settings.yaml") {
//!     reporter.error("Settings unavailable").error(&err).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod reporter;
pub mod transport;

pub use reporter::{Report, Reporter};
pub use transport::{ChatTransport, MemoryTransport, TelegramTransport, TransportError};

pub use tgreports_core::{
    call_site, CallSite, Delivery, ErrorPayload, Event, Extra, Fault, Mode, Payload,
    PayloadValue, RenderedMessage, ReportError, Severity,
};
