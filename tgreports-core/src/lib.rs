//! # tgreports-core
//!
//! The formatting and policy layer of tgreports. Nothing here performs I/O:
//! an [`Event`] goes in, a [`RenderedMessage`] with its [`Delivery`] decision
//! comes out.
//!
//! ### Key Submodules:
//! - `payload`: ordered `key = value` payloads and error-shaped payloads
//! - `source`: call-site capture and error tracebacks
//! - `classify`: severity escalation
//! - `render`: message composition
//! - `gate`: journal-only vs. journal-and-chat decision

pub mod classify;
pub mod error;
pub mod gate;
pub mod payload;
pub mod render;
pub mod severity;
pub mod source;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::gate::*;
    pub use crate::payload::*;
    pub use crate::render::*;
    pub use crate::severity::*;
    pub use crate::source::*;
}

pub use classify::effective_severity;
pub use error::ReportError;
pub use gate::{Delivery, Mode};
pub use payload::{ErrorPayload, Extra, Payload, PayloadValue};
pub use render::{render, Event, RenderedMessage};
pub use severity::Severity;
pub use source::{CallSite, Fault};
