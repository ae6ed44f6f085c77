//! Chat delivery.
//!
//! The reporter needs a single capability from a transport: send a text to a
//! chat. Failures are returned to the reporter, which logs them.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod telegram;

pub use memory::{MemoryTransport, SentMessage};
pub use telegram::TelegramTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("Chat API error: {0}")]
    Api(String),

    #[error("Chat transport is not configured (missing token or chat id)")]
    NotConfigured,
}

/// The request URL carries the bot token, so it never reaches the error.
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Request(err.without_url())
    }
}

/// Sends a text message to a chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), TransportError>;
}
