//! In-memory transport for tests and dry runs.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ChatTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: String,
    pub text: String,
}

/// Records every message it is asked to send. A failing transport records
/// nothing and returns an API error instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failure: Option<String>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(description: impl Into<String>) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(description.into()),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ChatTransport for MemoryTransport {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        if let Some(description) = &self.failure {
            return Err(TransportError::Api(description.clone()));
        }
        self.sent.lock().push(SentMessage {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
