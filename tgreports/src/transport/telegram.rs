//! Telegram Bot API transport (`sendMessage`).

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatTransport, TransportError};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Longest message the Bot API accepts, in UTF-16 code units.
pub const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Clone)]
pub struct TelegramTransport {
    client: Client,
    api_url: String,
    token: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramTransport {
    pub fn new(token: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_api_url(token, TELEGRAM_API_URL)
    }

    /// Uses a different Bot API server, e.g. a self-hosted one.
    pub fn with_api_url(
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        if self.token.is_empty() || chat_id.is_empty() {
            return Err(TransportError::NotConfigured);
        }

        let text = truncate(text, MAX_MESSAGE_CHARS);
        let response = self
            .client
            .post(self.endpoint())
            .json(&SendMessage {
                chat_id,
                text: &text,
                disable_web_page_preview: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse = response.json().await?;
        if body.ok {
            Ok(())
        } else {
            Err(TransportError::Api(
                body.description.unwrap_or_else(|| status.to_string()),
            ))
        }
    }
}

impl fmt::Debug for TelegramTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramTransport")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Cuts `text` to at most `max` UTF-16 code units, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.encode_utf16().count() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub('…'.len_utf16());
    let mut used = 0;
    let mut cut = String::new();
    for ch in text.chars() {
        used += ch.len_utf16();
        if used > budget {
            break;
        }
        cut.push(ch);
    }
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers a single HTTP request and returns the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn posts_send_message() {
        let (url, server) = serve_once("200 OK", r#"{"ok":true,"result":{}}"#).await;
        let transport = TelegramTransport::with_api_url("123:abc", format!("{url}/")).unwrap();

        transport.send("-100200", "🟡 PROD WARNING").await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /bot123:abc/sendMessage HTTP/1.1"));
        assert!(request.contains(r#""chat_id":"-100200""#));
        assert!(request.contains(r#""disable_web_page_preview":true"#));
        assert!(request.contains("🟡 PROD WARNING"));
    }

    #[tokio::test]
    async fn api_errors_carry_the_description() {
        let (url, server) = serve_once(
            "400 Bad Request",
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .await;
        let transport = TelegramTransport::with_api_url("123:abc", url).unwrap();

        let err = transport.send("-1", "hello").await.unwrap_err();
        server.await.unwrap();
        assert!(
            matches!(err, TransportError::Api(ref description) if description == "Bad Request: chat not found")
        );
    }

    #[tokio::test]
    async fn unconfigured_transport_does_not_call_out() {
        let transport = TelegramTransport::new("").unwrap();
        assert!(matches!(
            transport.send("-1", "hello").await,
            Err(TransportError::NotConfigured)
        ));
    }

    #[test]
    fn long_messages_are_truncated() {
        assert_eq!(truncate("short", 10), "short");
        let cut = truncate(&"x".repeat(5000), MAX_MESSAGE_CHARS);
        assert_eq!(cut.encode_utf16().count(), MAX_MESSAGE_CHARS);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn truncation_counts_utf16_units() {
        // 3000 emoji fit in 4096 characters but not in 4096 UTF-16 units.
        let text = "🔴".repeat(3000);
        let cut = truncate(&text, MAX_MESSAGE_CHARS);
        assert!(cut.encode_utf16().count() <= MAX_MESSAGE_CHARS);
        assert_eq!(cut.encode_utf16().count(), 4095);
        assert!(cut.ends_with('…'));

        let fits = "🔴".repeat(2048);
        assert_eq!(truncate(&fits, MAX_MESSAGE_CHARS), fits);
    }

    #[tokio::test]
    async fn connection_errors_do_not_leak_the_token() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            TelegramTransport::with_api_url("123:supersecret", format!("http://{addr}")).unwrap();
        let err = transport.send("-1", "hello").await.unwrap_err();

        assert!(matches!(err, TransportError::Request(_)));
        assert!(!err.to_string().contains("supersecret"));
        assert!(!format!("{err:?}").contains("supersecret"));
    }

    #[test]
    fn debug_hides_token() {
        let transport = TelegramTransport::new("123:secret").unwrap();
        assert!(!format!("{transport:?}").contains("secret"));
    }
}
