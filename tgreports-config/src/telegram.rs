//! Chat transport credentials.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Telegram Bot API configuration.
#[derive(Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot token issued by @BotFather.
    #[serde(default)]
    pub token: String,

    /// Destination chat: numeric id or `@channelusername`.
    #[validate(custom(function = validation::validate_chat_id))]
    #[serde(default, deserialize_with = "deserialize_chat_id")]
    pub chat_id: String,

    /// Bot API base URL.
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "https://api.telegram.org".into()
}

impl TelegramConfig {
    /// Whether both a token and a destination are set.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.chat_id.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatIdValue {
    Num(i64),
    Str(String),
}

/// Chat ids are usually negative integers; environment variables and bare
/// YAML scalars deliver them as numbers.
fn deserialize_chat_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ChatIdValue::deserialize(deserializer)? {
        ChatIdValue::Num(n) => n.to_string(),
        ChatIdValue::Str(s) => s.trim().to_string(),
    })
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_token() {
        let config = TelegramConfig {
            token: "123:secret".into(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn invalid_api_url() {
        let config = TelegramConfig {
            api_url: "not a url".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
