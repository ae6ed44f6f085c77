//! Custom validation functions for configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static CHAT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?[0-9]+|@[A-Za-z][A-Za-z0-9_]{4,})$").expect("chat id pattern compiles")
});

/// Validate that a deployment mode is a single non-empty word.
pub fn validate_mode(mode: &str) -> Result<(), ValidationError> {
    if !mode.is_empty() && !mode.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_mode"))
    }
}

/// Validate a Telegram chat id: numeric id, `@channelusername`, or unset.
pub fn validate_chat_id(chat_id: &str) -> Result<(), ValidationError> {
    if chat_id.is_empty() || CHAT_ID.is_match(chat_id) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_chat_id"))
    }
}

/// Validate log level.
pub fn validate_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"].contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_level"))
    }
}

/// Validate log file rotation.
pub fn validate_rotation(rotation: &str) -> Result<(), ValidationError> {
    let valid =
        ["never", "minutely", "hourly", "daily"].contains(&rotation.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_rotation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_ids() {
        assert!(validate_chat_id("").is_ok());
        assert!(validate_chat_id("136563129").is_ok());
        assert!(validate_chat_id("-1001234567890").is_ok());
        assert!(validate_chat_id("@ops_alerts").is_ok());
        assert!(validate_chat_id("@ops").is_err());
        assert!(validate_chat_id("ops alerts").is_err());
    }

    #[test]
    fn modes() {
        assert!(validate_mode("PROD").is_ok());
        assert!(validate_mode("local-dev").is_ok());
        assert!(validate_mode("").is_err());
        assert!(validate_mode("PRE PROD").is_err());
    }

    #[test]
    fn levels_and_rotations() {
        assert!(validate_level("WARN").is_ok());
        assert!(validate_level("verbose").is_err());
        assert!(validate_rotation("daily").is_ok());
        assert!(validate_rotation("weekly").is_err());
    }
}
