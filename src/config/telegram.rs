//! Telegram Bot API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Telegram configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    pub bot_token: Secret<String>,

    /// Long-polling timeout passed to `getUpdates`, in seconds
    #[serde(default = "default_polling_timeout")]
    pub polling_timeout_secs: u32,
}

impl TelegramConfig {
    /// Validate telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        // Telegram caps long polling at 50 seconds
        if self.polling_timeout_secs > 50 {
            return Err(ValidationError::InvalidTimeout("telegram.polling_timeout_secs"));
        }
        Ok(())
    }
}

fn default_polling_timeout() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str, polling_timeout_secs: u32) -> TelegramConfig {
        TelegramConfig {
            bot_token: Secret::new(token.to_string()),
            polling_timeout_secs,
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config("123:abc", 30).validate().is_ok());
    }

    #[test]
    fn test_validation_blank_token() {
        assert_eq!(
            config("  ", 30).validate(),
            Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"))
        );
    }

    #[test]
    fn test_validation_polling_timeout_too_long() {
        assert!(config("123:abc", 120).validate().is_err());
    }

    #[test]
    fn test_debug_output_hides_token() {
        let debug = format!("{:?}", config("123:super-secret", 30));
        assert!(!debug.contains("super-secret"));
    }
}
