//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `REVIEW_COLLECTOR`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use review_collector::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Polling every {}s", config.telegram.polling_timeout_secs);
//! ```

mod ai;
mod database;
mod dialogue;
mod error;
mod logging;
mod telegram;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use dialogue::DialogueConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Telegram bot token and polling settings
    pub telegram: TelegramConfig,

    /// PostgreSQL connection (users, questions, prompts)
    pub database: DatabaseConfig,

    /// Review generation (OpenAI)
    pub ai: AiConfig,

    /// Questionnaire behaviour
    #[serde(default)]
    pub dialogue: DialogueConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REVIEW_COLLECTOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `REVIEW_COLLECTOR__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    /// - `REVIEW_COLLECTOR__DIALOGUE__GENERATION_TIMEOUT_SECS=45` -> `dialogue.generation_timeout_secs = 45`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REVIEW_COLLECTOR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.telegram.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        self.dialogue.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
