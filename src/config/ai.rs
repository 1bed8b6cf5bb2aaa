//! Review generation (OpenAI chat completions) configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::OpenAIConfig;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Secret<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL; override for proxies or compatible endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// System message sent ahead of the assembled prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for rate limits, 5xx and network errors
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client configuration for [`crate::adapters::ai::OpenAIGenerationClient`].
    pub fn openai(&self) -> OpenAIConfig {
        OpenAIConfig::from_secret(self.openai_api_key.clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_system_prompt(self.system_prompt.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_timeout(self.timeout())
            .with_max_retries(self.max_retries)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(ValidationError::InvalidUrl {
                field: "ai.base_url",
                reason: e.to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: Secret::new(String::new()),
            model: default_model(),
            base_url: default_base_url(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_system_prompt() -> String {
    "You help compose a customer review.".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    200
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AiConfig {
        AiConfig {
            openai_api_key: Secret::new("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validation_missing_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("AI__OPENAI_API_KEY"))
        );
    }

    #[test]
    fn test_validation_temperature_range() {
        let config = AiConfig {
            temperature: 3.5,
            ..with_key()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }

    #[test]
    fn test_validation_bad_base_url() {
        let config = AiConfig {
            base_url: "api.openai.com".to_string(),
            ..with_key()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUrl { field: "ai.base_url", .. })
        ));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(with_key().validate().is_ok());
    }

    #[test]
    fn test_openai_config_carries_settings() {
        let config = AiConfig {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 120,
            ..with_key()
        };
        let openai = config.openai();
        assert_eq!(openai.model, "gpt-4o-mini");
        assert_eq!(openai.max_tokens, 120);
    }
}
