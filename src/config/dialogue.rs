//! Dialogue behaviour configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::DialogueEngineConfig;

/// Questionnaire and review settings
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Upper bound on one review generation call, in seconds
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,

    /// Text placed before the numbered answers; may be empty
    #[serde(default = "default_prompt_preamble")]
    pub prompt_preamble: String,

    /// Sessions untouched for longer than this are evicted, in seconds
    #[serde(default = "default_session_idle_timeout")]
    pub session_idle_timeout_secs: u64,

    /// How often the idle sweeper runs, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Share link base; the review is appended as `?text=...`
    #[serde(default = "default_export_base_url")]
    pub export_base_url: String,
}

impl DialogueConfig {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn engine_config(&self) -> DialogueEngineConfig {
        DialogueEngineConfig {
            prompt_preamble: self.prompt_preamble.clone(),
            generation_timeout: self.generation_timeout(),
        }
    }

    /// Validate dialogue configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.generation_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("dialogue.generation_timeout_secs"));
        }
        if self.session_idle_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("dialogue.session_idle_timeout_secs"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidTimeout("dialogue.sweep_interval_secs"));
        }

        let url = url::Url::parse(&self.export_base_url).map_err(|e| ValidationError::InvalidUrl {
            field: "dialogue.export_base_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                field: "dialogue.export_base_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            generation_timeout_secs: default_generation_timeout(),
            prompt_preamble: default_prompt_preamble(),
            session_idle_timeout_secs: default_session_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            export_base_url: default_export_base_url(),
        }
    }
}

fn default_generation_timeout() -> u64 {
    60
}

fn default_prompt_preamble() -> String {
    "Write a customer review based on the following answers:\n\n".to_string()
}

fn default_session_idle_timeout() -> u64 {
    86_400
}

fn default_sweep_interval() -> u64 {
    600
}

fn default_export_base_url() -> String {
    "https://api.whatsapp.com/send".to_string()
}
