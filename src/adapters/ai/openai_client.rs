//! OpenAI Generation Client - GenerationClient over the chat completions API.
//!
//! Each prompt becomes one non-streaming request: the configured system
//! message followed by the assembled prompt as the user message. The first
//! choice's text is trimmed and returned as the review.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4")
//!     .with_temperature(0.7)
//!     .with_max_tokens(200);
//!
//! let client = OpenAIGenerationClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ports::{GenerationClient, GenerationError};

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// System message sent ahead of every prompt.
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_secret(Secret::new(api_key.into()))
    }

    /// Creates a new configuration from an already wrapped key.
    pub fn from_secret(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            system_prompt: "You help compose a customer review.".to_string(),
            temperature: 0.7,
            max_tokens: 200,
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI chat completions client.
pub struct OpenAIGenerationClient {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIGenerationClient {
    /// Creates a client with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, prompt: &str) -> OpenAIRequest {
        OpenAIRequest {
            model: self.config.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: self.config.system_prompt.clone(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn send_request(&self, prompt: &str) -> Result<Response, GenerationError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&self.to_openai_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(GenerationError::AuthenticationFailed),
            429 => Err(GenerationError::rate_limited(parse_retry_after(&error_body))),
            500..=599 => Err(GenerationError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(GenerationError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self.send_request(prompt).await?;
        let response = self.handle_response_status(response).await?;
        let body: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(format!("Failed to parse response: {}", e)))?;
        extract_review(body)
    }
}

#[async_trait]
impl GenerationClient for OpenAIGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut retry_count = 0;

        loop {
            match self.attempt(prompt).await {
                Ok(review) => {
                    debug!(model = %self.config.model, chars = review.len(), "Review generated");
                    return Ok(review);
                }
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    warn!(error = %err, attempt = retry_count + 1, "Generation attempt failed, retrying");
                }
                Err(err) => return Err(err),
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            sleep(Duration::from_secs(1 << retry_count.min(5))).await;
            retry_count += 1;
        }
    }
}

/// Takes the first choice's text, trimmed. Blank text is an error.
fn extract_review(response: OpenAIResponse) -> Result<String, GenerationError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::parse("No choices in response"))?;

    let review = choice.message.content.unwrap_or_default().trim().to_string();
    if review.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(review)
}

/// Extracts the "try again in Ns" hint from an error body, defaulting to 30s.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + 13..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAIGenerationClient {
        OpenAIGenerationClient::new(OpenAIConfig::new("test-key")).unwrap()
    }

    #[test]
    fn config_defaults_match_review_request_shape() {
        let config = OpenAIConfig::new("test-key");
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("k")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com/")
            .with_system_prompt("Be brief")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.system_prompt, "Be brief");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn request_has_system_then_user_message() {
        let request = client().to_openai_request("1. A1\n\nT");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 200);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "1. A1\n\nT");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let client = OpenAIGenerationClient::new(
            OpenAIConfig::new("k").with_base_url("http://localhost:8080/v1/"),
        )
        .unwrap();
        assert_eq!(client.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn extract_review_trims_text() {
        let body: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Lovely staff.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_review(body).unwrap(), "Lovely staff.");
    }

    #[test]
    fn extract_review_rejects_blank_or_missing_text() {
        let blank: OpenAIResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert_eq!(extract_review(blank), Err(GenerationError::EmptyResponse));

        let none: OpenAIResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_review(none), Err(GenerationError::Parse(_))));
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12 seconds."}}"#;
        assert_eq!(parse_retry_after(error), 12);
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(parse_retry_after("not json"), 30);
        assert_eq!(parse_retry_after(r#"{"error":{"message":"quota"}}"#), 30);
    }
}
