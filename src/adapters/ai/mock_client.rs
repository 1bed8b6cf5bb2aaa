//! Mock Generation Client for testing.
//!
//! Returns scripted results in order, records every prompt and can simulate
//! latency so tests can hold a generation call in flight.
//!
//! # Example
//!
//! ```ignore
//! let client = MockGenerationClient::new()
//!     .with_review("Great clinic")
//!     .with_delay(Duration::from_millis(100));
//!
//! let review = client.generate("1. A1\n\nT").await?;
//! assert_eq!(client.prompts(), vec!["1. A1\n\nT".to_string()]);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GenerationClient, GenerationError};

/// Scripted generation client.
#[derive(Debug, Clone, Default)]
pub struct MockGenerationClient {
    /// Results consumed in order.
    responses: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Every prompt received.
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful review.
    pub fn with_review(self, review: impl Into<String>) -> Self {
        self.push(Ok(review.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }

    /// All prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(&self, response: Result<String, GenerationError>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    fn next_response(&self) -> Result<String, GenerationError> {
        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .unwrap_or_else(|| Ok("Mock review".to_string()))
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_scripted_results_in_order() {
        let client = MockGenerationClient::new()
            .with_review("first")
            .with_error(GenerationError::AuthenticationFailed);

        assert_eq!(client.generate("p1").await.unwrap(), "first");
        assert_eq!(
            client.generate("p2").await,
            Err(GenerationError::AuthenticationFailed)
        );
        assert_eq!(client.generate("p3").await.unwrap(), "Mock review");
    }

    #[tokio::test]
    async fn records_prompts() {
        let client = MockGenerationClient::new();
        client.generate("hello").await.unwrap();

        assert_eq!(client.call_count(), 1);
        assert_eq!(client.prompts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn clones_share_script_and_history() {
        let client = MockGenerationClient::new().with_review("shared");
        let clone = client.clone();

        assert_eq!(clone.generate("x").await.unwrap(), "shared");
        assert_eq!(client.call_count(), 1);
    }
}
