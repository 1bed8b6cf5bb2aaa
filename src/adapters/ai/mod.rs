//! Generation Client Adapters.
//!
//! Implementations of the GenerationClient port.
//!
//! ## Available Adapters
//!
//! - `OpenAIGenerationClient` - OpenAI chat completions (GPT-4 by default)
//! - `MockGenerationClient` - Scripted client for tests

mod mock_client;
mod openai_client;

pub use mock_client::MockGenerationClient;
pub use openai_client::{OpenAIConfig, OpenAIGenerationClient};
