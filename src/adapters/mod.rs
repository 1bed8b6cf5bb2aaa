//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Review generation (OpenAI, scripted mock)
//! - `profile` - Business profile lookup (PostgreSQL, in-memory)
//! - `storage` - Session storage (in-memory)
//! - `telegram` - Telegram Bot API transport

pub mod ai;
pub mod profile;
pub mod storage;
pub mod telegram;

pub use ai::{MockGenerationClient, OpenAIConfig, OpenAIGenerationClient};
pub use profile::{InMemoryBusinessProfileLookup, PgBusinessProfileLookup};
pub use storage::InMemorySessionStore;
pub use telegram::{Renderer, TelegramAdapter};
