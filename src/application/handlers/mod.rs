//! Application handlers.
//!
//! Handlers that orchestrate domain operations across ports.

pub mod dialogue;

pub use dialogue::{DialogueEngine, DialogueEngineConfig, DialogueEngineError};
