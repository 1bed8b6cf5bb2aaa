//! Dialogue handlers.
//!
//! - `DialogueEngine` - applies inbound events to per-user sessions
//! - `UserGate` - per-user turn serialization and in-flight generation marks

mod engine;
mod user_gate;

pub use engine::{DialogueEngine, DialogueEngineConfig, DialogueEngineError};
pub use user_gate::{GenerationMark, Turn, UserGate};
