//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `dialogue` - Questionnaire dialogue sessions and their transition table

pub mod dialogue;
pub mod foundation;
