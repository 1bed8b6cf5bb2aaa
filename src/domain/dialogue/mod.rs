//! Dialogue module - the questionnaire conversation core.
//!
//! A dialogue walks one user from a welcome menu through an ordered list of
//! questions, asks the generation service for a review built from the
//! answers, and then lets the user edit, export or restart.
//!
//! Everything here is synchronous and free of I/O. The application layer
//! resolves profiles and calls the generation service, then hands the
//! results to [`DialogueMachine`].

mod action;
mod errors;
mod event;
mod machine;
mod output;
mod profile;
mod prompt;
mod session;
mod state;

pub use action::{Action, Menu};
pub use errors::DialogueError;
pub use event::Event;
pub use machine::{DialogueMachine, Transition};
pub use output::{Output, ReviewOrigin};
pub use profile::{BusinessProfile, ProfileResolution};
pub use prompt::GenerationPrompt;
pub use session::{Advance, Session};
pub use state::DialogueState;
