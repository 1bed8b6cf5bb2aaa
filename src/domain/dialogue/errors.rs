//! Dialogue-specific error types.

use thiserror::Error;

use super::{DialogueState, Output};
use crate::domain::foundation::{ErrorCode, ValidationError};

/// Errors raised by the dialogue core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    /// The user is not known to the profile lookup.
    #[error("user is not authorized")]
    Unauthorized,

    /// The business category has no questions.
    #[error("no questions configured for business category '{0}'")]
    NoQuestions(String),

    /// The business category has no review template.
    #[error("no review template configured for business category '{0}'")]
    NoTemplate(String),

    /// The event is not valid in the current state. Never terminal.
    #[error("event '{event}' is not valid in state {state}")]
    InvalidEvent { state: DialogueState, event: String },

    /// The generation service failed or timed out.
    #[error("review generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DialogueError {
    pub fn invalid_event(state: DialogueState, event: impl Into<String>) -> Self {
        DialogueError::InvalidEvent {
            state,
            event: event.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        DialogueError::Generation(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DialogueError::Unauthorized => ErrorCode::Unauthorized,
            DialogueError::NoQuestions(_) => ErrorCode::QuestionsMissing,
            DialogueError::NoTemplate(_) => ErrorCode::TemplateMissing,
            DialogueError::InvalidEvent { .. } => ErrorCode::InvalidEvent,
            DialogueError::Generation(_) => ErrorCode::GenerationFailed,
            DialogueError::Validation(_) => ErrorCode::InvalidStateTransition,
        }
    }

    /// The user-visible notice for this error.
    pub fn to_output(&self) -> Output {
        match self {
            DialogueError::Unauthorized => Output::NotAuthorized,
            DialogueError::NoQuestions(_) => Output::NoQuestionsConfigured,
            DialogueError::NoTemplate(_) => Output::NoTemplateConfigured,
            DialogueError::InvalidEvent { .. } | DialogueError::Validation(_) => {
                Output::Unrecognized
            }
            DialogueError::Generation(_) => Output::GenerationFailed,
        }
    }
}
