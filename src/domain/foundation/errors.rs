//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Stable error codes attached to log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Dialogue errors
    InvalidEvent,
    InvalidStateTransition,

    // Authorization errors
    Unauthorized,

    // Configuration errors (fixable only by an administrator)
    QuestionsMissing,
    TemplateMissing,

    // AI errors
    GenerationFailed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidEvent => "INVALID_EVENT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::QuestionsMissing => "QUESTIONS_MISSING",
            ErrorCode::TemplateMissing => "TEMPLATE_MISSING",
            ErrorCode::GenerationFailed => "GENERATION_FAILED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("user_id");
        assert_eq!(format!("{}", err), "Field 'user_id' cannot be empty");
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("state_transition", "nope");
        assert_eq!(
            format!("{}", err),
            "Field 'state_transition' has invalid format: nope"
        );
    }

    #[test]
    fn error_codes_display_screaming_snake_case() {
        assert_eq!(ErrorCode::GenerationFailed.to_string(), "GENERATION_FAILED");
        assert_eq!(ErrorCode::QuestionsMissing.to_string(), "QUESTIONS_MISSING");
    }
}
