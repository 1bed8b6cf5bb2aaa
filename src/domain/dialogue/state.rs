//! Dialogue state machine.
//!
//! Defines the stages a questionnaire dialogue moves through and the valid
//! transitions between them. Destroying a session is not a state: the
//! session is simply removed from the store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// The stage a dialogue session is in.
///
/// - `AwaitingStart`: profile loaded, waiting for begin/cancel
/// - `AwaitingAnswer`: collecting the answer to the current question
/// - `AwaitingReviewDecision`: review generated, waiting for edit/export/restart
/// - `AwaitingEditedText`: waiting for the user's replacement review text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    AwaitingStart,
    AwaitingAnswer,
    AwaitingReviewDecision,
    AwaitingEditedText,
}

impl DialogueState {
    /// Returns true if a generated review must be present in this state.
    pub fn holds_review(&self) -> bool {
        matches!(self, Self::AwaitingReviewDecision | Self::AwaitingEditedText)
    }

    /// Snake-case name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingStart => "awaiting_start",
            Self::AwaitingAnswer => "awaiting_answer",
            Self::AwaitingReviewDecision => "awaiting_review_decision",
            Self::AwaitingEditedText => "awaiting_edited_text",
        }
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for DialogueState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DialogueState::*;
        matches!(
            (self, target),
            // begin
            (AwaitingStart, AwaitingAnswer) |
            // answer, edit-current, advance to the next question
            (AwaitingAnswer, AwaitingAnswer) |
            // last answer submitted and review generated
            (AwaitingAnswer, AwaitingReviewDecision) |
            // export keeps the decision menu open
            (AwaitingReviewDecision, AwaitingReviewDecision) |
            (AwaitingReviewDecision, AwaitingEditedText) |
            // edited text submitted or edit cancelled
            (AwaitingEditedText, AwaitingReviewDecision)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DialogueState::*;
        match self {
            AwaitingStart => vec![AwaitingAnswer],
            AwaitingAnswer => vec![AwaitingAnswer, AwaitingReviewDecision],
            AwaitingReviewDecision => vec![AwaitingReviewDecision, AwaitingEditedText],
            AwaitingEditedText => vec![AwaitingReviewDecision],
        }
    }
}
