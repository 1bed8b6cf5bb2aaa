//! Outbound dialogue outputs.
//!
//! Outputs are transport-neutral: they carry the data to show and the menu
//! to attach, and the transport decides wording and encoding.

use super::Menu;

/// How the review currently shown came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOrigin {
    /// Freshly produced by the generation service.
    Generated,
    /// Replaced by the user's own text.
    Edited,
    /// Edit attempt cancelled, previous text kept.
    Kept,
}

/// One message the transport should render for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// The user is not registered.
    NotAuthorized,
    /// The user's business category has no questions.
    NoQuestionsConfigured,
    /// The user's business category has no review template.
    NoTemplateConfigured,
    /// A backing service failed before a dialogue could be served.
    ServiceUnavailable,
    /// Profile loaded; offers begin/cancel.
    Welcome {
        business_category: String,
        question_count: usize,
    },
    /// A question to answer. `replacing` is set when re-asked for an edit.
    Question {
        number: usize,
        total: usize,
        text: String,
        replacing: bool,
    },
    /// Echo of the recorded answer; offers edit-current/advance.
    AnswerRecorded { answer: String },
    /// The review with its decision menu.
    Review { text: String, origin: ReviewOrigin },
    /// Asks for replacement review text; offers cancel-edit.
    EditReviewPrompt,
    /// Shareable rendering of the review; the decision menu stays open.
    Export { review: String },
    /// Generation failed; the dialogue is over.
    GenerationFailed,
    /// The dialogue was cancelled by the user.
    Cancelled,
    /// The event is not valid in the current state.
    Unrecognized,
    /// A generation call is still running for this user.
    Busy,
    /// There is no dialogue to continue.
    NoActiveDialogue,
}

impl Output {
    /// The menu to attach, if any.
    pub fn menu(&self) -> Option<Menu> {
        match self {
            Output::Welcome { .. } => Some(Menu::Start),
            Output::AnswerRecorded { .. } => Some(Menu::Answer),
            Output::Review { .. } | Output::Export { .. } => Some(Menu::Review),
            Output::EditReviewPrompt => Some(Menu::Edit),
            _ => None,
        }
    }

    /// Returns true for notices that end or refuse a dialogue.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Output::NotAuthorized
                | Output::NoQuestionsConfigured
                | Output::NoTemplateConfigured
                | Output::ServiceUnavailable
                | Output::GenerationFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::Action;

    #[test]
    fn export_keeps_review_menu() {
        let output = Output::Export {
            review: "Great".to_string(),
        };
        assert_eq!(output.menu(), Some(Menu::Review));
        assert!(output.menu().unwrap().actions().contains(&Action::Export));
    }

    #[test]
    fn questions_have_no_menu() {
        let output = Output::Question {
            number: 1,
            total: 2,
            text: "Q1".to_string(),
            replacing: false,
        };
        assert_eq!(output.menu(), None);
    }

    #[test]
    fn failure_notices_are_flagged() {
        assert!(Output::GenerationFailed.is_failure());
        assert!(Output::NotAuthorized.is_failure());
        assert!(!Output::Unrecognized.is_failure());
        assert!(!Output::Cancelled.is_failure());
    }
}
