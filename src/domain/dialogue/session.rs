//! Session aggregate.
//!
//! One Session tracks a single user's pass through the questionnaire, from
//! the welcome menu to the final review. The store keeps at most one per
//! user; a restart replaces it with a brand new Session.

use crate::domain::foundation::{DialogueId, StateMachine, Timestamp, UserId};

use super::{BusinessProfile, DialogueError, DialogueState, GenerationPrompt};

/// Result of moving past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Another question is pending at this index.
    NextQuestion(usize),
    /// Every question has an answer.
    Complete,
}

/// Per-user dialogue state.
///
/// # Invariants
///
/// - `questions` is non-empty and never changes
/// - `0 <= current_index <= questions.len()`
/// - `answers[i]` is set for every `i < current_index`; only
///   `answers[current_index]` may additionally be set
/// - `generated_review` is set iff `state.holds_review()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: DialogueId,
    user_id: UserId,
    business_category: String,
    questions: Vec<String>,
    template: String,
    current_index: usize,
    answers: Vec<String>,
    generated_review: Option<String>,
    state: DialogueState,
    updated_at: Timestamp,
}

impl Session {
    /// Starts a new session from a freshly resolved profile.
    ///
    /// # Errors
    ///
    /// - `NoQuestions` if the category has no questions
    /// - `NoTemplate` if the category has no (or a blank) template
    pub fn start(user_id: UserId, profile: BusinessProfile) -> Result<Self, DialogueError> {
        let BusinessProfile {
            business_category,
            questions,
            template,
        } = profile;

        if questions.is_empty() {
            return Err(DialogueError::NoQuestions(business_category));
        }
        let template = match template {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(DialogueError::NoTemplate(business_category)),
        };

        Ok(Self {
            id: DialogueId::new(),
            user_id,
            business_category,
            questions,
            template,
            current_index: 0,
            answers: Vec::new(),
            generated_review: None,
            state: DialogueState::AwaitingStart,
            updated_at: Timestamp::now(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DialogueId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn business_category(&self) -> &str {
        &self.business_category
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question at `current_index`, or `None` once all are answered.
    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current_index).map(String::as_str)
    }

    /// Recorded answers, positionally aligned with `questions`.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    pub fn has_current_answer(&self) -> bool {
        self.answers.len() > self.current_index
    }

    pub fn generated_review(&self) -> Option<&str> {
        self.generated_review.as_deref()
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true if the session has not changed since `cutoff`.
    pub fn is_idle_since(&self, cutoff: &Timestamp) -> bool {
        self.updated_at.is_before(cutoff)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Question collection
    // ─────────────────────────────────────────────────────────────────────────

    /// Leaves the welcome menu and moves to the first question.
    pub fn begin(&mut self) -> Result<(), DialogueError> {
        self.require_state(DialogueState::AwaitingStart, "begin")?;
        self.move_to(DialogueState::AwaitingAnswer)
    }

    /// Records or overwrites the answer to the current question.
    pub fn record_answer(&mut self, answer: impl Into<String>) -> Result<(), DialogueError> {
        self.require_state(DialogueState::AwaitingAnswer, "text")?;
        if self.current_index >= self.questions.len() {
            return Err(DialogueError::invalid_event(self.state, "text"));
        }

        let answer = answer.into();
        if self.has_current_answer() {
            self.answers[self.current_index] = answer;
        } else {
            self.answers.push(answer);
        }
        self.touch();
        Ok(())
    }

    /// Moves past the current question.
    ///
    /// # Errors
    ///
    /// - `InvalidEvent` if the current question has no answer yet
    pub fn advance(&mut self) -> Result<Advance, DialogueError> {
        self.require_state(DialogueState::AwaitingAnswer, "advance")?;
        if self.current_index >= self.questions.len() || !self.has_current_answer() {
            return Err(DialogueError::invalid_event(self.state, "advance"));
        }

        self.current_index += 1;
        self.touch();
        if self.current_index < self.questions.len() {
            Ok(Advance::NextQuestion(self.current_index))
        } else {
            Ok(Advance::Complete)
        }
    }

    /// Assembles the generation prompt once every question is answered.
    pub fn generation_prompt(&self, preamble: &str) -> Result<GenerationPrompt, DialogueError> {
        if self.state != DialogueState::AwaitingAnswer
            || self.current_index != self.questions.len()
        {
            return Err(DialogueError::invalid_event(self.state, "generate"));
        }
        Ok(GenerationPrompt::assemble(preamble, &self.answers, &self.template))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Review handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Stores the generated review and opens the decision menu.
    pub fn accept_generated_review(&mut self, review: impl Into<String>) -> Result<(), DialogueError> {
        self.require_state(DialogueState::AwaitingAnswer, "generated")?;
        if self.current_index != self.questions.len() {
            return Err(DialogueError::invalid_event(self.state, "generated"));
        }
        self.move_to(DialogueState::AwaitingReviewDecision)?;
        self.generated_review = Some(review.into());
        Ok(())
    }

    /// Switches to waiting for replacement review text.
    pub fn start_review_edit(&mut self) -> Result<(), DialogueError> {
        self.require_state(DialogueState::AwaitingReviewDecision, "edit-review")?;
        self.move_to(DialogueState::AwaitingEditedText)
    }

    /// Replaces the review with the user's text verbatim.
    pub fn replace_review(&mut self, text: impl Into<String>) -> Result<(), DialogueError> {
        self.require_state(DialogueState::AwaitingEditedText, "text")?;
        self.move_to(DialogueState::AwaitingReviewDecision)?;
        self.generated_review = Some(text.into());
        Ok(())
    }

    /// Abandons the edit attempt, keeping the previous review.
    pub fn cancel_review_edit(&mut self) -> Result<(), DialogueError> {
        self.require_state(DialogueState::AwaitingEditedText, "cancel-edit")?;
        self.move_to(DialogueState::AwaitingReviewDecision)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn require_state(&self, expected: DialogueState, event: &str) -> Result<(), DialogueError> {
        if self.state != expected {
            return Err(DialogueError::invalid_event(self.state, event));
        }
        Ok(())
    }

    fn move_to(&mut self, target: DialogueState) -> Result<(), DialogueError> {
        self.state = self.state.transition_to(target)?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
