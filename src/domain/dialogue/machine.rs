//! Pure dialogue transition function.
//!
//! `DialogueMachine` maps `(Session, Event)` to a [`Transition`] without any
//! I/O. The engine performs the two suspending calls (profile lookup and
//! review generation) and feeds their results back in through
//! [`DialogueMachine::open`] and [`DialogueMachine::generation_succeeded`].

use tracing::{debug, info};

use crate::domain::foundation::UserId;

use super::{
    Action, Advance, DialogueError, DialogueState, Event, GenerationPrompt, Output,
    ProfileResolution, ReviewOrigin, Session,
};

/// Outcome of applying one event to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Store the session and render the outputs.
    Continue { session: Session, outputs: Vec<Output> },
    /// Every answer is in; call the generation service with `prompt`.
    ///
    /// The session is still `AwaitingAnswer` and must not accept further
    /// events until the call resolves.
    Generate {
        session: Session,
        prompt: GenerationPrompt,
    },
    /// Destroy the session and render the outputs.
    End { outputs: Vec<Output> },
    /// Destroy the session and process a fresh dialogue entry.
    Restart,
}

impl Transition {
    fn reject(session: Session, err: DialogueError) -> Self {
        debug!(
            dialogue_id = %session.id(),
            state = %session.state(),
            code = %err.code(),
            error = %err,
            "Event rejected"
        );
        Transition::Continue {
            session,
            outputs: vec![err.to_output()],
        }
    }

    /// Ends the dialogue with the notice for `err`.
    fn fail(err: DialogueError) -> Self {
        info!(code = %err.code(), error = %err, "Dialogue ended by error");
        Transition::end(err.to_output())
    }

    fn end(output: Output) -> Self {
        Transition::End {
            outputs: vec![output],
        }
    }

    /// The outputs to render, if the transition carries any.
    pub fn outputs(&self) -> &[Output] {
        match self {
            Transition::Continue { outputs, .. } | Transition::End { outputs } => outputs,
            Transition::Generate { .. } | Transition::Restart => &[],
        }
    }
}

/// The dialogue state table.
#[derive(Debug, Clone, Default)]
pub struct DialogueMachine {
    prompt_preamble: String,
}

impl DialogueMachine {
    pub fn new(prompt_preamble: impl Into<String>) -> Self {
        Self {
            prompt_preamble: prompt_preamble.into(),
        }
    }

    pub fn prompt_preamble(&self) -> &str {
        &self.prompt_preamble
    }

    /// Handles a dialogue entry once the profile has been resolved.
    pub fn open(&self, user_id: UserId, resolution: ProfileResolution) -> Transition {
        let profile = match resolution {
            ProfileResolution::Unauthorized => return Transition::fail(DialogueError::Unauthorized),
            ProfileResolution::Authorized(profile) => profile,
        };

        match Session::start(user_id, profile) {
            Ok(session) => {
                let welcome = Output::Welcome {
                    business_category: session.business_category().to_string(),
                    question_count: session.question_count(),
                };
                Transition::Continue {
                    session,
                    outputs: vec![welcome],
                }
            }
            Err(err) => Transition::fail(err),
        }
    }

    /// Applies one event to an existing session.
    pub fn step(&self, session: Session, event: Event) -> Transition {
        match event {
            Event::Entry => return Transition::Restart,
            Event::Abort => return Transition::end(Output::Cancelled),
            _ => {}
        }

        match session.state() {
            DialogueState::AwaitingStart => self.on_start(session, event),
            DialogueState::AwaitingAnswer => self.on_answer(session, event),
            DialogueState::AwaitingReviewDecision => self.on_review_decision(session, event),
            DialogueState::AwaitingEditedText => self.on_edited_text(session, event),
        }
    }

    /// Stores the generated review and opens the decision menu.
    pub fn generation_succeeded(&self, mut session: Session, review: String) -> Transition {
        match session.accept_generated_review(review) {
            Ok(()) => {
                let output = review_output(&session, ReviewOrigin::Generated);
                Transition::Continue {
                    session,
                    outputs: vec![output],
                }
            }
            Err(err) => self.generation_failed(DialogueError::generation(err.to_string())),
        }
    }

    /// Any generation failure ends the dialogue with a generic notice.
    pub fn generation_failed(&self, err: DialogueError) -> Transition {
        Transition::fail(err)
    }

    fn on_start(&self, mut session: Session, event: Event) -> Transition {
        match event {
            Event::Action(Action::Begin) => match session.begin() {
                Ok(()) => {
                    let question = question_output(&session, false);
                    continue_with(session, question)
                }
                Err(err) => Transition::reject(session, err),
            },
            Event::Action(Action::Cancel) => Transition::end(Output::Cancelled),
            other => invalid(session, &other),
        }
    }

    fn on_answer(&self, mut session: Session, event: Event) -> Transition {
        match event {
            Event::Text(answer) => match session.record_answer(answer.clone()) {
                Ok(()) => continue_with(session, Output::AnswerRecorded { answer }),
                Err(err) => Transition::reject(session, err),
            },
            Event::Action(Action::EditCurrent) => {
                let question = question_output(&session, true);
                continue_with(session, question)
            }
            Event::Action(Action::Advance) => self.advance(session),
            other => invalid(session, &other),
        }
    }

    fn advance(&self, mut session: Session) -> Transition {
        match session.advance() {
            Ok(Advance::NextQuestion(_)) => {
                let question = question_output(&session, false);
                continue_with(session, question)
            }
            Ok(Advance::Complete) => match session.generation_prompt(&self.prompt_preamble) {
                Ok(prompt) => Transition::Generate { session, prompt },
                Err(err) => Transition::reject(session, err),
            },
            Err(err) => {
                // Unanswered question: reject, then show it again.
                let question = question_output(&session, false);
                match Transition::reject(session, err) {
                    Transition::Continue {
                        session,
                        mut outputs,
                    } => {
                        outputs.push(question);
                        Transition::Continue { session, outputs }
                    }
                    other => other,
                }
            }
        }
    }

    fn on_review_decision(&self, mut session: Session, event: Event) -> Transition {
        match event {
            Event::Action(Action::EditReview) => match session.start_review_edit() {
                Ok(()) => continue_with(session, Output::EditReviewPrompt),
                Err(err) => Transition::reject(session, err),
            },
            Event::Action(Action::Export) => {
                let review = session.generated_review().unwrap_or_default().to_string();
                continue_with(session, Output::Export { review })
            }
            Event::Action(Action::Restart) => Transition::Restart,
            Event::Action(Action::Cancel) => Transition::end(Output::Cancelled),
            // Stale "back" button: nothing to cancel, show the review again.
            Event::Action(Action::CancelEdit) => {
                let output = review_output(&session, ReviewOrigin::Kept);
                continue_with(session, output)
            }
            other => invalid(session, &other),
        }
    }

    fn on_edited_text(&self, mut session: Session, event: Event) -> Transition {
        match event {
            Event::Text(text) => match session.replace_review(text) {
                Ok(()) => {
                    let output = review_output(&session, ReviewOrigin::Edited);
                    continue_with(session, output)
                }
                Err(err) => Transition::reject(session, err),
            },
            Event::Action(Action::CancelEdit) => match session.cancel_review_edit() {
                Ok(()) => {
                    let output = review_output(&session, ReviewOrigin::Kept);
                    continue_with(session, output)
                }
                Err(err) => Transition::reject(session, err),
            },
            other => invalid(session, &other),
        }
    }
}

fn continue_with(session: Session, output: Output) -> Transition {
    Transition::Continue {
        session,
        outputs: vec![output],
    }
}

fn invalid(session: Session, event: &Event) -> Transition {
    let err = DialogueError::invalid_event(session.state(), event.label());
    Transition::reject(session, err)
}

fn question_output(session: &Session, replacing: bool) -> Output {
    Output::Question {
        number: session.current_index() + 1,
        total: session.question_count(),
        text: session.current_question().unwrap_or_default().to_string(),
        replacing,
    }
}

fn review_output(session: &Session, origin: ReviewOrigin) -> Output {
    Output::Review {
        text: session.generated_review().unwrap_or_default().to_string(),
        origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::BusinessProfile;

    fn machine() -> DialogueMachine {
        DialogueMachine::default()
    }

    fn user() -> UserId {
        UserId::new("U1").unwrap()
    }

    fn authorized(questions: &[&str], template: Option<&str>) -> ProfileResolution {
        ProfileResolution::Authorized(BusinessProfile::new(
            "clinic",
            questions.iter().map(|q| q.to_string()).collect(),
            template.map(str::to_string),
        ))
    }

    fn expect_continue(transition: Transition) -> (Session, Vec<Output>) {
        match transition {
            Transition::Continue { session, outputs } => (session, outputs),
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    fn opened(questions: &[&str]) -> Session {
        expect_continue(machine().open(user(), authorized(questions, Some("T")))).0
    }

    fn answering(questions: &[&str]) -> Session {
        expect_continue(machine().step(opened(questions), Action::Begin.into())).0
    }

    fn reviewing(review: &str) -> Session {
        let m = machine();
        let session = answering(&["Q1"]);
        let (session, _) = expect_continue(m.step(session, Event::Text("A1".into())));
        let session = match m.step(session, Action::Advance.into()) {
            Transition::Generate { session, .. } => session,
            other => panic!("expected Generate, got {:?}", other),
        };
        expect_continue(m.generation_succeeded(session, review.to_string())).0
    }

    mod open {
        use super::*;

        #[test]
        fn unauthorized_user_gets_notice_without_session() {
            let transition = machine().open(user(), ProfileResolution::Unauthorized);
            assert_eq!(
                transition,
                Transition::End {
                    outputs: vec![Output::NotAuthorized]
                }
            );
        }

        #[test]
        fn empty_questions_end_dialogue() {
            let transition = machine().open(user(), authorized(&[], Some("T")));
            assert_eq!(transition.outputs(), &[Output::NoQuestionsConfigured]);
            assert!(matches!(transition, Transition::End { .. }));
        }

        #[test]
        fn missing_template_ends_dialogue() {
            let transition = machine().open(user(), authorized(&["Q1"], None));
            assert_eq!(transition.outputs(), &[Output::NoTemplateConfigured]);
        }

        #[test]
        fn authorized_user_gets_welcome_with_real_count() {
            let (session, outputs) =
                expect_continue(machine().open(user(), authorized(&["Q1", "Q2", "Q3"], Some("T"))));
            assert_eq!(session.state(), DialogueState::AwaitingStart);
            assert_eq!(
                outputs,
                vec![Output::Welcome {
                    business_category: "clinic".into(),
                    question_count: 3
                }]
            );
        }
    }

    mod awaiting_start {
        use super::*;

        #[test]
        fn begin_presents_first_question() {
            let (session, outputs) = expect_continue(machine().step(opened(&["Q1", "Q2"]), Action::Begin.into()));
            assert_eq!(session.state(), DialogueState::AwaitingAnswer);
            assert_eq!(
                outputs,
                vec![Output::Question {
                    number: 1,
                    total: 2,
                    text: "Q1".into(),
                    replacing: false
                }]
            );
        }

        #[test]
        fn cancel_ends_dialogue() {
            let transition = machine().step(opened(&["Q1"]), Action::Cancel.into());
            assert_eq!(transition.outputs(), &[Output::Cancelled]);
            assert!(matches!(transition, Transition::End { .. }));
        }

        #[test]
        fn text_is_unrecognized_and_session_unchanged() {
            let session = opened(&["Q1"]);
            let (after, outputs) =
                expect_continue(machine().step(session.clone(), Event::Text("hello".into())));
            assert_eq!(after, session);
            assert_eq!(outputs, vec![Output::Unrecognized]);
        }
    }

    mod awaiting_answer {
        use super::*;

        #[test]
        fn text_is_echoed_with_answer_menu() {
            let (session, outputs) =
                expect_continue(machine().step(answering(&["Q1"]), Event::Text("A1".into())));
            assert_eq!(session.answer(0), Some("A1"));
            assert_eq!(outputs, vec![Output::AnswerRecorded { answer: "A1".into() }]);
        }

        #[test]
        fn edit_current_re_asks_same_question() {
            let m = machine();
            let (session, _) = expect_continue(m.step(answering(&["Q1", "Q2"]), Event::Text("A1".into())));
            let (session, outputs) = expect_continue(m.step(session, Action::EditCurrent.into()));
            assert_eq!(session.current_index(), 0);
            assert_eq!(
                outputs,
                vec![Output::Question {
                    number: 1,
                    total: 2,
                    text: "Q1".into(),
                    replacing: true
                }]
            );
            let (session, _) = expect_continue(m.step(session, Event::Text("better".into())));
            assert_eq!(session.answers(), &["better".to_string()]);
        }

        #[test]
        fn advance_without_answer_rejects_and_re_prompts() {
            let session = answering(&["Q1", "Q2"]);
            let (after, outputs) = expect_continue(machine().step(session.clone(), Action::Advance.into()));
            assert_eq!(after, session);
            assert_eq!(
                outputs,
                vec![
                    Output::Unrecognized,
                    Output::Question {
                        number: 1,
                        total: 2,
                        text: "Q1".into(),
                        replacing: false
                    }
                ]
            );
        }

        #[test]
        fn advance_presents_next_question() {
            let m = machine();
            let (session, _) = expect_continue(m.step(answering(&["Q1", "Q2"]), Event::Text("A1".into())));
            let (session, outputs) = expect_continue(m.step(session, Action::Advance.into()));
            assert_eq!(session.current_index(), 1);
            assert_eq!(
                outputs,
                vec![Output::Question {
                    number: 2,
                    total: 2,
                    text: "Q2".into(),
                    replacing: false
                }]
            );
        }

        #[test]
        fn last_advance_requests_generation() {
            let m = DialogueMachine::new("Intro:\n");
            let (session, _) = expect_continue(m.step(answering(&["Q1"]), Event::Text("A1".into())));
            match m.step(session, Action::Advance.into()) {
                Transition::Generate { session, prompt } => {
                    assert_eq!(prompt.as_str(), "Intro:\n1. A1\n\nT");
                    assert_eq!(session.state(), DialogueState::AwaitingAnswer);
                    assert_eq!(session.generated_review(), None);
                }
                other => panic!("expected Generate, got {:?}", other),
            }
        }

        #[test]
        fn review_actions_are_unrecognized() {
            let session = answering(&["Q1"]);
            for action in [Action::Export, Action::EditReview, Action::Restart, Action::CancelEdit] {
                let (after, outputs) = expect_continue(machine().step(session.clone(), action.into()));
                assert_eq!(after, session);
                assert_eq!(outputs, vec![Output::Unrecognized]);
            }
        }
    }

    mod review_decision {
        use super::*;

        #[test]
        fn generation_success_shows_review() {
            let session = reviewing("Great clinic");
            assert_eq!(session.state(), DialogueState::AwaitingReviewDecision);
            assert_eq!(session.generated_review(), Some("Great clinic"));
        }

        #[test]
        fn generation_failure_ends_dialogue() {
            assert_eq!(
                machine().generation_failed(DialogueError::generation("timed out")),
                Transition::End {
                    outputs: vec![Output::GenerationFailed]
                }
            );
        }

        #[test]
        fn export_is_repeatable_and_non_destructive() {
            let m = machine();
            let session = reviewing("R");
            let (first, out1) = expect_continue(m.step(session.clone(), Action::Export.into()));
            let (second, out2) = expect_continue(m.step(first.clone(), Action::Export.into()));
            assert_eq!(first, session);
            assert_eq!(second, session);
            assert_eq!(out1, out2);
            assert_eq!(out1, vec![Output::Export { review: "R".into() }]);
        }

        #[test]
        fn restart_requests_fresh_entry() {
            assert_eq!(
                machine().step(reviewing("R"), Action::Restart.into()),
                Transition::Restart
            );
        }

        #[test]
        fn stale_cancel_edit_repeats_review_without_change() {
            let session = reviewing("R");
            let (after, outputs) = expect_continue(machine().step(session.clone(), Action::CancelEdit.into()));
            assert_eq!(after, session);
            assert_eq!(
                outputs,
                vec![Output::Review {
                    text: "R".into(),
                    origin: ReviewOrigin::Kept,
                }]
            );
        }

        #[test]
        fn free_text_is_unrecognized() {
            let session = reviewing("R");
            let (after, outputs) = expect_continue(machine().step(session.clone(), Event::Text("new".into())));
            assert_eq!(after.generated_review(), Some("R"));
            assert_eq!(outputs, vec![Output::Unrecognized]);
        }
    }

    mod edited_text {
        use super::*;

        fn editing() -> Session {
            expect_continue(machine().step(reviewing("Original"), Action::EditReview.into())).0
        }

        #[test]
        fn edit_review_prompts_for_text() {
            let (session, outputs) =
                expect_continue(machine().step(reviewing("R"), Action::EditReview.into()));
            assert_eq!(session.state(), DialogueState::AwaitingEditedText);
            assert_eq!(outputs, vec![Output::EditReviewPrompt]);
        }

        #[test]
        fn submitted_text_replaces_review_verbatim() {
            let (session, outputs) =
                expect_continue(machine().step(editing(), Event::Text("Mine".into())));
            assert_eq!(session.generated_review(), Some("Mine"));
            assert_eq!(session.state(), DialogueState::AwaitingReviewDecision);
            assert_eq!(
                outputs,
                vec![Output::Review {
                    text: "Mine".into(),
                    origin: ReviewOrigin::Edited
                }]
            );
        }

        #[test]
        fn cancel_edit_keeps_prior_review() {
            let (session, outputs) = expect_continue(machine().step(editing(), Action::CancelEdit.into()));
            assert_eq!(session.generated_review(), Some("Original"));
            assert_eq!(
                outputs,
                vec![Output::Review {
                    text: "Original".into(),
                    origin: ReviewOrigin::Kept
                }]
            );
        }

        #[test]
        fn export_while_editing_is_unrecognized() {
            let session = editing();
            let (after, outputs) = expect_continue(machine().step(session.clone(), Action::Export.into()));
            assert_eq!(after, session);
            assert_eq!(outputs, vec![Output::Unrecognized]);
        }
    }

    mod any_state {
        use super::*;

        #[test]
        fn abort_ends_every_state() {
            let sessions = [opened(&["Q1"]), answering(&["Q1"]), reviewing("R")];
            for session in sessions {
                assert_eq!(
                    machine().step(session, Event::Abort),
                    Transition::End {
                        outputs: vec![Output::Cancelled]
                    }
                );
            }
        }

        #[test]
        fn entry_restarts() {
            assert_eq!(machine().step(answering(&["Q1"]), Event::Entry), Transition::Restart);
        }
    }
}
