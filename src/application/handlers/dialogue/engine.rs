//! DialogueEngine - drives questionnaire dialogues for many users.
//!
//! The engine owns the side effects the pure [`DialogueMachine`] leaves out:
//! it loads and stores sessions, resolves profiles on entry and restart, and
//! calls the generation service once all answers are in.
//!
//! # Concurrency
//!
//! - Events for one user are handled strictly one at a time
//! - While a generation call is running for a user, further events from
//!   that user get [`Output::Busy`] and change nothing
//! - Generation is bounded by a timeout; expiry counts as failure

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::user_gate::UserGate;
use crate::domain::dialogue::{DialogueError, DialogueMachine, Event, GenerationPrompt, Output, Session, Transition};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{BusinessProfileLookup, GenerationClient, ProfileLookupError, SessionStore, SessionStoreError};

/// Engine settings.
#[derive(Debug, Clone)]
pub struct DialogueEngineConfig {
    /// Text placed before the numbered answers in every prompt.
    pub prompt_preamble: String,
    /// Upper bound on one generation call.
    pub generation_timeout: Duration,
}

impl Default for DialogueEngineConfig {
    fn default() -> Self {
        Self {
            prompt_preamble: String::new(),
            generation_timeout: Duration::from_secs(60),
        }
    }
}

/// Failures of the engine's collaborators.
///
/// Never surfaced to users directly; each becomes
/// [`Output::ServiceUnavailable`].
#[derive(Debug, Clone, Error)]
pub enum DialogueEngineError {
    #[error("profile lookup failed: {0}")]
    Lookup(#[from] ProfileLookupError),

    #[error("session store failed: {0}")]
    Store(#[from] SessionStoreError),
}

/// Handler for inbound dialogue events.
pub struct DialogueEngine {
    lookup: Arc<dyn BusinessProfileLookup>,
    generator: Arc<dyn GenerationClient>,
    sessions: Arc<dyn SessionStore>,
    machine: DialogueMachine,
    generation_timeout: Duration,
    gate: UserGate,
}

impl DialogueEngine {
    pub fn new(
        lookup: Arc<dyn BusinessProfileLookup>,
        generator: Arc<dyn GenerationClient>,
        sessions: Arc<dyn SessionStore>,
        config: DialogueEngineConfig,
    ) -> Self {
        Self {
            lookup,
            generator,
            sessions,
            machine: DialogueMachine::new(config.prompt_preamble),
            generation_timeout: config.generation_timeout,
            gate: UserGate::new(),
        }
    }

    /// Whether a review is being generated for `user_id` right now.
    pub fn is_generating(&self, user_id: &UserId) -> bool {
        self.gate.is_generating(user_id)
    }

    /// Processes one event and returns the outputs to show the user.
    pub async fn handle(&self, user_id: &UserId, event: Event) -> Vec<Output> {
        if self.is_generating(user_id) {
            debug!(user_id = %user_id, event = event.label(), "Event ignored while generation is in flight");
            return vec![Output::Busy];
        }

        let _turn = self.gate.acquire(user_id).await;
        let label = event.label();

        match self.process(user_id, event).await {
            Ok(outputs) => outputs,
            Err(err) => {
                error!(user_id = %user_id, event = label, error = %err, "Dialogue event failed");
                if let DialogueEngineError::Lookup(_) = err {
                    self.discard(user_id, "lookup failure").await;
                }
                vec![Output::ServiceUnavailable]
            }
        }
    }

    /// Removes sessions untouched for longer than `max_idle`.
    ///
    /// Returns the number of sessions removed.
    pub async fn purge_idle(&self, max_idle: Duration) -> Result<usize, SessionStoreError> {
        let cutoff = Timestamp::now().minus(max_idle);
        let purged = self.sessions.purge_idle(&cutoff).await?;
        self.gate.prune();

        for user_id in &purged {
            info!(user_id = %user_id, "Idle session evicted");
        }
        Ok(purged.len())
    }

    /// Runs [`purge_idle`](Self::purge_idle) every `every` until cancelled.
    pub fn spawn_idle_sweeper(
        self: Arc<Self>,
        every: Duration,
        max_idle: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        match self.purge_idle(max_idle).await {
                            Ok(0) => {}
                            Ok(count) => debug!(count, "Idle sweep finished"),
                            Err(err) => warn!(error = %err, "Idle sweep failed"),
                        }
                    }
                }
            }
            debug!("Idle sweeper stopped");
        })
    }

    async fn process(&self, user_id: &UserId, event: Event) -> Result<Vec<Output>, DialogueEngineError> {
        let existing = self.sessions.get(user_id).await?;

        let transition = match (existing, event) {
            (Some(session), event) => {
                debug!(
                    user_id = %user_id,
                    dialogue_id = %session.id(),
                    state = %session.state(),
                    event = event.label(),
                    "Applying event"
                );
                self.machine.step(session, event)
            }
            (None, Event::Entry) => self.open(user_id).await?,
            (None, event) => {
                debug!(user_id = %user_id, event = event.label(), "No active dialogue");
                return Ok(vec![Output::NoActiveDialogue]);
            }
        };

        self.settle(user_id, transition).await
    }

    /// Resolves the profile and lets the machine decide how to open.
    async fn open(&self, user_id: &UserId) -> Result<Transition, DialogueEngineError> {
        let resolution = self.lookup.resolve(user_id).await?;
        if !resolution.is_authorized() {
            info!(user_id = %user_id, "Unauthorized user attempted to start a dialogue");
        }
        Ok(self.machine.open(user_id.clone(), resolution))
    }

    async fn settle(
        &self,
        user_id: &UserId,
        mut transition: Transition,
    ) -> Result<Vec<Output>, DialogueEngineError> {
        loop {
            transition = match transition {
                Transition::Continue { session, outputs } => {
                    let dialogue_id = *session.id();
                    match self.sessions.put(session).await? {
                        None => info!(user_id = %user_id, dialogue_id = %dialogue_id, "Session created"),
                        Some(previous) if previous.id() != &dialogue_id => info!(
                            user_id = %user_id,
                            dialogue_id = %dialogue_id,
                            replaced = %previous.id(),
                            "Session replaced"
                        ),
                        Some(_) => {}
                    }
                    return Ok(outputs);
                }
                Transition::End { outputs } => {
                    if let Some(session) = self.sessions.remove(user_id).await? {
                        info!(
                            user_id = %user_id,
                            dialogue_id = %session.id(),
                            state = %session.state(),
                            "Session destroyed"
                        );
                    }
                    return Ok(outputs);
                }
                Transition::Generate { session, prompt } => {
                    self.generate(user_id, session, prompt).await?
                }
                Transition::Restart => {
                    info!(user_id = %user_id, "Restarting dialogue");
                    self.open(user_id).await?
                }
            };
        }
    }

    async fn generate(
        &self,
        user_id: &UserId,
        session: Session,
        prompt: GenerationPrompt,
    ) -> Result<Transition, DialogueEngineError> {
        let Some(_in_flight) = self.gate.begin_generation(user_id) else {
            return Ok(Transition::Continue {
                session,
                outputs: vec![Output::Busy],
            });
        };

        // Readers see every answer recorded while the call runs.
        self.sessions.put(session.clone()).await?;

        let dialogue_id = *session.id();
        info!(
            user_id = %user_id,
            dialogue_id = %dialogue_id,
            answers = session.answers().len(),
            "Review generation requested"
        );

        let outcome = timeout(self.generation_timeout, self.generator.generate(prompt.as_str())).await;
        let transition = match outcome {
            Ok(Ok(review)) => {
                info!(user_id = %user_id, dialogue_id = %dialogue_id, "Review generation succeeded");
                self.machine.generation_succeeded(session, review)
            }
            Ok(Err(err)) => {
                warn!(
                    user_id = %user_id,
                    dialogue_id = %dialogue_id,
                    retryable = err.is_retryable(),
                    error = %err,
                    "Review generation failed"
                );
                self.machine.generation_failed(DialogueError::generation(err.to_string()))
            }
            Err(_) => {
                warn!(
                    user_id = %user_id,
                    dialogue_id = %dialogue_id,
                    timeout_ms = self.generation_timeout.as_millis() as u64,
                    "Review generation timed out"
                );
                self.machine.generation_failed(DialogueError::generation(format!(
                    "no response within {:?}",
                    self.generation_timeout
                )))
            }
        };
        Ok(transition)
    }

    async fn discard(&self, user_id: &UserId, reason: &str) {
        match self.sessions.remove(user_id).await {
            Ok(Some(session)) => {
                info!(user_id = %user_id, dialogue_id = %session.id(), reason, "Session destroyed");
            }
            Ok(None) => {}
            Err(err) => warn!(user_id = %user_id, error = %err, "Failed to discard session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockGenerationClient;
    use crate::adapters::profile::InMemoryBusinessProfileLookup;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::dialogue::Action;
    use crate::ports::GenerationError;

    struct Harness {
        engine: Arc<DialogueEngine>,
        lookup: InMemoryBusinessProfileLookup,
        generator: MockGenerationClient,
        store: InMemorySessionStore,
    }

    async fn harness(generator: MockGenerationClient, generation_timeout: Duration) -> Harness {
        let lookup = InMemoryBusinessProfileLookup::new();
        lookup.add_user(user(), "clinic").await;
        lookup.set_questions("clinic", ["Q1", "Q2"]).await;
        lookup.set_template("clinic", "T").await;
        let store = InMemorySessionStore::new();

        let engine = DialogueEngine::new(
            Arc::new(lookup.clone()),
            Arc::new(generator.clone()),
            Arc::new(store.clone()),
            DialogueEngineConfig {
                prompt_preamble: String::new(),
                generation_timeout,
            },
        );

        Harness {
            engine: Arc::new(engine),
            lookup,
            generator,
            store,
        }
    }

    fn user() -> UserId {
        UserId::new("U1").unwrap()
    }

    async fn answer_all(h: &Harness) -> Vec<Output> {
        let u = user();
        h.engine.handle(&u, Event::Entry).await;
        h.engine.handle(&u, Action::Begin.into()).await;
        h.engine.handle(&u, Event::Text("A1".into())).await;
        h.engine.handle(&u, Action::Advance.into()).await;
        h.engine.handle(&u, Event::Text("A2".into())).await;
        h.engine.handle(&u, Action::Advance.into()).await
    }

    #[tokio::test]
    async fn text_without_session_reports_no_active_dialogue() {
        let h = harness(MockGenerationClient::new(), Duration::from_secs(5)).await;
        let outputs = h.engine.handle(&user(), Event::Text("hi".into())).await;
        assert_eq!(outputs, vec![Output::NoActiveDialogue]);
        assert_eq!(h.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn abort_without_session_reports_no_active_dialogue() {
        let h = harness(MockGenerationClient::new(), Duration::from_secs(5)).await;
        assert_eq!(
            h.engine.handle(&user(), Event::Abort).await,
            vec![Output::NoActiveDialogue]
        );
    }

    #[tokio::test]
    async fn lookup_failure_yields_service_unavailable_and_no_session() {
        let h = harness(MockGenerationClient::new(), Duration::from_secs(5)).await;
        h.lookup.set_unavailable(true);

        let outputs = h.engine.handle(&user(), Event::Entry).await;

        assert_eq!(outputs, vec![Output::ServiceUnavailable]);
        assert_eq!(h.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn generation_error_destroys_session() {
        let generator = MockGenerationClient::new().with_error(GenerationError::AuthenticationFailed);
        let h = harness(generator, Duration::from_secs(5)).await;

        assert_eq!(answer_all(&h).await, vec![Output::GenerationFailed]);
        assert_eq!(h.store.count().await.unwrap(), 0);
        assert_eq!(h.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn purge_idle_evicts_stale_sessions() {
        let h = harness(MockGenerationClient::new(), Duration::from_secs(5)).await;
        h.engine.handle(&user(), Event::Entry).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(h.engine.purge_idle(Duration::from_secs(3600)).await.unwrap(), 0);
        assert_eq!(h.engine.purge_idle(Duration::from_millis(5)).await.unwrap(), 1);
        assert_eq!(h.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn idle_sweeper_stops_on_cancel() {
        let h = harness(MockGenerationClient::new(), Duration::from_secs(5)).await;
        let cancel = CancellationToken::new();
        let handle = Arc::clone(&h.engine).spawn_idle_sweeper(
            Duration::from_millis(10),
            Duration::from_secs(60),
            cancel.clone(),
        );

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop")
            .unwrap();
    }
}
