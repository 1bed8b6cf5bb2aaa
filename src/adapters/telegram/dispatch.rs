//! Ordered per-user dispatch of dialogue events.
//!
//! Every user gets a queue drained by a single worker task, so a user's
//! events reach the engine, and their replies go out, in arrival order.
//! Different users never wait on each other. A queue closes after sitting
//! idle and is recreated on the user's next update.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

use crate::application::DialogueEngine;
use crate::domain::dialogue::{Event, Output};
use crate::domain::foundation::UserId;

const QUEUE_IDLE: Duration = Duration::from_secs(300);

/// Destination for a user's outputs.
#[async_trait]
pub trait ReplySink: Send + Sync + 'static {
    async fn deliver(&self, chat_id: i64, outputs: Vec<Output>);
}

/// One unit of work on a user's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run through the engine.
    Event(Event),
    /// Sent as is, in line with the user's other replies.
    Notice(Output),
}

#[derive(Debug)]
struct Job {
    chat_id: i64,
    step: Step,
}

type Queues = Arc<Mutex<HashMap<UserId, mpsc::UnboundedSender<Job>>>>;

pub struct Dispatcher<S> {
    engine: Arc<DialogueEngine>,
    sink: Arc<S>,
    queues: Queues,
    idle: Duration,
}

impl<S: ReplySink> Dispatcher<S> {
    pub fn new(engine: Arc<DialogueEngine>, sink: S) -> Self {
        Self {
            engine,
            sink: Arc::new(sink),
            queues: Arc::default(),
            idle: QUEUE_IDLE,
        }
    }

    /// How long a user's queue stays open without work.
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    /// Queues `step` behind the user's earlier steps.
    ///
    /// Callers dispatch updates in the order they were received. An event
    /// arriving while a review is being generated for the user is answered
    /// with [`Output::Busy`] straight away and never reaches the engine.
    pub fn dispatch(&self, user_id: UserId, chat_id: i64, step: Step) {
        if matches!(step, Step::Event(_)) && self.engine.is_generating(&user_id) {
            debug!(user_id = %user_id, "Event arrived during generation");
            let sink = Arc::clone(&self.sink);
            tokio::spawn(async move { sink.deliver(chat_id, vec![Output::Busy]).await });
            return;
        }

        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        let mut job = Job { chat_id, step };

        if let Some(tx) = queues.get(&user_id) {
            match tx.send(job) {
                Ok(()) => return,
                // Worker is gone; start a new one below.
                Err(mpsc::error::SendError(returned)) => job = returned,
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        if tx.send(job).is_ok() {
            queues.insert(user_id.clone(), tx);
            tokio::spawn(drain(
                user_id,
                rx,
                Arc::clone(&self.engine),
                Arc::clone(&self.sink),
                Arc::clone(&self.queues),
                self.idle,
            ));
        }
    }

    #[cfg(test)]
    fn open_queues(&self) -> usize {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

async fn drain<S: ReplySink>(
    user_id: UserId,
    mut rx: mpsc::UnboundedReceiver<Job>,
    engine: Arc<DialogueEngine>,
    sink: Arc<S>,
    queues: Queues,
    idle: Duration,
) {
    loop {
        let job = match timeout(idle, rx.recv()).await {
            Ok(Some(job)) => job,
            Ok(None) => break,
            Err(_) => match close_if_idle(&queues, &user_id, &mut rx) {
                Some(job) => job,
                None => break,
            },
        };

        let outputs = match job.step {
            Step::Event(event) => engine.handle(&user_id, event).await,
            Step::Notice(output) => vec![output],
        };
        if !outputs.is_empty() {
            sink.deliver(job.chat_id, outputs).await;
        }
    }
}

/// Removes the user's queue unless a job slipped in. `dispatch` sends under
/// the same lock, so nothing can be lost between the check and the removal.
fn close_if_idle(
    queues: &Queues,
    user_id: &UserId,
    rx: &mut mpsc::UnboundedReceiver<Job>,
) -> Option<Job> {
    let mut queues = queues.lock().unwrap_or_else(PoisonError::into_inner);
    match rx.try_recv() {
        Ok(job) => Some(job),
        Err(_) => {
            queues.remove(user_id);
            debug!(user_id = %user_id, "User queue closed");
            None
        }
    }
}
