//! Per-user turn serialization.
//!
//! Events for one user are processed one at a time in arrival order; events
//! for different users never wait on each other. While a generation call is
//! in flight for a user, that user is marked so new events can be turned
//! away immediately instead of queueing behind the call.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as TurnLock, OwnedMutexGuard};

use crate::domain::foundation::UserId;

/// Held for the duration of one event.
pub type Turn = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct UserGate {
    turns: Mutex<HashMap<UserId, Arc<TurnLock<()>>>>,
    generating: Mutex<HashSet<UserId>>,
}

impl UserGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other event for this user is being processed.
    pub async fn acquire(&self, user_id: &UserId) -> Turn {
        let lock = {
            let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(turns.entry(user_id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    pub fn is_generating(&self, user_id: &UserId) -> bool {
        self.generating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(user_id)
    }

    /// Marks a generation call as in flight for the user.
    ///
    /// Returns `None` if one is already running. The mark is cleared when
    /// the returned guard drops.
    pub fn begin_generation(&self, user_id: &UserId) -> Option<GenerationMark<'_>> {
        let inserted = self
            .generating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.clone());

        inserted.then(|| GenerationMark {
            gate: self,
            user_id: user_id.clone(),
        })
    }

    /// Drops turn locks nobody is holding or waiting on.
    pub fn prune(&self) {
        self.turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Clears the in-flight mark on drop.
#[derive(Debug)]
pub struct GenerationMark<'a> {
    gate: &'a UserGate,
    user_id: UserId,
}

impl Drop for GenerationMark<'_> {
    fn drop(&mut self) {
        self.gate
            .generating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.user_id);
    }
}
