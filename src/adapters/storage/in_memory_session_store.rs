//! In-Memory Session Store Adapter
//!
//! Keeps active dialogue sessions in a map guarded by a single async
//! `RwLock`. Every operation takes the lock once, so a replace is never
//! observed half-done.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::Session;
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for dialogue sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<UserId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.read().await.get(user_id).cloned())
    }

    async fn put(&self, session: Session) -> Result<Option<Session>, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.insert(session.user_id().clone(), session))
    }

    async fn remove(&self, user_id: &UserId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.write().await.remove(user_id))
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.read().await.len())
    }

    async fn purge_idle(&self, cutoff: &Timestamp) -> Result<Vec<UserId>, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<UserId> = sessions
            .iter()
            .filter(|(_, session)| session.is_idle_since(cutoff))
            .map(|(user_id, _)| user_id.clone())
            .collect();

        for user_id in &idle {
            sessions.remove(user_id);
        }
        Ok(idle)
    }
}
