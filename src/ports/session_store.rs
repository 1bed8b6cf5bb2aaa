//! Session Store Port - Per-user dialogue state.
//!
//! Holds at most one [`Session`] per user. Sessions are ephemeral and live
//! only as long as the process.
//!
//! Every operation is atomic per key: a reader sees either the previous
//! session or the replacement, never a mix.

use async_trait::async_trait;

use crate::domain::dialogue::Session;
use crate::domain::foundation::{Timestamp, UserId};

/// Keyed storage for active dialogue sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns a copy of the user's session, if any.
    async fn get(&self, user_id: &UserId) -> Result<Option<Session>, SessionStoreError>;

    /// Creates or replaces the session keyed by its user.
    ///
    /// Returns the session it replaced.
    async fn put(&self, session: Session) -> Result<Option<Session>, SessionStoreError>;

    /// Removes the user's session, returning it if one existed.
    async fn remove(&self, user_id: &UserId) -> Result<Option<Session>, SessionStoreError>;

    /// Number of active sessions.
    async fn count(&self) -> Result<usize, SessionStoreError>;

    /// Removes every session not updated since `cutoff`.
    ///
    /// Returns the owners of the purged sessions.
    async fn purge_idle(&self, cutoff: &Timestamp) -> Result<Vec<UserId>, SessionStoreError>;
}

/// Session store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

