//! BusinessProfileLookup port - authorization plus questionnaire data.

use async_trait::async_trait;

use crate::domain::dialogue::ProfileResolution;
use crate::domain::foundation::UserId;

/// Resolves a user to their business category, questions and template.
///
/// Each call returns a fresh snapshot; callers do not cache it.
#[async_trait]
pub trait BusinessProfileLookup: Send + Sync {
    /// Returns `Unauthorized` for unknown users. Missing questions or
    /// template are reported inside the profile, not as errors.
    async fn resolve(&self, user_id: &UserId) -> Result<ProfileResolution, ProfileLookupError>;
}

/// The backing store could not answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileLookupError {
    #[error("database error: {0}")]
    Database(String),

    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

