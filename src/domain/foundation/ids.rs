//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// End-user identifier as delivered by the transport.
///
/// Opaque to the dialogue core; the Telegram transport uses the numeric
/// Telegram user id rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of one dialogue run.
///
/// A fresh id is minted every time a Session is created, so a restart is
/// distinguishable from the dialogue it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueId(Uuid);

impl DialogueId {
    /// Creates a new random DialogueId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a DialogueId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DialogueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DialogueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DialogueId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn user_id_from_telegram_id() {
        let id = UserId::from(123456789_i64);
        assert_eq!(id.as_str(), "123456789");
        assert_eq!(UserId::from(42_u64).to_string(), "42");
    }

    #[test]
    fn dialogue_ids_are_unique() {
        assert_ne!(DialogueId::new(), DialogueId::new());
    }

    #[test]
    fn dialogue_id_round_trips_through_string() {
        let id = DialogueId::new();
        let parsed: DialogueId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
