//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Maximum accepted length for an externally supplied user id.
const MAX_USER_ID_LEN: usize = 128;

/// Identifier for the user on whose behalf a request is processed.
///
/// User ids arrive from the transport layer (cookie, header, device id) and
/// are treated as opaque strings; they key session context in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a UserId, validating it is non-empty and within bounds.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        if raw.len() > MAX_USER_ID_LEN {
            return Err(ValidationError::UserIdTooLong {
                max: MAX_USER_ID_LEN,
                actual: raw.len(),
            });
        }
        Ok(Self(raw))
    }

    /// Returns the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Creates a new random ConversationId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ConversationId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
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
        assert_eq!(UserId::new(""), Err(ValidationError::EmptyUserId));
        assert_eq!(UserId::new("   "), Err(ValidationError::EmptyUserId));
    }

    #[test]
    fn user_id_rejects_oversized() {
        let raw = "x".repeat(MAX_USER_ID_LEN + 1);
        assert!(matches!(
            UserId::new(raw),
            Err(ValidationError::UserIdTooLong { .. })
        ));
    }

    #[test]
    fn user_id_round_trips() {
        let id = UserId::new("visitor-42").unwrap();
        assert_eq!(id.as_str(), "visitor-42");
        assert_eq!(id.to_string(), "visitor-42");
    }

    #[test]
    fn conversation_ids_are_unique() {
        assert_ne!(ConversationId::new(), ConversationId::new());
    }
}
