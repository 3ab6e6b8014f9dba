//! Conversation turn model.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Role of the turn author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// A single turn in a conversation.
///
/// Turns are append-only and owned by the conversation log; the orchestration
/// core only ever sees them as replayed, ordered history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who authored this turn.
    pub role: Role,
    /// Text content of the turn.
    pub content: String,
    /// Optional structured payload (e.g. an attached product list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// When the turn was recorded.
    pub created_at: Timestamp,
}

impl ConversationTurn {
    /// Creates a new turn.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            payload: None,
            created_at: Timestamp::now(),
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Creates a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Attaches a structured payload to the turn.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Returns the most recent `n` turns of `history`, oldest first.
pub fn recent_window(history: &[ConversationTurn], n: usize) -> &[ConversationTurn] {
    let start = history.len().saturating_sub(n);
    &history[start..]
}
