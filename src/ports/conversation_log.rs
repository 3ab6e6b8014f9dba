//! Conversation log port - append-only turn storage.
//!
//! Persistence (and the 5-minute conversation turnover boundary) belongs to
//! the collaborator behind this port; the orchestration core only appends
//! turns and consumes replayed history.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::ConversationTurn;
use crate::domain::foundation::ConversationId;

/// Conversation log failures.
#[derive(Debug, Clone, Error)]
pub enum LogError {
    #[error("conversation log unavailable: {0}")]
    Unavailable(String),
}

/// Port for append-only conversation storage.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Appends a turn to the conversation.
    async fn append(
        &self,
        conversation_id: ConversationId,
        turn: ConversationTurn,
    ) -> Result<(), LogError>;

    /// Replays the ordered history of a conversation.
    async fn replay(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<ConversationTurn>, LogError>;
}
