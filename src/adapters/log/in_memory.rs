//! In-memory append-only conversation log.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationTurn;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationLog, LogError};

/// In-memory conversation log for testing and local runs.
#[derive(Debug, Default)]
pub struct InMemoryConversationLog {
    turns: RwLock<HashMap<ConversationId, Vec<ConversationTurn>>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(
        &self,
        conversation_id: ConversationId,
        turn: ConversationTurn,
    ) -> Result<(), LogError> {
        self.turns
            .write()
            .await
            .entry(conversation_id)
            .or_default()
            .push(turn);
        Ok(())
    }

    async fn replay(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<ConversationTurn>, LogError> {
        Ok(self
            .turns
            .read()
            .await
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_replay_preserves_order() {
        let log = InMemoryConversationLog::new();
        let id = ConversationId::new();
        log.append(id, ConversationTurn::user("first")).await.unwrap();
        log.append(id, ConversationTurn::assistant("second")).await.unwrap();

        let history = log.replay(id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "second");
    }

    #[tokio::test]
    async fn unknown_conversation_replays_empty() {
        let log = InMemoryConversationLog::new();
        assert!(log.replay(ConversationId::new()).await.unwrap().is_empty());
    }
}
