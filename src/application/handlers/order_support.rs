//! Order support handler.
//!
//! Order status, returns and refunds live in the commerce backend, not here.
//! The handler acknowledges the topic and routes the user with a button
//! group rather than guessing at account data it can't see.

use async_trait::async_trait;

use crate::domain::agent::{AgentResponse, UiAction};

use super::{AgentHandler, HandlerContext, HandlerFailure};

/// Points order questions at the right support channel.
pub struct OrderSupportHandler;

impl OrderSupportHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrderSupportHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentHandler for OrderSupportHandler {
    async fn handle(&self, _ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure> {
        Ok(AgentResponse::text(
            "I can point you in the right direction for your order. What do you need help with?",
        )
        .with_action(UiAction::ButtonGroup {
            prompt: "Choose an option".to_string(),
            options: vec![
                "Order status".to_string(),
                "Returns & refunds".to_string(),
                "Talk to a person".to_string(),
            ],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::SessionContext;
    use crate::domain::foundation::UserId;
    use crate::domain::intent::{Intent, IntentKind};

    #[tokio::test]
    async fn offers_support_options() {
        let handler = OrderSupportHandler::new();
        let user_id = UserId::new("u1").unwrap();
        let mut session = SessionContext::empty();
        let intent = Intent::new(IntentKind::OrderSupport, 0.9);
        let response = handler
            .handle(HandlerContext {
                user_id: &user_id,
                utterance: "where is my order?",
                session: &mut session,
                history: &[],
                intent: &intent,
            })
            .await
            .unwrap();

        assert!(response.awaits_input());
        match &response.actions[0] {
            UiAction::ButtonGroup { options, .. } => assert_eq!(options.len(), 3),
            other => panic!("expected button group, got {other:?}"),
        }
    }
}
