//! Troubleshooting handler.
//!
//! Generates numbered diagnostic steps for a reported symptom. The steps
//! always open with "Step 1:" so the flow analyzer can recognize a
//! diagnostic-given stage on the next turn.

use async_trait::async_trait;
use std::sync::Arc;

use tracing::warn;

use crate::adapters::ai::ResilientCompletionClient;
use crate::domain::agent::AgentResponse;
use crate::ports::CompletionRequest;

use super::{AgentHandler, HandlerContext, HandlerFailure};

const SYSTEM_PROMPT: &str =
    "You are an appliance repair assistant. The user describes a symptom. Reply with \
     a short numbered diagnostic checklist, beginning with 'Step 1:'. Prefer checks \
     the user can do safely without tools. Keep it under six steps.";

/// Fallback checklist when no provider is reachable.
const DEGRADED_STEPS: &str =
    "I can't generate a tailored checklist right now, but here's a safe place to start. \
     Step 1: unplug the appliance for two minutes and plug it back in. \
     Step 2: check the power outlet with another device. \
     Step 3: look for error codes on the display and note them down.";

/// Walks the user through diagnosing a symptom.
pub struct TroubleshootingHandler {
    client: Arc<ResilientCompletionClient>,
}

impl TroubleshootingHandler {
    pub fn new(client: Arc<ResilientCompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AgentHandler for TroubleshootingHandler {
    async fn handle(&self, ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure> {
        let request = CompletionRequest::new(ctx.utterance)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_history(ctx.history)
            .with_temperature(0.4)
            .with_max_tokens(500);

        match self.client.complete(request).await {
            Ok(steps) => Ok(AgentResponse::text(steps)),
            Err(e) => {
                warn!(error = %e, "troubleshooting generation failed, using canned steps");
                Ok(AgentResponse::text(DEGRADED_STEPS))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCompletionProvider;
    use crate::domain::agent::SessionContext;
    use crate::domain::foundation::UserId;
    use crate::domain::intent::{Intent, IntentKind};
    use crate::ports::ProviderError;

    async fn run(primary: MockCompletionProvider) -> AgentResponse {
        let fallback = MockCompletionProvider::new()
            .always_error(ProviderError::Unavailable("down".into()));
        let client = Arc::new(ResilientCompletionClient::new(
            Arc::new(primary),
            Arc::new(fallback),
        ));
        let handler = TroubleshootingHandler::new(client);
        let user_id = UserId::new("u1").unwrap();
        let mut session = SessionContext::empty();
        let intent = Intent::new(IntentKind::Troubleshooting, 0.9);
        handler
            .handle(HandlerContext {
                user_id: &user_id,
                utterance: "my ice maker stopped working",
                session: &mut session,
                history: &[],
                intent: &intent,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn returns_generated_steps() {
        let primary = MockCompletionProvider::new()
            .with_response("Step 1: check the water supply line.");
        let response = run(primary).await;
        assert!(response.message.starts_with("Step 1:"));
    }

    #[tokio::test]
    async fn degrades_to_canned_steps_when_providers_fail() {
        let primary = MockCompletionProvider::new()
            .always_error(ProviderError::Unavailable("down".into()));
        let response = run(primary).await;
        assert!(response.message.contains("Step 1:"));
        assert!(response.products.is_empty());
    }
}
