//! General question handler.
//!
//! Catch-all for questions that don't need the catalog, and the landing spot
//! for troubleshooting follow-ups ("should I unplug it first?"). Leans on
//! conversation history so follow-ups resolve against what was already said.

use async_trait::async_trait;
use std::sync::Arc;

use tracing::warn;

use crate::adapters::ai::ResilientCompletionClient;
use crate::domain::agent::AgentResponse;
use crate::ports::CompletionRequest;

use super::{AgentHandler, HandlerContext, HandlerFailure};

const SYSTEM_PROMPT: &str =
    "You are a friendly appliance parts support assistant. Answer the user's question \
     directly and concisely, using the conversation so far for context. If the question \
     continues an earlier troubleshooting thread, answer in that thread's terms.";

/// Answers free-form questions with conversation context.
pub struct GeneralHandler {
    client: Arc<ResilientCompletionClient>,
}

impl GeneralHandler {
    pub fn new(client: Arc<ResilientCompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AgentHandler for GeneralHandler {
    async fn handle(&self, ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure> {
        let request = CompletionRequest::new(ctx.utterance)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_history(ctx.history)
            .with_temperature(0.5)
            .with_max_tokens(500);

        match self.client.complete(request).await {
            Ok(answer) => Ok(AgentResponse::text(answer)),
            Err(e) => {
                warn!(error = %e, "general answer generation failed");
                Ok(AgentResponse::text(
                    "I'm having trouble answering that right now. Could you rephrase, or \
                     give me a part or model number to work with?",
                ))
            }
        }
    }
}
