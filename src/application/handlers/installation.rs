//! Installation help handler.
//!
//! Links the part's install guide when the catalog has one; otherwise asks
//! the provider for general installation guidance.

use async_trait::async_trait;
use std::sync::Arc;

use tracing::warn;

use crate::adapters::ai::{with_retry, ResilientCompletionClient, RETRY_ATTEMPTS, RETRY_DELAY};
use crate::domain::agent::{AgentResponse, UiAction};
use crate::domain::intent::extract_part_number;
use crate::ports::{CompletionRequest, ProductStore};

use super::{AgentHandler, HandlerContext, HandlerFailure};

const SYSTEM_PROMPT: &str =
    "You are an appliance repair assistant. Give concise, safety-conscious installation \
     guidance for the part the user mentions. Always say to disconnect power (and water, \
     if relevant) first.";

/// Guides the user through installing a part.
pub struct InstallationHandler {
    store: Arc<dyn ProductStore>,
    client: Arc<ResilientCompletionClient>,
}

impl InstallationHandler {
    pub fn new(store: Arc<dyn ProductStore>, client: Arc<ResilientCompletionClient>) -> Self {
        Self { store, client }
    }
}

#[async_trait]
impl AgentHandler for InstallationHandler {
    async fn handle(&self, ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure> {
        let part_number = ctx
            .intent
            .entities
            .part_number
            .clone()
            .or_else(|| extract_part_number(ctx.utterance))
            .or_else(|| ctx.session.last_part_number.clone());

        if let Some(ref part) = part_number {
            let lookup = with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || {
                self.store.find_by_part_number(part)
            })
            .await;
            match lookup {
                Ok(records) => {
                    if let Some(record) = records.iter().find(|r| r.install_guide_url.is_some()) {
                        let url = record
                            .install_guide_url
                            .clone()
                            .unwrap_or_default();
                        return Ok(AgentResponse::text(format!(
                            "We have a step-by-step installation guide for the {}. Remember to \
                             disconnect power before you start. Good luck with the repair!",
                            record.name
                        ))
                        .with_product(record.to_ref())
                        .with_action(UiAction::GuideLink {
                            title: format!("Installing the {}", record.name),
                            url,
                        }));
                    }
                }
                Err(e) => warn!(error = %e, part, "install guide lookup failed"),
            }
        }

        let request = CompletionRequest::new(ctx.utterance)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_history(ctx.history)
            .with_temperature(0.4)
            .with_max_tokens(500);
        match self.client.complete(request).await {
            Ok(guidance) => Ok(AgentResponse::text(guidance)),
            Err(e) => {
                warn!(error = %e, "installation guidance generation failed");
                Ok(AgentResponse::text(
                    "I can't pull up detailed instructions right now. As a rule: disconnect \
                     power first, photograph the old part before removing it, and transfer \
                     fittings one at a time. If you share the part number I can look for a \
                     guide.",
                ))
            }
        }
    }
}
