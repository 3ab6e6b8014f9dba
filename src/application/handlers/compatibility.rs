//! Compatibility check handler.
//!
//! Resolving "does this part fit my appliance" needs two identifiers, which
//! rarely arrive in one message. The handler runs a four-state micro machine
//! over (part, model): have-neither asks for both, have-one stores it and
//! asks for the other (setting the `expecting` marker the orchestrator's
//! continuation rule watches), have-both resolves against the store and
//! clears the flow slots.

use async_trait::async_trait;
use std::sync::Arc;

use tracing::warn;

use crate::domain::agent::{AgentResponse, Expecting, UiAction};
use crate::domain::intent::{extract_model_number, extract_part_number};
use crate::ports::ProductStore;

use super::{AgentHandler, HandlerContext, HandlerFailure};

/// Checks part/model fitment.
pub struct CompatibilityHandler {
    store: Arc<dyn ProductStore>,
}

impl CompatibilityHandler {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AgentHandler for CompatibilityHandler {
    async fn handle(&self, ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure> {
        // Identifiers from this turn win over remembered ones.
        let part = extract_part_number(ctx.utterance)
            .or_else(|| ctx.intent.entities.part_number.clone())
            .or_else(|| ctx.session.last_part_number.clone());
        let model = extract_model_number(ctx.utterance)
            .or_else(|| ctx.intent.entities.model_number.clone())
            .or_else(|| ctx.session.last_model_number.clone());

        match (part, model) {
            (Some(part), Some(model)) => {
                let result = match self.store.check_compatibility(&part, &model).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(error = %e, part, model, "compatibility lookup failed");
                        return Ok(AgentResponse::text(super::DEGRADED_MESSAGE));
                    }
                };
                ctx.session.clear_compat_flow();
                let verdict = if result.compatible {
                    format!("Good news! {} Hope this helps with your repair.", result.detail)
                } else {
                    format!(
                        "{} I'd hold off on ordering that one. Anything else I can check for you?",
                        result.detail
                    )
                };
                Ok(AgentResponse::text(verdict))
            }
            (Some(part), None) => {
                ctx.session.last_part_number = Some(part.clone());
                ctx.session.expecting = Some(Expecting::ModelNumberForCompat);
                Ok(AgentResponse::text(format!(
                    "I can check if {part} fits your appliance. What's the model number? \
                     It's usually on a sticker inside the door or frame."
                ))
                .with_action(UiAction::InputRequest {
                    prompt: "Enter your appliance model number".to_string(),
                    field: "model_number".to_string(),
                }))
            }
            (None, Some(model)) => {
                ctx.session.last_model_number = Some(model.clone());
                ctx.session.expecting = Some(Expecting::PartNumberForCompat);
                Ok(AgentResponse::text(format!(
                    "Got it, model {model}. Which part are you looking at? The part number \
                     usually starts with PS."
                ))
                .with_action(UiAction::InputRequest {
                    prompt: "Enter the part number".to_string(),
                    field: "part_number".to_string(),
                }))
            }
            (None, None) => Ok(AgentResponse::text(
                "Happy to check compatibility. I'll need two things: the part number (starts \
                 with PS) and your appliance's model number.",
            )
            .with_action(UiAction::InputRequest {
                prompt: "Enter the part number and model number".to_string(),
                field: "part_and_model".to_string(),
            })),
        }
    }
}
