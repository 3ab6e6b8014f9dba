//! Out-of-scope handler.
//!
//! Fixed redirect for requests outside appliance parts. Also the registry's
//! default route, so anything unmapped lands on a safe answer.

use async_trait::async_trait;

use crate::domain::agent::AgentResponse;

use super::{AgentHandler, HandlerContext, HandlerFailure};

/// Politely declines requests outside the appliance-parts domain.
pub struct OutOfScopeHandler;

impl OutOfScopeHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OutOfScopeHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentHandler for OutOfScopeHandler {
    async fn handle(&self, _ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure> {
        Ok(AgentResponse::text(
            "I can help with appliance parts: finding the right part, checking whether it \
             fits your model, installation guides, and troubleshooting. Is there an \
             appliance I can help you with?",
        ))
    }
}
