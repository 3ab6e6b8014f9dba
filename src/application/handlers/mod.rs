//! Domain handlers.
//!
//! One handler per intent, all behind [`AgentHandler`]. Handlers may extract
//! entities, query the product store, call the resilient completion client
//! and read/write session slots, but they all return the same
//! [`AgentResponse`] shape and the orchestrator never special-cases one by
//! identity. A handler that hits a downstream failure degrades to a generic
//! helpful message instead of erroring.

mod compatibility;
mod general;
mod installation;
mod order_support;
mod out_of_scope;
mod product_search;
mod troubleshooting;

pub use compatibility::CompatibilityHandler;
pub use general::GeneralHandler;
pub use installation::InstallationHandler;
pub use order_support::OrderSupportHandler;
pub use out_of_scope::OutOfScopeHandler;
pub use product_search::ProductSearchHandler;
pub use troubleshooting::TroubleshootingHandler;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::agent::{AgentResponse, SessionContext};
use crate::domain::conversation::ConversationTurn;
use crate::domain::foundation::UserId;
use crate::domain::intent::Intent;

/// Everything a handler may consume for one request.
pub struct HandlerContext<'a> {
    pub user_id: &'a UserId,
    /// Effective utterance (continuation rules may have rewritten it).
    pub utterance: &'a str,
    pub session: &'a mut SessionContext,
    pub history: &'a [ConversationTurn],
    pub intent: &'a Intent,
}

/// Unexpected handler failure.
///
/// Handlers degrade on their own downstream failures; this error exists so
/// the orchestrator boundary can still catch anything that slips through and
/// convert it into an apology response.
#[derive(Debug, Error)]
#[error("handler failure: {0}")]
pub struct HandlerFailure(pub String);

/// Collective handler contract.
#[async_trait]
pub trait AgentHandler: Send + Sync {
    async fn handle(&self, ctx: HandlerContext<'_>) -> Result<AgentResponse, HandlerFailure>;
}

/// Generic degradation message used when a handler's downstream calls fail.
pub(crate) const DEGRADED_MESSAGE: &str =
    "I'm having trouble reaching our systems right now. Could you try that again \
     in a moment, or give me a part number so I can look it up directly?";
