//! Application layer: use cases wiring domain logic to ports.

pub mod handlers;
pub mod intent_router;
pub mod orchestrator;
pub mod session_store;

pub use handlers::{AgentHandler, HandlerContext, HandlerFailure};
pub use intent_router::IntentRouter;
pub use orchestrator::Orchestrator;
pub use session_store::{SessionContextStore, SESSION_TTL};
