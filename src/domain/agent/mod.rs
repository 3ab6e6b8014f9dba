//! Agent domain: the uniform response envelope and per-user session context.

mod response;
mod session_context;

pub use response::{AgentResponse, ProductRef, ResponseMetadata, UiAction};
pub use session_context::{Expecting, SessionContext};
