//! Conversation domain: turn model and flow inference.
//!
//! Turn storage is owned by the conversation-log collaborator; this module
//! only defines the shape of a turn and pure analysis over replayed history.

mod flow;
mod turn;

pub use flow::{analyze_flow, ConversationStage, ConversationTopic, FlowContext, FLOW_WINDOW};
pub use turn::{recent_window, ConversationTurn, Role};
