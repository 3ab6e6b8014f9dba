//! Ports - interfaces at the boundaries of the orchestration core.
//!
//! Each external collaborator (completion providers, product store, session
//! cache, conversation log) is specified here as an async trait plus its
//! error enum; adapters provide the concrete implementations.

mod ai_provider;
mod conversation_log;
mod embedder;
mod product_store;
mod session_cache;

pub use ai_provider::{
    CompletionProvider, CompletionRequest, CompletionResponse, OutputFormat, ProviderError,
    ProviderInfo, HISTORY_WINDOW,
};
pub use conversation_log::{ConversationLog, LogError};
pub use embedder::QueryEmbedder;
pub use product_store::{Compatibility, ProductRecord, ProductStore, ScoredProduct, StoreError};
pub use session_cache::{CacheError, SessionCache};
