//! Adapters - concrete implementations of the ports.

pub mod ai;
pub mod catalog;
pub mod log;
pub mod session;

pub use ai::{
    AnthropicConfig, AnthropicProvider, CircuitBreaker, CircuitBreakerConfig, CircuitState,
    CompletionError, HashEmbedder, MockCompletionProvider, OpenAIConfig, OpenAIProvider,
    ResilientCompletionClient,
};
pub use catalog::InMemoryProductStore;
pub use log::InMemoryConversationLog;
pub use session::{InMemorySessionCache, RedisSessionCache};
