//! AI adapters: provider integrations and the resilient completion layer.

mod anthropic_provider;
mod circuit_breaker;
mod hash_embedder;
mod mock_provider;
mod openai_provider;
mod resilient_client;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use hash_embedder::{HashEmbedder, HASH_EMBEDDING_DIM};
pub use mock_provider::MockCompletionProvider;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use resilient_client::{
    with_retry, CompletionError, ResilientCompletionClient, RETRY_ATTEMPTS, RETRY_DELAY,
};
