//! Completion provider port - interface for text-completion integrations.
//!
//! Abstracts the external reasoning providers (OpenAI, Anthropic, mocks)
//! behind a provider-agnostic request shape. All transport failures are
//! normalized into a single [`ProviderError`] so the resilient client can
//! treat timeout, non-2xx and malformed-body cases uniformly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{recent_window, ConversationTurn};

/// Maximum history turns forwarded to a provider.
pub const HISTORY_WINDOW: usize = 5;

/// Port for text-completion provider interactions.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, ProviderError>;

    /// Provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Requested output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Free natural-language text.
    FreeText,
    /// A single JSON object; callers parse it and treat failure as soft.
    StructuredJson,
}

/// Request for a completion.
///
/// Both providers receive the same shape: a system instruction, the most
/// recent [`HISTORY_WINDOW`] history turns, then the new user text.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction guiding the model.
    pub system_prompt: Option<String>,
    /// Prior turns, already capped to the history window.
    pub history: Vec<ConversationTurn>,
    /// The new user message.
    pub user_text: String,
    /// Response randomness (0.0 = deterministic).
    pub temperature: Option<f32>,
    /// Token budget for the generation.
    pub max_tokens: Option<u32>,
    /// Requested output shape.
    pub format: OutputFormat,
}

impl CompletionRequest {
    /// Creates a free-text request for the given user message.
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            history: Vec::new(),
            user_text: user_text.into(),
            temperature: None,
            max_tokens: None,
            format: OutputFormat::FreeText,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Attaches history, keeping only the most recent [`HISTORY_WINDOW`] turns.
    pub fn with_history(mut self, history: &[ConversationTurn]) -> Self {
        self.history = recent_window(history, HISTORY_WINDOW).to_vec();
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Response from a completion call.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text (or serialized JSON in structured mode).
    pub content: String,
    /// Model that produced the response.
    pub model: String,
}

/// Provider identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g. "openai", "anthropic").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Normalized provider failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Request exceeded the per-call deadline.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Network failure before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Non-2xx status not covered by a more specific variant.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// Provider reported itself unavailable.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// True when trying another provider (or trying again later) could help.
    ///
    /// Authentication and client-side request errors are not retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Timeout { .. }
            | ProviderError::Network(_)
            | ProviderError::RateLimited { .. }
            | ProviderError::Unavailable(_)
            | ProviderError::MalformedBody(_) => true,
            ProviderError::Status { status, .. } => *status >= 500,
            ProviderError::AuthenticationFailed => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_caps_history_to_window() {
        let history: Vec<_> = (0..9)
            .map(|i| ConversationTurn::user(format!("turn {i}")))
            .collect();
        let request = CompletionRequest::new("latest").with_history(&history);
        assert_eq!(request.history.len(), HISTORY_WINDOW);
        assert_eq!(request.history[0].content, "turn 4");
    }

    #[test]
    fn builder_defaults() {
        let request = CompletionRequest::new("hi");
        assert_eq!(request.format, OutputFormat::FreeText);
        assert!(request.system_prompt.is_none());
        assert!(request.history.is_empty());
    }

    #[test]
    fn retryable_classification() {
        assert!(ProviderError::Timeout { timeout_secs: 12 }.is_retryable());
        assert!(ProviderError::Unavailable("down".into()).is_retryable());
        assert!(ProviderError::Status { status: 503, message: String::new() }.is_retryable());
        assert!(!ProviderError::Status { status: 400, message: String::new() }.is_retryable());
        assert!(!ProviderError::AuthenticationFailed.is_retryable());
    }
}
