//! Anthropic provider - messages API.
//!
//! Serves as the fallback completion provider. The messages API has no JSON
//! response-format switch, so structured-output requests append an explicit
//! JSON-only instruction to the system prompt instead; callers already treat
//! parse failure as a soft error either way.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::conversation::Role;
use crate::ports::{
    CompletionProvider, CompletionRequest, CompletionResponse, OutputFormat, ProviderError,
    ProviderInfo,
};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    /// Model to use (e.g. "claude-3-5-haiku-latest").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-3-5-haiku-latest".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(12),
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API provider.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new provider.
    pub fn new(config: AnthropicConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn to_wire_request(&self, request: &CompletionRequest) -> MessagesWireRequest {
        let mut system = request.system_prompt.clone().unwrap_or_default();
        if request.format == OutputFormat::StructuredJson {
            if !system.is_empty() {
                system.push(' ');
            }
            system.push_str("Respond with a single JSON object and nothing else.");
        }

        // The messages API takes only user/assistant turns; system content
        // goes in the dedicated field.
        let mut messages: Vec<WireMessage> = request
            .history
            .iter()
            .filter(|turn| turn.role != Role::System)
            .map(|turn| WireMessage {
                role: match turn.role {
                    Role::Assistant => "assistant",
                    _ => "user",
                }
                .to_string(),
                content: turn.content.clone(),
            })
            .collect();
        messages.push(WireMessage {
            role: "user".to_string(),
            content: request.user_text.clone(),
        });

        MessagesWireRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: if system.is_empty() { None } else { Some(system) },
            messages,
            temperature: request.temperature,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if e.is_connect() {
            ProviderError::Network(format!("connection failed: {e}"))
        } else {
            ProviderError::Network(e.to_string())
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 => ProviderError::AuthenticationFailed,
            429 => ProviderError::RateLimited {
                retry_after_secs: 30,
            },
            529 => ProviderError::Unavailable("api overloaded".to_string()),
            500..=599 => ProviderError::Unavailable(format!("server error {status}: {body}")),
            code => ProviderError::Status {
                status: code,
                message: body,
            },
        })
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let wire = self.to_wire_request(&request);

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&wire)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(response).await?;

        let body: MessagesWireResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedBody(e.to_string()))?;

        let content = body
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
            })
            .collect::<Vec<_>>()
            .join("");
        if content.is_empty() {
            return Err(ProviderError::MalformedBody(
                "no text content in response".to_string(),
            ));
        }

        Ok(CompletionResponse {
            content,
            model: body.model,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model)
    }
}

#[derive(Debug, Serialize)]
struct MessagesWireRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesWireResponse {
    model: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ConversationTurn;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(AnthropicConfig::new("test-key"))
    }

    #[test]
    fn system_turns_are_folded_out_of_messages() {
        let request = CompletionRequest::new("next question")
            .with_system_prompt("be helpful")
            .with_history(&[
                ConversationTurn::system("ignored in messages"),
                ConversationTurn::user("hi"),
            ]);
        let wire = provider().to_wire_request(&request);

        assert_eq!(wire.system.as_deref(), Some("be helpful"));
        let roles: Vec<&str> = wire.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "user"]);
    }

    #[test]
    fn structured_mode_appends_json_instruction() {
        let request = CompletionRequest::new("classify")
            .with_system_prompt("classify intents")
            .with_format(OutputFormat::StructuredJson);
        let wire = provider().to_wire_request(&request);
        let system = wire.system.unwrap();
        assert!(system.starts_with("classify intents"));
        assert!(system.contains("single JSON object"));
    }

    #[test]
    fn max_tokens_defaults_when_unset() {
        let wire = provider().to_wire_request(&CompletionRequest::new("hi"));
        assert_eq!(wire.max_tokens, DEFAULT_MAX_TOKENS);
    }
}
