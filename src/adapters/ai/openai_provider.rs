//! OpenAI provider - chat completions and query embeddings.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_timeout(Duration::from_secs(12));
//!
//! let provider = OpenAIProvider::new(config);
//! ```
//!
//! Structured-output requests set `response_format: {"type": "json_object"}`
//! so the model returns a single JSON object; parsing that object is the
//! caller's responsibility.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::conversation::Role;
use crate::ports::{
    CompletionProvider, CompletionRequest, CompletionResponse, OutputFormat, ProviderError,
    ProviderInfo, QueryEmbedder,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Chat model (e.g. "gpt-4o-mini").
    pub model: String,
    /// Embedding model for similarity queries.
    pub embedding_model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(12),
        }
    }

    /// Sets the chat model.
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

/// OpenAI API provider.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new provider; falls back to a default client if the builder
    /// fails (it only fails on malformed TLS backends).
    pub fn new(config: OpenAIConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.base_url)
    }

    fn to_wire_request(&self, request: &CompletionRequest) -> ChatWireRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }
        for turn in &request.history {
            messages.push(WireMessage {
                role: match turn.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                }
                .to_string(),
                content: turn.content.clone(),
            });
        }
        messages.push(WireMessage {
            role: "user".to_string(),
            content: request.user_text.clone(),
        });

        ChatWireRequest {
            model: self.config.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: match request.format {
                OutputFormat::FreeText => None,
                OutputFormat::StructuredJson => Some(ResponseFormat {
                    format_type: "json_object".to_string(),
                }),
            },
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
            500..=599 => ProviderError::Unavailable(format!("server error {status}: {body}")),
            code => ProviderError::Status {
                status: code,
                message: body,
            },
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let wire = self.to_wire_request(&request);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&wire)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(response).await?;

        let body: ChatWireResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedBody(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::MalformedBody("no choices in response".to_string()))?;

        Ok(CompletionResponse {
            content,
            model: body.model,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

#[async_trait]
impl QueryEmbedder for OpenAIProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let wire = EmbeddingWireRequest {
            model: self.config.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(self.config.api_key())
            .json(&wire)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = self.check_status(response).await?;

        let body: EmbeddingWireResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedBody(e.to_string()))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::MalformedBody("no embedding in response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatWireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatWireResponse {
    model: String,
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Serialize)]
struct EmbeddingWireRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingWireResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ConversationTurn;

    fn provider() -> OpenAIProvider {
        OpenAIProvider::new(OpenAIConfig::new("test-key"))
    }

    #[test]
    fn wire_request_orders_system_history_user() {
        let request = CompletionRequest::new("does it fit?")
            .with_system_prompt("classify intents")
            .with_history(&[
                ConversationTurn::user("hi"),
                ConversationTurn::assistant("hello"),
            ]);
        let wire = provider().to_wire_request(&request);

        let roles: Vec<&str> = wire.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(wire.messages.last().unwrap().content, "does it fit?");
    }

    #[test]
    fn structured_mode_requests_json_object() {
        let request = CompletionRequest::new("classify").with_format(OutputFormat::StructuredJson);
        let wire = provider().to_wire_request(&request);
        assert_eq!(
            wire.response_format.as_ref().map(|f| f.format_type.as_str()),
            Some("json_object")
        );

        let free = CompletionRequest::new("chat");
        assert!(provider().to_wire_request(&free).response_format.is_none());
    }
}
