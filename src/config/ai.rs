//! Completion provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Primary completion provider
    #[serde(default)]
    pub primary_provider: AiProvider,

    /// OpenAI chat model
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Anthropic chat model
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Consecutive failures before the circuit opens
    #[serde(default = "default_breaker_threshold")]
    pub breaker_failure_threshold: u32,

    /// Seconds the circuit stays open before a half-open probe
    #[serde(default = "default_breaker_reset")]
    pub breaker_reset_secs: u64,
}

/// Completion provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get breaker reset window as Duration
    pub fn breaker_reset_window(&self) -> Duration {
        Duration::from_secs(self.breaker_reset_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate completion provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.breaker_failure_threshold == 0 {
            return Err(ValidationError::InvalidBreakerThreshold);
        }

        // The primary provider must have an API key when any key is set at
        // all; a fully keyless config is allowed and falls back to the mock.
        if !self.has_openai() && !self.has_anthropic() {
            return Ok(());
        }
        match self.primary_provider {
            AiProvider::OpenAI if !self.has_openai() => {
                Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: AiProvider::default(),
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            timeout_secs: default_timeout(),
            breaker_failure_threshold: default_breaker_threshold(),
            breaker_reset_secs: default_breaker_reset(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_timeout() -> u64 {
    12
}

fn default_breaker_threshold() -> u32 {
    3
}

fn default_breaker_reset() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.primary_provider, AiProvider::OpenAI);
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.breaker_failure_threshold, 3);
        assert_eq!(config.breaker_reset_secs, 60);
    }

    #[test]
    fn test_keyless_config_is_valid() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_primary_without_key_is_invalid() {
        let config = AiConfig {
            primary_provider: AiProvider::OpenAI,
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_primary_with_key_is_valid() {
        let config = AiConfig {
            primary_provider: AiProvider::Anthropic,
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_is_invalid() {
        let config = AiConfig {
            breaker_failure_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
