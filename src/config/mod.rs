//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is read with the
//! `PARTS_CONCIERGE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use parts_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod redis;
mod session;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Completion provider configuration (OpenAI/Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Redis configuration (session cache)
    #[serde(default)]
    pub redis: RedisConfig,

    /// Session context configuration
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads variables with the
    /// `PARTS_CONCIERGE` prefix, e.g.
    /// `PARTS_CONCIERGE__AI__OPENAI_API_KEY=sk-xxx` ->
    /// `ai.openai_api_key = "sk-xxx"`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PARTS_CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.redis.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("PARTS_CONCIERGE__AI__OPENAI_API_KEY");
        env::remove_var("PARTS_CONCIERGE__AI__PRIMARY_PROVIDER");
        env::remove_var("PARTS_CONCIERGE__REDIS__URL");
        env::remove_var("PARTS_CONCIERGE__SESSION__TTL_SECS");
    }

    #[test]
    fn test_load_with_no_env_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.ai.timeout_secs, 12);
        assert!(!config.redis.is_configured());
        assert_eq!(config.session.ttl_secs, 3600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_values_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PARTS_CONCIERGE__AI__OPENAI_API_KEY", "sk-test");
        env::set_var("PARTS_CONCIERGE__REDIS__URL", "redis://localhost:6379");
        env::set_var("PARTS_CONCIERGE__SESSION__TTL_SECS", "120");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.redis.url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.session.ttl_secs, 120);
    }

    #[test]
    fn test_primary_provider_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PARTS_CONCIERGE__AI__PRIMARY_PROVIDER", "anthropic");
        env::set_var("PARTS_CONCIERGE__AI__ANTHROPIC_API_KEY", "sk-ant-test");
        let result = AppConfig::load();
        env::remove_var("PARTS_CONCIERGE__AI__ANTHROPIC_API_KEY");
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.primary_provider, AiProvider::Anthropic);
        assert!(config.validate().is_ok());
    }
}
