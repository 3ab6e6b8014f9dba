//! Redis configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Redis configuration
///
/// The URL is optional: without one the process keeps session context in
/// memory, which is fine for development and single-instance deployments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: Option<String>,

    /// Key prefix for all entries written by this service
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl RedisConfig {
    /// Check if a Redis URL is configured
    pub fn is_configured(&self) -> bool {
        self.url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.url {
            if !url.is_empty()
                && !url.starts_with("redis://")
                && !url.starts_with("rediss://")
            {
                return Err(ValidationError::InvalidRedisUrl);
            }
        }
        Ok(())
    }
}

fn default_key_prefix() -> String {
    "parts-concierge".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_is_valid() {
        let config = RedisConfig::default();
        assert!(!config.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let config = RedisConfig {
            url: Some("http://localhost:6379".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_redis_url() {
        let config = RedisConfig {
            url: Some("redis://localhost:6379".to_string()),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(config.validate().is_ok());
    }
}
