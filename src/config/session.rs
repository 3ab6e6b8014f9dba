//! Session configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session context configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle seconds before a user's session context expires
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl SessionConfig {
    /// Get the TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}
