//! Session cache port - best-effort key-value storage with TTL.
//!
//! The cache is advisory: implementations may fail, and callers must degrade
//! to stateless behavior rather than surface the failure.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Cache failures. Always soft: the session store logs and degrades.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Port for user-scoped key-value storage with expiry.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Reads a value; `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Writes a value, replacing any previous one and resetting its TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes a value; deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
