//! Redis-backed session cache for production deployments.
//!
//! Values are written with `SET key value EX ttl`, so expiry is enforced by
//! Redis itself and every overwrite slides the TTL forward. Suitable for
//! multi-server deployments; all failures surface as
//! [`CacheError::Unavailable`] and are downgraded by the session store.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::ports::{CacheError, SessionCache};

/// Redis-backed session cache.
#[derive(Clone)]
pub struct RedisSessionCache {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisSessionCache {
    /// Creates a new cache over an established connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "parts-concierge".to_string(),
        }
    }

    /// Overrides the key prefix (for namespacing shared Redis instances).
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

/// `SET EX` takes whole seconds as `u64`; sub-second TTLs round up to one so
/// an entry is never written without an expiry.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get(self.full_key(key))
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(self.full_key(key), value, ttl_secs(ttl))
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.full_key(key))
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))
    }
}
