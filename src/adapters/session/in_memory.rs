//! In-memory session cache for testing and single-process runs.
//!
//! Expiry is checked lazily on read; expired entries are dropped then.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::{CacheError, SessionCache};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory session cache.
#[derive(Debug, Default)]
pub struct InMemorySessionCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a key to be expired (test hook for the expiry path).
    pub async fn force_expire(&self, key: &str) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Instant::now() - Duration::from_secs(1);
        }
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.value.clone()))
                }
                Some(_) => true,
            }
        };
        if expired {
            self.entries.write().await.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = InMemorySessionCache::new();
        cache
            .set("u1", r#"{"slot":"value"}"#, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("u1").await.unwrap().as_deref(),
            Some(r#"{"slot":"value"}"#)
        );
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let cache = InMemorySessionCache::new();
        cache.set("u1", "v", Duration::from_secs(60)).await.unwrap();
        cache.force_expire("u1").await;
        assert_eq!(cache.get("u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn overwrite_resets_value_and_ttl() {
        let cache = InMemorySessionCache::new();
        cache.set("u1", "old", Duration::from_secs(60)).await.unwrap();
        cache.set("u1", "new", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("u1").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn delete_missing_key_is_ok() {
        let cache = InMemorySessionCache::new();
        assert!(cache.delete("nobody").await.is_ok());
    }
}
