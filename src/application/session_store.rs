//! Session context store.
//!
//! Wraps the session-cache port with serde round-tripping and soft failure:
//! when the cache is unreachable, reads return an empty context and writes
//! are dropped with a log line. The orchestrator stays correct, just
//! stateless, when this collaborator is down.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::agent::SessionContext;
use crate::domain::foundation::UserId;
use crate::ports::SessionCache;

/// Idle window after which a user's context expires.
///
/// Conversation turnover (5 minutes) is a distinct, shorter boundary owned
/// by the conversation-log collaborator.
pub const SESSION_TTL: Duration = Duration::from_secs(3600);

/// Per-user session context store with sliding expiry.
pub struct SessionContextStore {
    cache: Arc<dyn SessionCache>,
    ttl: Duration,
}

impl SessionContextStore {
    /// Creates a store with the default 1-hour TTL.
    pub fn new(cache: Arc<dyn SessionCache>) -> Self {
        Self {
            cache,
            ttl: SESSION_TTL,
        }
    }

    /// Overrides the TTL (tests use short windows).
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Loads the context for `user_id`.
    ///
    /// Absent, expired, undecodable and unreachable all degrade to an empty
    /// context; this method never fails the request.
    pub async fn get(&self, user_id: &UserId) -> SessionContext {
        let key = Self::key(user_id);
        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(context) => context,
                Err(e) => {
                    warn!(user = %user_id, error = %e, "discarding undecodable session context");
                    SessionContext::empty()
                }
            },
            Ok(None) => SessionContext::empty(),
            Err(e) => {
                warn!(user = %user_id, error = %e, "session cache read failed, degrading to stateless");
                SessionContext::empty()
            }
        }
    }

    /// Persists `context`, overwriting entirely and resetting the TTL.
    ///
    /// Write failures are logged and swallowed.
    pub async fn set(&self, user_id: &UserId, context: &SessionContext) {
        let raw = match serde_json::to_string(context) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(user = %user_id, error = %e, "failed to encode session context");
                return;
            }
        };
        if let Err(e) = self.cache.set(&Self::key(user_id), &raw, self.ttl).await {
            warn!(user = %user_id, error = %e, "session cache write dropped");
        }
    }

    /// Clears the context for `user_id`. Best effort.
    pub async fn clear(&self, user_id: &UserId) {
        if let Err(e) = self.cache.delete(&Self::key(user_id)).await {
            warn!(user = %user_id, error = %e, "session cache delete dropped");
        }
    }

    fn key(user_id: &UserId) -> String {
        format!("session:{user_id}")
    }
}
