//! Resilient completion client: circuit breaker + provider fallback.
//!
//! Wraps two interchangeable completion providers. The breaker tracks the
//! primary's health; when the primary fails the secondary is tried once, and
//! only when both are exhausted does the caller see an error. No blind
//! retries on this path: retrying an already-degraded provider doubles
//! latency for nothing, so retry is a separate bounded helper reserved for
//! idempotent read-style calls.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ports::{CompletionProvider, CompletionRequest, ProviderError};

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};

/// Default attempts for the idempotent-read retry helper.
pub const RETRY_ATTEMPTS: u32 = 3;

/// Default fixed delay between retry attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Completion-layer failures, after all fallback paths are exhausted.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Breaker is open; no provider was called.
    #[error("completion circuit open; primary provider cooling down")]
    CircuitOpen,

    /// Both providers failed.
    #[error("all completion providers failed (primary: {primary}; fallback: {fallback})")]
    ProvidersExhausted {
        primary: ProviderError,
        fallback: ProviderError,
    },
}

/// Two-provider completion client with circuit breaker and fallback.
pub struct ResilientCompletionClient {
    primary: Arc<dyn CompletionProvider>,
    fallback: Arc<dyn CompletionProvider>,
    breaker: CircuitBreaker,
}

impl ResilientCompletionClient {
    /// Creates a client with the default breaker configuration.
    pub fn new(primary: Arc<dyn CompletionProvider>, fallback: Arc<dyn CompletionProvider>) -> Self {
        Self::with_breaker_config(primary, fallback, CircuitBreakerConfig::default())
    }

    /// Creates a client with explicit breaker tuning.
    pub fn with_breaker_config(
        primary: Arc<dyn CompletionProvider>,
        fallback: Arc<dyn CompletionProvider>,
        config: CircuitBreakerConfig,
    ) -> Self {
        Self {
            primary,
            fallback,
            breaker: CircuitBreaker::new(config),
        }
    }

    /// Current breaker state (for logging and tests).
    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Generates a completion, falling back to the secondary provider when
    /// the primary fails.
    ///
    /// When the breaker is open and the reset window has not elapsed, fails
    /// immediately with [`CompletionError::CircuitOpen`] without any network
    /// call.
    pub async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        if !self.breaker.should_allow() {
            debug!("completion fast-failed: circuit open");
            return Err(CompletionError::CircuitOpen);
        }

        let primary_err = match self.primary.complete(request.clone()).await {
            Ok(response) => {
                self.breaker.record_success();
                return Ok(response.content);
            }
            Err(err) => {
                self.breaker.record_failure();
                warn!(
                    provider = %self.primary.provider_info().name,
                    error = %err,
                    failures = self.breaker.failure_count(),
                    "primary completion provider failed, trying fallback"
                );
                err
            }
        };

        match self.fallback.complete(request).await {
            Ok(response) => {
                // A fallback success resets the shared breaker state.
                self.breaker.record_success();
                Ok(response.content)
            }
            Err(fallback_err) => {
                warn!(
                    provider = %self.fallback.provider_info().name,
                    error = %fallback_err,
                    "fallback completion provider failed"
                );
                Err(CompletionError::ProvidersExhausted {
                    primary: primary_err,
                    fallback: fallback_err,
                })
            }
        }
    }
}

/// Bounded retry with a fixed inter-attempt delay.
///
/// For idempotent read-style calls only (embedding and similarity lookups);
/// the completion path has its own single-attempt-per-provider breaker logic
/// instead.
pub async fn with_retry<T, E, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                debug!(attempt, error = %err, "retrying idempotent call");
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
