//! Circuit breaker for the primary completion provider.
//!
//! ## States
//!
//! - **Closed**: normal operation, requests flow through
//! - **Open**: too many consecutive failures, requests fast-fail
//! - **Half-open**: reset window elapsed, the next request probes recovery
//!
//! ## Transitions
//!
//! ```text
//! Closed --[failure_threshold reached]--> Open
//! Open --[reset_window elapsed, next check]--> HalfOpen
//! HalfOpen --[success]--> Closed
//! HalfOpen --[failure]--> Open
//! ```
//!
//! The breaker is an explicitly owned, mutex-guarded state object held by
//! the resilient client instance. Transitions are read-modify-write under
//! one lock acquisition, so concurrent completion calls cannot lose counter
//! updates.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation.
    Closed,
    /// Fast-failing; no provider calls until the reset window elapses.
    Open,
    /// Probing recovery: one call proceeds, its outcome decides the state.
    HalfOpen,
}

/// Circuit breaker tuning.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive primary failures before opening.
    pub failure_threshold: u32,
    /// Time the circuit stays open before allowing a probe.
    pub reset_window: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            reset_window: Duration::from_secs(60),
        }
    }
}

/// Mutable breaker state behind the mutex.
#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
}

/// Mutex-guarded three-state circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Creates a breaker with the given configuration.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_failure: None,
            }),
        }
    }

    /// Current state, applying the open-to-half-open transition if due.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Whether a request may proceed.
    ///
    /// When the circuit is open and the reset window has elapsed, this
    /// transitions to half-open and admits the caller as the probe.
    pub fn should_allow(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let elapsed = inner
                    .last_failure
                    .map(|at| at.elapsed() >= self.config.reset_window)
                    .unwrap_or(true);
                if elapsed {
                    inner.state = CircuitState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Records a successful call: counter to zero, circuit closed.
    ///
    /// Also called after a fallback success; conflating "some provider
    /// answered" with "the primary is healthy" is a known simplification of
    /// this design (per-provider health tracking is the stricter option).
    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.last_failure = None;
    }

    /// Records a primary failure; opens the circuit at the threshold.
    ///
    /// A failure during the half-open probe reopens immediately.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        inner.last_failure = Some(Instant::now());
        if inner.state == CircuitState::HalfOpen
            || inner.consecutive_failures >= self.config.failure_threshold
        {
            inner.state = CircuitState::Open;
        }
    }

    /// Current consecutive-failure count.
    pub fn failure_count(&self) -> u32 {
        self.lock().consecutive_failures
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        // A poisoned lock means a panic mid-transition; the state itself is
        // still a valid enum + counter, so recover the guard.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}
