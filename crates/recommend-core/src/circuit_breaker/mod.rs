//! Circuit breaker resilience pattern for preventing cascading failures.
//!
//! This module implements the circuit breaker that protects an outbound
//! call to a single upstream dependency.
//!
//! # Circuit Breaker States
//!
//! - **Closed**: Normal operation, requests pass through
//! - **Open**: Upstream is failing, requests are rejected immediately
//! - **Half-Open**: Testing recovery, a bounded number of probe requests
//!   are allowed through
//!
//! # Example
//!
//! ```rust
//! use recommend_core::circuit_breaker::{CircuitBreaker, BreakerConfig, DefaultCircuitBreaker};
//! use recommend_core::clock::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let breaker: DefaultCircuitBreaker<String, String> =
//!     DefaultCircuitBreaker::new(BreakerConfig::default(), Arc::new(SystemClock::new()));
//! let result = breaker.call(|| async { Ok("ok".to_string()) }).await;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

// Re-export implementation
mod breaker;
pub use breaker::{DefaultCircuitBreaker, DefaultCircuitBreakerFactory};

// ============================================================================
// Circuit Breaker Trait
// ============================================================================

/// Circuit breaker protection for a single outbound dependency.
///
/// # Type Parameters
///
/// - `T`: Success result type
/// - `E`: Operation error type
#[async_trait]
pub trait CircuitBreaker<T, E>: Send + Sync {
    /// Execute `operation` under the breaker's admission policy.
    ///
    /// - **Closed**: execute, track outcome.
    /// - **Open**: reject immediately with `RejectedOpen`, without running
    ///   `operation`.
    /// - **Half-Open**: admit up to `half_open_max_trials` probes; further
    ///   calls reject with `RejectedOpen`.
    async fn call<F, Fut>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send;

    /// Current state, performing any pending time-driven OPEN -> HALF_OPEN
    /// transition first.
    fn current_state(&self) -> CircuitState;

    /// Point-in-time metrics snapshot.
    fn metrics(&self) -> CircuitMetrics;

    /// Force the breaker back to CLOSED, zeroing all counters and the
    /// window (admin operation).
    fn reset(&self);

    /// Whether the breaker currently allows requests through.
    fn is_healthy(&self) -> bool {
        self.current_state().allows_requests()
    }
}

// ============================================================================
// Circuit Breaker Factory
// ============================================================================

/// Factory for creating circuit breakers sharing a single clock.
pub trait CircuitBreakerFactory: Send + Sync {
    /// Create a typed circuit breaker with the given configuration.
    fn create_circuit_breaker<T, E>(&self, config: BreakerConfig) -> DefaultCircuitBreaker<T, E>
    where
        T: Send + Sync + 'static,
        E: Send + Sync + 'static;
}

// ============================================================================
// Circuit State
// ============================================================================

/// Current state of the circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CircuitState {
    /// Normal operation, admitting every call.
    Closed,
    /// Fail-fast mode; every call is rejected without running.
    Open,
    /// Probing recovery with a bounded number of trial calls.
    HalfOpen,
}

impl CircuitState {
    /// Whether requests are allowed to run in this state.
    pub fn allows_requests(&self) -> bool {
        matches!(self, Self::Closed | Self::HalfOpen)
    }

    /// Whether this state indicates the dependency is unhealthy.
    pub fn is_failure_state(&self) -> bool {
        matches!(self, Self::Open | Self::HalfOpen)
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Open => write!(f, "OPEN"),
            Self::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

// ============================================================================
// Circuit Breaker Configuration
// ============================================================================

/// Configuration for circuit breaker behavior, immutable after construction.
///
/// The recognized options are exactly the fields below; there is no
/// provision for extra tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerConfig {
    /// Human label, used in logs and the metrics view.
    pub name: String,

    /// Per-call deadline enforced by the breaker itself.
    pub request_timeout: Duration,

    /// Count of recent outcomes retained for rate-based tripping.
    pub window_size: usize,

    /// Window failure rate, in [0,1], at or above which the breaker trips
    /// once the window is full.
    pub failure_rate_threshold: f64,

    /// Consecutive failures at or above which the breaker trips
    /// immediately, regardless of window fill.
    pub consecutive_failure_threshold: u32,

    /// How long the breaker stays OPEN before probing again.
    pub open_state_duration: Duration,

    /// Probe calls admitted while HALF_OPEN before either closing (all
    /// succeed) or re-tripping (one fails).
    pub half_open_max_trials: u32,
}

impl BreakerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            request_timeout: Duration::from_secs(2),
            window_size: 10,
            failure_rate_threshold: 0.5,
            consecutive_failure_threshold: 5,
            open_state_duration: Duration::from_secs(30),
            half_open_max_trials: 3,
        }
    }
}

// ============================================================================
// Circuit Metrics
// ============================================================================

/// Raw, point-in-time snapshot of breaker internals.
///
/// This is the data the breaker itself can report; the human-facing
/// percentage-formatted view lives in the metrics view component, built on
/// top of this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitMetrics {
    pub state: CircuitState,
    pub total_success: u64,
    pub total_failure: u64,
    pub window_successes: u64,
    pub window_failures: u64,
    pub consecutive_failures: u32,
    pub half_open_trials: u32,
    pub half_open_successes: u32,
    pub half_open_max_trials: u32,
}

impl CircuitMetrics {
    /// Failure rate over all recorded calls; 0.0 when none have occurred.
    pub fn failure_rate(&self) -> f64 {
        let total = self.total_success + self.total_failure;
        if total == 0 {
            0.0
        } else {
            self.total_failure as f64 / total as f64
        }
    }

    /// Failure rate within the current window; 0.0 when the window is empty.
    pub fn window_failure_rate(&self) -> f64 {
        let total = self.window_successes + self.window_failures;
        if total == 0 {
            0.0
        } else {
            self.window_failures as f64 / total as f64
        }
    }
}

// ============================================================================
// Circuit Breaker Error
// ============================================================================

/// Errors produced by a breaker-wrapped call.
#[derive(Debug, Error)]
pub enum CircuitBreakerError<E> {
    /// The breaker rejected the call without running it.
    #[error("circuit breaker rejected call, state is {state}")]
    RejectedOpen { state: CircuitState },

    /// `operation` did not complete within `request_timeout`.
    #[error("operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// `operation` ran and returned an error.
    #[error("operation failed: {0}")]
    OperationFailed(E),

    /// The breaker's own lock was poisoned by a prior panic.
    #[error("circuit breaker internal error: {message}")]
    InternalError { message: String },
}

impl<E> CircuitBreakerError<E> {
    /// Whether this error is counted as a failed outcome for the purposes
    /// of the breaker's own accounting (it is not, for rejections: a
    /// rejection never reaches the downstream service).
    pub fn counts_as_failure(&self) -> bool {
        matches!(self, Self::OperationFailed(_) | Self::Timeout { .. })
    }

    /// Whether this error is circuit-breaker admission protection rather
    /// than a downstream failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::RejectedOpen { .. })
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
