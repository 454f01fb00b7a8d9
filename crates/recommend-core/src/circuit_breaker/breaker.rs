//! Default circuit breaker implementation.
//!
//! Thread-safe, using `Arc<RwLock<InternalState>>` for state management.
//! Admission and bookkeeping run inside the write-lock critical section;
//! the downstream call itself runs outside of it.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use tokio::time::timeout;

use super::{
    BreakerConfig, CircuitBreaker, CircuitBreakerError, CircuitBreakerFactory, CircuitMetrics,
    CircuitState,
};
use crate::clock::{Clock, Instant};

// ============================================================================
// Internal State
// ============================================================================

/// Internal, lock-protected breaker state. Mirrors the data model in
/// spec.md §3 field for field.
#[derive(Debug)]
struct InternalState {
    current_state: CircuitState,
    window: VecDeque<bool>,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    half_open_trials: u32,
    half_open_successes: u32,
    total_success: u64,
    total_failure: u64,
}

impl InternalState {
    fn new() -> Self {
        Self {
            current_state: CircuitState::Closed,
            window: VecDeque::new(),
            consecutive_failures: 0,
            opened_at: None,
            half_open_trials: 0,
            half_open_successes: 0,
            total_success: 0,
            total_failure: 0,
        }
    }

    fn push_outcome(&mut self, success: bool, window_size: usize) {
        if self.window.len() >= window_size {
            self.window.pop_front();
        }
        self.window.push_back(success);
    }

    fn window_failures(&self) -> u64 {
        self.window.iter().filter(|outcome| !**outcome).count() as u64
    }

    fn window_failure_rate(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window_failures() as f64 / self.window.len() as f64
        }
    }
}

// ============================================================================
// Default Circuit Breaker
// ============================================================================

/// Default circuit breaker implementation.
pub struct DefaultCircuitBreaker<T, E> {
    config: BreakerConfig,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<InternalState>>,
    _phantom: std::marker::PhantomData<(T, E)>,
}

impl<T, E> DefaultCircuitBreaker<T, E> {
    pub fn new(config: BreakerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Arc::new(RwLock::new(InternalState::new())),
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Time-driven transition: if OPEN and the recovery deadline has
    /// elapsed, move to HALF_OPEN. Must run before every admission check
    /// and every metrics read.
    fn apply_time_driven_transition(&self, state: &mut InternalState) {
        if state.current_state != CircuitState::Open {
            return;
        }
        let Some(opened_at) = state.opened_at else {
            return;
        };
        if self.clock.now().saturating_duration_since(opened_at) >= self.config.open_state_duration
        {
            self.transition_to_half_open(state);
        }
    }

    fn trip_circuit(&self, state: &mut InternalState) {
        state.current_state = CircuitState::Open;
        state.opened_at = Some(self.clock.now());
        state.half_open_trials = 0;
        state.half_open_successes = 0;
    }

    fn transition_to_half_open(&self, state: &mut InternalState) {
        state.current_state = CircuitState::HalfOpen;
        state.opened_at = None;
        state.half_open_trials = 0;
        state.half_open_successes = 0;
    }

    fn close_circuit(&self, state: &mut InternalState) {
        state.current_state = CircuitState::Closed;
        state.opened_at = None;
        state.window.clear();
        state.consecutive_failures = 0;
        state.half_open_trials = 0;
        state.half_open_successes = 0;
    }

    fn record_success(&self, state: &mut InternalState) {
        state.total_success += 1;
        state.consecutive_failures = 0;
        state.push_outcome(true, self.config.window_size);

        if state.current_state == CircuitState::HalfOpen {
            state.half_open_successes += 1;
            if state.half_open_successes >= self.config.half_open_max_trials {
                self.close_circuit(state);
            }
        }
    }

    fn record_failure(&self, state: &mut InternalState) {
        state.total_failure += 1;
        state.consecutive_failures += 1;
        state.push_outcome(false, self.config.window_size);

        match state.current_state {
            CircuitState::HalfOpen => self.trip_circuit(state),
            CircuitState::Closed => {
                let consecutive_tripped =
                    state.consecutive_failures >= self.config.consecutive_failure_threshold;
                let window_tripped = state.window.len() >= self.config.window_size
                    && state.window_failure_rate() >= self.config.failure_rate_threshold;
                if consecutive_tripped || window_tripped {
                    self.trip_circuit(state);
                }
            }
            CircuitState::Open => {}
        }
    }

    fn metrics_from(&self, state: &InternalState) -> CircuitMetrics {
        CircuitMetrics {
            state: state.current_state,
            total_success: state.total_success,
            total_failure: state.total_failure,
            window_successes: state.window.iter().filter(|outcome| **outcome).count() as u64,
            window_failures: state.window_failures(),
            consecutive_failures: state.consecutive_failures,
            half_open_trials: state.half_open_trials,
            half_open_successes: state.half_open_successes,
            half_open_max_trials: self.config.half_open_max_trials,
        }
    }
}

#[async_trait]
impl<T, E> CircuitBreaker<T, E> for DefaultCircuitBreaker<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    async fn call<F, Fut>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, E>> + Send,
    {
        {
            let mut state = self
                .state
                .write()
                .map_err(|e| CircuitBreakerError::InternalError {
                    message: format!("failed to acquire write lock: {e}"),
                })?;

            self.apply_time_driven_transition(&mut state);

            match state.current_state {
                CircuitState::Closed => {}
                CircuitState::Open => {
                    tracing::debug!(breaker = %self.config.name, "rejecting call, breaker is OPEN");
                    return Err(CircuitBreakerError::RejectedOpen {
                        state: CircuitState::Open,
                    });
                }
                CircuitState::HalfOpen => {
                    if state.half_open_trials >= self.config.half_open_max_trials {
                        tracing::debug!(breaker = %self.config.name, "rejecting call, half-open trial budget exhausted");
                        return Err(CircuitBreakerError::RejectedOpen {
                            state: CircuitState::HalfOpen,
                        });
                    }
                    state.half_open_trials += 1;
                }
            }
        }

        let result = timeout(self.config.request_timeout, operation()).await;

        let mut state = self
            .state
            .write()
            .map_err(|e| CircuitBreakerError::InternalError {
                message: format!("failed to acquire write lock: {e}"),
            })?;

        match result {
            Ok(Ok(value)) => {
                self.record_success(&mut state);
                Ok(value)
            }
            Ok(Err(e)) => {
                self.record_failure(&mut state);
                tracing::warn!(breaker = %self.config.name, "operation failed");
                Err(CircuitBreakerError::OperationFailed(e))
            }
            Err(_) => {
                self.record_failure(&mut state);
                let timeout_ms = self.config.request_timeout.as_millis() as u64;
                tracing::warn!(breaker = %self.config.name, timeout_ms, "operation timed out");
                Err(CircuitBreakerError::Timeout { timeout_ms })
            }
        }
    }

    fn current_state(&self) -> CircuitState {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(_) => return CircuitState::Open,
        };
        self.apply_time_driven_transition(&mut state);
        state.current_state
    }

    fn metrics(&self) -> CircuitMetrics {
        let mut state = self.state.write().unwrap();
        self.apply_time_driven_transition(&mut state);
        self.metrics_from(&state)
    }

    fn reset(&self) {
        let mut state = self.state.write().unwrap();
        self.close_circuit(&mut state);
        state.total_success = 0;
        state.total_failure = 0;
    }
}

// ============================================================================
// Default Circuit Breaker Factory
// ============================================================================

/// Default factory for creating circuit breakers sharing one clock.
pub struct DefaultCircuitBreakerFactory {
    clock: Arc<dyn Clock>,
}

impl DefaultCircuitBreakerFactory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl CircuitBreakerFactory for DefaultCircuitBreakerFactory {
    fn create_circuit_breaker<T, E>(&self, config: BreakerConfig) -> DefaultCircuitBreaker<T, E>
    where
        T: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        DefaultCircuitBreaker::new(config, self.clock.clone())
    }
}

#[cfg(test)]
#[path = "breaker_tests.rs"]
mod tests;
