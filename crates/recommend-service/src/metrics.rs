//! Human-facing view over a circuit breaker's raw metrics.
//!
//! The breaker itself (`recommend_core::CircuitMetrics`) only exposes raw
//! counters; this module formats them into the percentage strings and
//! `"successes/max"` shape the `/metrics/circuit-breakers` endpoint returns.

use recommend_core::{CircuitMetrics, CircuitState};
use serde::Serialize;

/// Formatted snapshot of a single circuit breaker.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerSnapshot {
    pub state: CircuitState,
    #[serde(rename = "failureRate")]
    pub failure_rate: String,
    #[serde(rename = "successfulCalls")]
    pub successful_calls: u64,
    #[serde(rename = "failedCalls")]
    pub failed_calls: u64,
    #[serde(rename = "windowFailureRate")]
    pub window_failure_rate: String,
    #[serde(rename = "consecutiveFailures")]
    pub consecutive_failures: u32,
    #[serde(rename = "halfOpenTrials")]
    pub half_open_trials: String,
}

impl CircuitBreakerSnapshot {
    pub fn from_metrics(metrics: &CircuitMetrics) -> Self {
        Self {
            state: metrics.state,
            failure_rate: format_percentage(metrics.failure_rate()),
            successful_calls: metrics.total_success,
            failed_calls: metrics.total_failure,
            window_failure_rate: format_percentage(metrics.window_failure_rate()),
            consecutive_failures: metrics.consecutive_failures,
            half_open_trials: if metrics.state == CircuitState::HalfOpen {
                format!("{}/{}", metrics.half_open_successes, metrics.half_open_max_trials)
            } else {
                "N/A".to_string()
            },
        }
    }
}

fn format_percentage(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
