use super::*;
use recommend_core::{CircuitMetrics, CircuitState};

fn metrics(state: CircuitState) -> CircuitMetrics {
    CircuitMetrics {
        state,
        total_success: 6,
        total_failure: 4,
        window_successes: 5,
        window_failures: 5,
        consecutive_failures: 1,
        half_open_trials: 1,
        half_open_successes: 1,
        half_open_max_trials: 3,
    }
}

#[test]
fn formats_failure_rates_as_percentages() {
    let snapshot = CircuitBreakerSnapshot::from_metrics(&metrics(CircuitState::Closed));
    assert_eq!(snapshot.failure_rate, "40.0%");
    assert_eq!(snapshot.window_failure_rate, "50.0%");
    assert_eq!(snapshot.successful_calls, 6);
    assert_eq!(snapshot.failed_calls, 4);
}

#[test]
fn half_open_trials_is_na_outside_half_open() {
    let snapshot = CircuitBreakerSnapshot::from_metrics(&metrics(CircuitState::Closed));
    assert_eq!(snapshot.half_open_trials, "N/A");
}

#[test]
fn half_open_trials_is_formatted_as_successes_over_max_in_half_open() {
    let snapshot = CircuitBreakerSnapshot::from_metrics(&metrics(CircuitState::HalfOpen));
    assert_eq!(snapshot.half_open_trials, "1/3");
}

#[test]
fn rate_is_zero_percent_with_no_calls() {
    let mut m = metrics(CircuitState::Closed);
    m.total_success = 0;
    m.total_failure = 0;
    m.window_successes = 0;
    m.window_failures = 0;
    let snapshot = CircuitBreakerSnapshot::from_metrics(&m);
    assert_eq!(snapshot.failure_rate, "0.0%");
    assert_eq!(snapshot.window_failure_rate, "0.0%");
}
