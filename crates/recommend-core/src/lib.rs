//! # Recommend Core
//!
//! Library half of the recommendation aggregation service: the injectable
//! clock, the outbound caller, and the per-dependency circuit breaker.
//!
//! ## Architecture
//!
//! - Business logic depends only on trait abstractions (`Clock`,
//!   `UpstreamClient`, `CircuitBreaker`).
//! - Infrastructure implementations (`SystemClock`, `ReqwestUpstreamClient`,
//!   `DefaultCircuitBreaker`) are injected at construction time.
//! - Nothing in this crate depends on HTTP framing; that lives in
//!   `recommend-service`.

pub mod caller;
pub mod circuit_breaker;
pub mod clock;

pub use caller::{CallError, ReqwestUpstreamClient, UpstreamClient};
pub use circuit_breaker::{
    BreakerConfig, CircuitBreaker, CircuitBreakerError, CircuitBreakerFactory, CircuitMetrics,
    CircuitState, DefaultCircuitBreaker, DefaultCircuitBreakerFactory,
};
pub use clock::{Clock, FakeClock, Instant, SystemClock};
