//! Injectable time source for the circuit breaker.
//!
//! The breaker's state machine is driven entirely by elapsed time
//! (`open_state_duration`, timeouts), so every "now" read goes through this
//! trait instead of a raw system call. Production wires `SystemClock`;
//! tests wire `FakeClock` and advance it explicitly, which makes the
//! time-driven transitions (P4, P5, scenarios 5-6) deterministic without
//! real sleeps.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A point in time relative to a clock's own epoch.
///
/// Not comparable across two different `Clock` instances; each breaker is
/// constructed with a single clock and only ever compares instants it
/// produced itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(Duration);

impl Instant {
    /// Duration elapsed between an earlier instant and this one, saturating
    /// at zero if `earlier` is actually later.
    pub fn saturating_duration_since(&self, earlier: Instant) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    pub fn checked_add(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }
}

/// Monotonic "now" source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by the platform's monotonic timer.
pub struct SystemClock {
    epoch: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant(self.epoch.elapsed())
    }
}

/// Test clock that only advances when told to.
#[derive(Clone)]
pub struct FakeClock {
    elapsed: Arc<Mutex<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap();
        *elapsed += duration;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        Instant(*self.elapsed.lock().unwrap())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
