//! Time sources for the runners.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A monotonic time source.
///
/// Runners only ever look at the difference between two readings, so the
/// origin of the returned duration is arbitrary.
pub trait Clock {
    /// Current reading, measured from the clock's own origin.
    fn now(&self) -> Duration;

    /// Time elapsed since an earlier reading of this clock.
    fn since(&self, start: Duration) -> Duration {
        self.now().saturating_sub(start)
    }
}

/// Wall-clock time backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Units of work under test advance it to simulate their own cost, which
/// makes iteration counts fully deterministic.
///
/// ```rust
/// use provisnr::{clock::ManualClock, runner::run_procedural};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let n = run_procedural(&clock, Duration::from_millis(10), &(), |_| {
///     clock.advance(Duration::from_millis(1));
/// });
/// assert_eq!(n, 10);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_only_move_manual_clock_when_advanced() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.since(start), Duration::ZERO);

        clock.advance(Duration::from_millis(3));
        clock.advance(Duration::from_millis(4));
        assert_eq!(clock.since(start), Duration::from_millis(7));
    }

    #[test]
    fn should_observe_real_time_on_monotonic_clock() {
        let clock = MonotonicClock::new();
        let start = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.since(start) >= Duration::from_millis(5));
    }

    #[test]
    fn should_read_through_trait_object() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(1));
        let dynamic: &dyn Clock = &clock;
        assert_eq!(dynamic.since(Duration::from_millis(400)), Duration::from_millis(600));
    }
}
