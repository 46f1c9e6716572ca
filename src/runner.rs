//! The procedural (synchronous) runner.

use crate::clock::Clock;
use std::time::Duration;

/// Run `work` back-to-back until `timeout` has elapsed and return how many
/// times it ran.
///
/// Elapsed time is sampled after every call, so the call that crosses the
/// deadline is still counted and the result is never below 1, even for a
/// zero timeout. Panics raised by `work` propagate to the caller.
pub fn run_procedural<C, T, F>(clock: &C, timeout: Duration, fixture: &T, mut work: F) -> u64
where
    C: Clock + ?Sized,
    T: ?Sized,
    F: FnMut(&T),
{
    let start = clock.now();
    let mut iterations = 0u64;

    loop {
        work(fixture);
        iterations += 1;

        if clock.since(start) >= timeout {
            return iterations;
        }
    }
}
