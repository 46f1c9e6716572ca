//! The asynchronous runner.
//!
//! An async unit of work signals its own completion, either by resolving the
//! future it returns ([`run_async`]) or by invoking the [`Done`] handle it is
//! given ([`run_with_done`]). Iterations never overlap: the next one is only
//! launched after the previous one has completed.

use crate::clock::Clock;
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;

/// Completion handle passed to callback-style units of work.
///
/// Call [`Done::complete`] once the measured operation has finished. The
/// handle may be moved to another thread. Dropping it without completing is
/// treated as a fault in the unit of work and aborts the run with a panic.
#[derive(Debug)]
pub struct Done {
    tx: oneshot::Sender<()>,
}

impl Done {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Signal that the operation has finished.
    pub fn complete(self) {
        // The receiver only disappears if the run itself was dropped.
        let _ = self.tx.send(());
    }
}

/// Run `work` repeatedly until `timeout` has elapsed and return how many
/// invocations completed.
///
/// Elapsed time is checked before each launch, so once the deadline has
/// passed no further invocation starts. With a zero timeout nothing runs and
/// the result is 0, unlike [`run_procedural`](crate::runner::run_procedural)
/// which always runs at least once.
///
/// There is no cancellation: a future that never resolves stalls the run.
pub async fn run_async<'a, C, T, F, Fut>(
    clock: &C,
    timeout: Duration,
    fixture: &'a T,
    mut work: F,
) -> u64
where
    C: Clock + ?Sized,
    T: ?Sized,
    F: FnMut(&'a T) -> Fut,
    Fut: Future<Output = ()>,
{
    let start = clock.now();
    let mut elapsed = Duration::ZERO;
    let mut iterations = 0u64;

    while elapsed < timeout {
        work(fixture).await;
        elapsed = clock.since(start);
        iterations += 1;
    }

    iterations
}

/// Callback-style flavour of [`run_async`].
///
/// Each invocation receives a fresh [`Done`] handle and the run suspends
/// until that handle is completed.
///
/// # Panics
///
/// Panics if `work` drops its handle without calling [`Done::complete`].
pub async fn run_with_done<'a, C, T, F>(
    clock: &C,
    timeout: Duration,
    fixture: &'a T,
    mut work: F,
) -> u64
where
    C: Clock + ?Sized,
    T: ?Sized,
    F: FnMut(Done, &T),
{
    run_async(clock, timeout, fixture, |fixture| {
        let (done, signal) = Done::channel();
        work(done, fixture);
        async move {
            if signal.await.is_err() {
                panic!("unit of work dropped its completion handle without calling `complete`");
            }
        }
    })
    .await
}
