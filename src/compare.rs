//! Side-by-side comparison of two units of work.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::report::Reporter;
use crate::result::{ComparisonResult, Reduction, RunResult};
use crate::runner::run_procedural;
use std::time::Duration;

#[cfg(feature = "async")]
use crate::async_runner::{run_async, run_with_done, Done};
#[cfg(feature = "async")]
use std::future::Future;

/// Drives two runners with the same clock and timeout and reduces their
/// counts into a verdict.
///
/// Units are passed as `(name, work)` pairs. The first pair always runs to
/// completion before the second one starts, and both see the same fixture.
/// The two names must differ; equal names are rejected with
/// [`Error::DuplicateName`] before either unit runs.
///
/// ```rust
/// use provisnr::{clock::ManualClock, Comparator};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let verdict = Comparator::new(&clock, Duration::from_millis(100)).compare(
///     &(),
///     ("cheap", |_: &()| clock.advance(Duration::from_millis(1))),
///     ("costly", |_: &()| clock.advance(Duration::from_millis(4))),
/// )?;
/// assert_eq!(verdict.winner(), Some("cheap"));
/// assert_eq!(verdict.faster_function.faster_in_percentage, Some(300));
/// # Ok::<(), provisnr::Error>(())
/// ```
pub struct Comparator<'c, C: ?Sized> {
    clock: &'c C,
    timeout: Duration,
    reduction: Reduction,
    reporter: Option<&'c dyn Reporter>,
}

impl<'c, C: Clock + ?Sized> Comparator<'c, C> {
    pub fn new(clock: &'c C, timeout: Duration) -> Self {
        Self {
            clock,
            timeout,
            reduction: Reduction::Strict,
            reporter: None,
        }
    }

    pub fn reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// Notify `reporter` about every run and verdict.
    pub fn reporter(mut self, reporter: &'c dyn Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Time a single procedural unit.
    pub fn measure<T, F>(&self, name: &str, fixture: &T, work: F) -> RunResult
    where
        T: ?Sized,
        F: FnMut(&T),
    {
        self.started(name);
        let iterations = run_procedural(self.clock, self.timeout, fixture, work);
        self.finished(name, iterations)
    }

    /// Compare two procedural units.
    pub fn compare<T, A, B>(&self, fixture: &T, a: (&str, A), b: (&str, B)) -> Result<ComparisonResult>
    where
        T: ?Sized,
        A: FnMut(&T),
        B: FnMut(&T),
    {
        distinct(a.0, b.0)?;
        let result_a = self.measure(a.0, fixture, a.1);
        let result_b = self.measure(b.0, fixture, b.1);
        self.verdict(&result_a, &result_b)
    }

    /// Time a single unit that completes by resolving a future.
    #[cfg(feature = "async")]
    pub async fn measure_async<'a, T, F, Fut>(&self, name: &str, fixture: &'a T, work: F) -> RunResult
    where
        T: ?Sized,
        F: FnMut(&'a T) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.started(name);
        let iterations = run_async(self.clock, self.timeout, fixture, work).await;
        self.finished(name, iterations)
    }

    /// Compare two units that complete by resolving futures.
    #[cfg(feature = "async")]
    pub async fn compare_async<'a, T, A, FutA, B, FutB>(
        &self,
        fixture: &'a T,
        a: (&str, A),
        b: (&str, B),
    ) -> Result<ComparisonResult>
    where
        T: ?Sized,
        A: FnMut(&'a T) -> FutA,
        FutA: Future<Output = ()>,
        B: FnMut(&'a T) -> FutB,
        FutB: Future<Output = ()>,
    {
        distinct(a.0, b.0)?;
        let result_a = self.measure_async(a.0, fixture, a.1).await;
        let result_b = self.measure_async(b.0, fixture, b.1).await;
        self.verdict(&result_a, &result_b)
    }

    /// Time a single unit that completes through a [`Done`] handle.
    #[cfg(feature = "async")]
    pub async fn measure_with_done<T, F>(&self, name: &str, fixture: &T, work: F) -> RunResult
    where
        T: ?Sized,
        F: FnMut(Done, &T),
    {
        self.started(name);
        let iterations = run_with_done(self.clock, self.timeout, fixture, work).await;
        self.finished(name, iterations)
    }

    /// Compare two units that complete through [`Done`] handles.
    #[cfg(feature = "async")]
    pub async fn compare_with_done<T, A, B>(
        &self,
        fixture: &T,
        a: (&str, A),
        b: (&str, B),
    ) -> Result<ComparisonResult>
    where
        T: ?Sized,
        A: FnMut(Done, &T),
        B: FnMut(Done, &T),
    {
        distinct(a.0, b.0)?;
        let result_a = self.measure_with_done(a.0, fixture, a.1).await;
        let result_b = self.measure_with_done(b.0, fixture, b.1).await;
        self.verdict(&result_a, &result_b)
    }

    fn started(&self, name: &str) {
        tracing::debug!(
            name,
            timeout_ms = self.timeout.as_millis() as u64,
            "run started"
        );
        if let Some(r) = self.reporter {
            r.run_start(name, self.timeout);
        }
    }

    fn finished(&self, name: &str, iterations: u64) -> RunResult {
        tracing::debug!(name, iterations, "run finished");
        let result = RunResult::new(name, iterations);
        if let Some(r) = self.reporter {
            r.run_end(&result);
        }
        result
    }

    fn verdict(&self, a: &RunResult, b: &RunResult) -> Result<ComparisonResult> {
        let result = self.reduction.reduce(a, b)?;
        match result.winner() {
            Some(winner) => tracing::info!(
                faster = winner,
                percentage = ?result.faster_function.faster_in_percentage,
                iterations = result.faster_function.faster_in_iterations,
                "comparison finished"
            ),
            None => tracing::info!(a = %a.name, b = %b.name, "comparison finished: equally fast"),
        }
        if let Some(r) = self.reporter {
            r.comparison_end(&result);
        }
        Ok(result)
    }
}

fn distinct(a: &str, b: &str) -> Result<()> {
    if a == b {
        return Err(Error::DuplicateName(a.to_string()));
    }
    Ok(())
}
