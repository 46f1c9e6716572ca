//! The caller-facing measurement session.

use crate::clock::{Clock, MonotonicClock};
use crate::compare::Comparator;
use crate::config::ProvisnrConfig;
use crate::error::Result;
use crate::options::{ComparePlan, CompareOptions, TestOptions, TestPlan};
use crate::report::{ConsoleReporter, JsonReporter, MultiReporter, Reporter};
use crate::result::ComparisonResult;
use std::time::Duration;

#[cfg(feature = "async")]
use crate::error::Error;

/// Name reported for the unit of work measured by [`Provisnr::test_function`].
pub const SINGLE_RUN_NAME: &str = "callback";

/// Validates options, runs them and hands results to the configured
/// reporters.
///
/// A session holds no per-run state; every call is independent.
///
/// # Example
///
/// ```rust,no_run
/// use provisnr::{CompareOptions, Mode, Provisnr, Work};
///
/// let session = Provisnr::new();
/// let verdict = session
///     .compare_performance(
///         CompareOptions::new()
///             .mode(Mode::Procedural)
///             .timeout_ms(200)
///             .generator(|| (0..1_000u64).collect::<Vec<_>>())
///             .callback("iter_sum", Work::procedural(|v: &Vec<u64>| {
///                 std::hint::black_box(v.iter().sum::<u64>());
///             }))
///             .callback("fold_sum", Work::procedural(|v: &Vec<u64>| {
///                 std::hint::black_box(v.iter().fold(0u64, |a, b| a + b));
///             })),
///     )
///     .expect("valid options")
///     .expect("procedural mode returns the verdict");
///
/// println!("{:?}", verdict.winner());
/// ```
pub struct Provisnr<C = MonotonicClock> {
    config: ProvisnrConfig,
    clock: C,
    reporters: MultiReporter,
}

impl Provisnr {
    /// Create a new session with config from the environment.
    pub fn new() -> Self {
        Self::with_config(ProvisnrConfig::from_env())
    }

    /// Create a new session with explicit config.
    pub fn with_config(config: ProvisnrConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl Default for Provisnr {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Provisnr<C> {
    /// Create a session that reads time from `clock`.
    pub fn with_clock(config: ProvisnrConfig, clock: C) -> Self {
        // Default reporters: console (when verbose) + JSON (when a directory is set)
        let mut reporters = MultiReporter::default();
        if config.verbose {
            reporters.push(Box::new(ConsoleReporter::new()));
        }
        if let Some(dir) = &config.output_dir {
            reporters.push(Box::new(JsonReporter::new(dir.clone())));
        }

        Self {
            config,
            clock,
            reporters,
        }
    }

    pub fn config(&self) -> &ProvisnrConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Replace reporters with a custom set.
    pub fn reporters(&mut self, reporters: Vec<Box<dyn Reporter>>) -> &mut Self {
        self.reporters = MultiReporter::new(reporters);
        self
    }

    /// Add an additional reporter.
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) -> &mut Self {
        self.reporters.push(reporter);
        self
    }

    fn comparator(&self, timeout: Duration) -> Comparator<'_, C> {
        Comparator::new(&self.clock, timeout)
            .reduction(self.config.reduction)
            .reporter(&self.reporters)
    }

    /// Measure one unit of work.
    ///
    /// In procedural mode the iteration count is returned. In async mode it
    /// is handed to the `complete` callback and `Ok(None)` is returned.
    pub fn test_function<'a, T>(&self, options: TestOptions<'a, T>) -> Result<Option<u64>>
    where
        T: Default + 'a,
    {
        match options.validate()? {
            TestPlan::Procedural {
                timeout,
                generator,
                work,
            } => {
                let fixture = generator();
                let result = self
                    .comparator(timeout)
                    .measure(SINGLE_RUN_NAME, &fixture, work);
                Ok(Some(result.iterations))
            }
            #[cfg(feature = "async")]
            TestPlan::Async {
                timeout,
                generator,
                work,
                complete,
            } => {
                let runtime = blocking_runtime()?;
                let fixture = generator();
                let result = runtime.block_on(
                    self.comparator(timeout)
                        .measure_with_done(SINGLE_RUN_NAME, &fixture, work),
                );
                complete(result.iterations);
                Ok(None)
            }
        }
    }

    /// Compare two named units of work.
    ///
    /// In procedural mode the verdict is returned. In async mode it is handed
    /// to the `complete` callback and `Ok(None)` is returned.
    pub fn compare_performance<'a, T>(
        &self,
        options: CompareOptions<'a, T>,
    ) -> Result<Option<ComparisonResult>>
    where
        T: Default + 'a,
    {
        match options.validate()? {
            ComparePlan::Procedural {
                timeout,
                generator,
                a,
                b,
            } => {
                let fixture = generator();
                let verdict = self.comparator(timeout).compare(
                    &fixture,
                    (a.0.as_str(), a.1),
                    (b.0.as_str(), b.1),
                )?;
                Ok(Some(verdict))
            }
            #[cfg(feature = "async")]
            ComparePlan::Async {
                timeout,
                generator,
                a,
                b,
                complete,
            } => {
                let runtime = blocking_runtime()?;
                let fixture = generator();
                let verdict = runtime.block_on(self.comparator(timeout).compare_with_done(
                    &fixture,
                    (a.0.as_str(), a.1),
                    (b.0.as_str(), b.1),
                ))?;
                complete(verdict);
                Ok(None)
            }
        }
    }
}

#[cfg(feature = "async")]
fn blocking_runtime() -> Result<tokio::runtime::Runtime> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Error::NestedRuntime);
    }
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
