//! # provisnr
//!
//! Time-boxed throughput measurement for one unit of work, or a side-by-side
//! comparison of two.
//!
//! Each unit runs back-to-back for a fixed wall-clock window and the number
//! of completed iterations is counted. Two counts are reduced into a verdict
//! naming the faster unit and its lead. There is no warm-up and no
//! statistics: one timed window per run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use provisnr::{compare_performance, CompareOptions, Mode, Work};
//!
//! let verdict = compare_performance(
//!     CompareOptions::new()
//!         .mode(Mode::Procedural)
//!         .timeout_ms(500)
//!         .generator(|| "a,b,c,d".repeat(64))
//!         .callback("split", Work::procedural(|s: &String| {
//!             std::hint::black_box(s.split(',').count());
//!         }))
//!         .callback("matches", Work::procedural(|s: &String| {
//!             std::hint::black_box(s.matches(',').count() + 1);
//!         })),
//! )
//! .unwrap()
//! .unwrap();
//!
//! match verdict.winner() {
//!     Some(name) => println!("{name} wins by {:?}%", verdict.faster_function.faster_in_percentage),
//!     None => println!("tie"),
//! }
//! ```
//!
//! ## Features
//!
//! - **`async`** (default): units of work that signal completion through a
//!   [`Done`] handle or a future

pub mod clock;
mod compare;
mod config;
mod error;
mod options;
mod report;
mod result;
pub mod runner;
mod session;

#[cfg(feature = "async")]
pub mod async_runner;

pub use compare::Comparator;
pub use config::ProvisnrConfig;
pub use error::{Error, Result};
pub use options::{ComparePlan, CompareOptions, Generator, Mode, TestOptions, TestPlan, Work};
pub use report::{ConsoleReporter, JsonReporter, MultiReporter, Reporter};
pub use result::{
    collect_results, collect_results_compat, ComparisonResult, FasterFunction, Iterations,
    Reduction, RunResult,
};
pub use session::{Provisnr, SINGLE_RUN_NAME};

#[cfg(feature = "async")]
pub use async_runner::Done;

/// Measure one unit of work with a session configured from the environment.
///
/// See [`Provisnr::test_function`].
pub fn test_function<'a, T>(options: TestOptions<'a, T>) -> Result<Option<u64>>
where
    T: Default + 'a,
{
    Provisnr::new().test_function(options)
}

/// Compare two units of work with a session configured from the environment.
///
/// See [`Provisnr::compare_performance`].
pub fn compare_performance<'a, T>(options: CompareOptions<'a, T>) -> Result<Option<ComparisonResult>>
where
    T: Default + 'a,
{
    Provisnr::new().compare_performance(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_invalid_options_through_free_functions() {
        let err = test_function(TestOptions::<()>::new().mode(Mode::Procedural)).unwrap_err();
        assert!(matches!(err, Error::MissingTimeout));

        let err = compare_performance(
            CompareOptions::<()>::new()
                .mode(Mode::Procedural)
                .timeout_ms(5)
                .callback("only", Work::procedural(|_| {})),
        )
        .unwrap_err();
        assert!(matches!(err, Error::CallbackCount { found: 1 }));
        assert!(err.to_string().contains("exactly 2 callbacks"));
    }
}
