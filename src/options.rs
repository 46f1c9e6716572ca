//! Caller-facing options and their validation into typed run plans.
//!
//! Options are assembled with builder methods and may be incomplete;
//! [`TestOptions::validate`] and [`CompareOptions::validate`] check them in a
//! fixed order and produce a plan that only carries the fields valid for the
//! chosen mode. Nothing is invoked during validation.

use crate::error::{Error, Result};
use crate::result::ComparisonResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "async")]
use crate::async_runner::Done;

/// Execution model of the units of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A unit completes when it returns.
    Procedural,
    /// A unit signals completion through a [`Done`](crate::Done) handle.
    Async,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "procedural" => Ok(Mode::Procedural),
            "async" => Ok(Mode::Async),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Procedural => write!(f, "procedural"),
            Mode::Async => write!(f, "async"),
        }
    }
}

/// Produces the fixture shared by every iteration of a call.
pub type Generator<'a, T> = Box<dyn FnOnce() -> T + 'a>;

pub type ProceduralFn<'a, T> = Box<dyn FnMut(&T) + 'a>;

#[cfg(feature = "async")]
pub type CallbackFn<'a, T> = Box<dyn FnMut(Done, &T) + 'a>;

/// A unit of work to be measured.
pub enum Work<'a, T> {
    Procedural(ProceduralFn<'a, T>),
    #[cfg(feature = "async")]
    Async(CallbackFn<'a, T>),
}

impl<'a, T> Work<'a, T> {
    pub fn procedural(f: impl FnMut(&T) + 'a) -> Self {
        Work::Procedural(Box::new(f))
    }

    /// A unit that must call [`Done::complete`] once its operation has
    /// finished.
    #[cfg(feature = "async")]
    pub fn callback(f: impl FnMut(Done, &T) + 'a) -> Self {
        Work::Async(Box::new(f))
    }

    pub fn mode(&self) -> Mode {
        match self {
            Work::Procedural(_) => Mode::Procedural,
            #[cfg(feature = "async")]
            Work::Async(_) => Mode::Async,
        }
    }
}

impl<T> fmt::Debug for Work<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Work::{:?}", self.mode())
    }
}

/// Options for measuring a single unit of work.
///
/// ```rust
/// use provisnr::{Mode, TestOptions, Work};
///
/// let opts = TestOptions::<()>::new()
///     .mode(Mode::Procedural)
///     .timeout_ms(5)
///     .callback(Work::procedural(|_| {}));
/// let plan = opts.validate().unwrap();
/// assert_eq!(plan.mode(), Mode::Procedural);
/// ```
pub struct TestOptions<'a, T = ()> {
    mode: Option<Mode>,
    timeout: Option<Duration>,
    callback: Option<Work<'a, T>>,
    complete: Option<Box<dyn FnOnce(u64) + 'a>>,
    generator: Option<Generator<'a, T>>,
}

impl<T> Default for TestOptions<'_, T> {
    fn default() -> Self {
        Self {
            mode: None,
            timeout: None,
            callback: None,
            complete: None,
            generator: None,
        }
    }
}

impl<'a, T> TestOptions<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    pub fn callback(mut self, work: Work<'a, T>) -> Self {
        self.callback = Some(work);
        self
    }

    /// Receives the iteration count in async mode.
    pub fn complete(mut self, f: impl FnOnce(u64) + 'a) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn generator(mut self, f: impl FnOnce() -> T + 'a) -> Self {
        self.generator = Some(Box::new(f));
        self
    }

    /// Check the options and turn them into a plan.
    ///
    /// Without a generator the fixture is `T::default()`.
    pub fn validate(self) -> Result<TestPlan<'a, T>>
    where
        T: Default + 'a,
    {
        let Self {
            mode,
            timeout,
            callback,
            complete,
            generator,
        } = self;

        let mode = check_mode(mode)?;
        let timeout = check_timeout(timeout)?;
        let work = callback.ok_or(Error::MissingCallback)?;
        if mode == Mode::Async && complete.is_none() {
            return Err(Error::MissingComplete);
        }
        let generator = generator.unwrap_or_else(|| Box::new(T::default) as Generator<'a, T>);

        match (mode, work) {
            (Mode::Procedural, Work::Procedural(work)) => Ok(TestPlan::Procedural {
                timeout,
                generator,
                work,
            }),
            #[cfg(feature = "async")]
            (Mode::Async, Work::Async(work)) => Ok(TestPlan::Async {
                timeout,
                generator,
                work,
                complete: complete.ok_or(Error::MissingComplete)?,
            }),
            (mode, _) => Err(Error::ModeMismatch {
                name: "callback".to_string(),
                mode,
            }),
        }
    }
}

/// A validated single-unit measurement.
pub enum TestPlan<'a, T> {
    Procedural {
        timeout: Duration,
        generator: Generator<'a, T>,
        work: ProceduralFn<'a, T>,
    },
    #[cfg(feature = "async")]
    Async {
        timeout: Duration,
        generator: Generator<'a, T>,
        work: CallbackFn<'a, T>,
        complete: Box<dyn FnOnce(u64) + 'a>,
    },
}

impl<T> TestPlan<'_, T> {
    pub fn mode(&self) -> Mode {
        match self {
            TestPlan::Procedural { .. } => Mode::Procedural,
            #[cfg(feature = "async")]
            TestPlan::Async { .. } => Mode::Async,
        }
    }
}

impl<T> fmt::Debug for TestPlan<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestPlan::{:?}", self.mode())
    }
}

/// Options for comparing two named units of work.
///
/// Units are measured in the order they were added; the first one is "A".
pub struct CompareOptions<'a, T = ()> {
    mode: Option<Mode>,
    timeout: Option<Duration>,
    callbacks: Vec<(String, Work<'a, T>)>,
    complete: Option<Box<dyn FnOnce(ComparisonResult) + 'a>>,
    generator: Option<Generator<'a, T>>,
}

impl<T> Default for CompareOptions<'_, T> {
    fn default() -> Self {
        Self {
            mode: None,
            timeout: None,
            callbacks: Vec::new(),
            complete: None,
            generator: None,
        }
    }
}

impl<'a, T> CompareOptions<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    /// Add a named unit of work.
    pub fn callback(mut self, name: impl Into<String>, work: Work<'a, T>) -> Self {
        self.callbacks.push((name.into(), work));
        self
    }

    pub fn callbacks<N: Into<String>>(
        mut self,
        callbacks: impl IntoIterator<Item = (N, Work<'a, T>)>,
    ) -> Self {
        self.callbacks
            .extend(callbacks.into_iter().map(|(name, work)| (name.into(), work)));
        self
    }

    /// Receives the verdict in async mode.
    pub fn complete(mut self, f: impl FnOnce(ComparisonResult) + 'a) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn generator(mut self, f: impl FnOnce() -> T + 'a) -> Self {
        self.generator = Some(Box::new(f));
        self
    }

    /// Check the options and turn them into a plan.
    ///
    /// Without a generator the fixture is `T::default()`.
    pub fn validate(self) -> Result<ComparePlan<'a, T>>
    where
        T: Default + 'a,
    {
        let Self {
            mode,
            timeout,
            callbacks,
            complete,
            generator,
        } = self;

        let mode = check_mode(mode)?;
        let timeout = check_timeout(timeout)?;
        if callbacks.is_empty() {
            return Err(Error::MissingCallback);
        }
        if callbacks.len() != 2 {
            return Err(Error::CallbackCount {
                found: callbacks.len(),
            });
        }
        if mode == Mode::Async && complete.is_none() {
            return Err(Error::MissingComplete);
        }
        if callbacks[0].0 == callbacks[1].0 {
            return Err(Error::DuplicateName(callbacks[0].0.clone()));
        }
        if let Some((name, _)) = callbacks.iter().find(|(_, work)| work.mode() != mode) {
            return Err(Error::ModeMismatch {
                name: name.clone(),
                mode,
            });
        }
        let generator = generator.unwrap_or_else(|| Box::new(T::default) as Generator<'a, T>);

        let mut callbacks = callbacks.into_iter();
        let (Some(a), Some(b)) = (callbacks.next(), callbacks.next()) else {
            return Err(Error::CallbackCount { found: 0 });
        };

        match (a, b) {
            ((name_a, Work::Procedural(a)), (name_b, Work::Procedural(b))) => {
                Ok(ComparePlan::Procedural {
                    timeout,
                    generator,
                    a: (name_a, a),
                    b: (name_b, b),
                })
            }
            #[cfg(feature = "async")]
            ((name_a, Work::Async(a)), (name_b, Work::Async(b))) => Ok(ComparePlan::Async {
                timeout,
                generator,
                a: (name_a, a),
                b: (name_b, b),
                complete: complete.ok_or(Error::MissingComplete)?,
            }),
            #[allow(unreachable_patterns)]
            ((name, _), _) => Err(Error::ModeMismatch { name, mode }),
        }
    }
}

/// A validated comparison.
pub enum ComparePlan<'a, T> {
    Procedural {
        timeout: Duration,
        generator: Generator<'a, T>,
        a: (String, ProceduralFn<'a, T>),
        b: (String, ProceduralFn<'a, T>),
    },
    #[cfg(feature = "async")]
    Async {
        timeout: Duration,
        generator: Generator<'a, T>,
        a: (String, CallbackFn<'a, T>),
        b: (String, CallbackFn<'a, T>),
        complete: Box<dyn FnOnce(ComparisonResult) + 'a>,
    },
}

impl<T> ComparePlan<'_, T> {
    pub fn mode(&self) -> Mode {
        match self {
            ComparePlan::Procedural { .. } => Mode::Procedural,
            #[cfg(feature = "async")]
            ComparePlan::Async { .. } => Mode::Async,
        }
    }
}

impl<T> fmt::Debug for ComparePlan<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparePlan::Procedural { a, b, .. } => {
                write!(f, "ComparePlan::Procedural({} vs {})", a.0, b.0)
            }
            #[cfg(feature = "async")]
            ComparePlan::Async { a, b, .. } => write!(f, "ComparePlan::Async({} vs {})", a.0, b.0),
        }
    }
}

fn check_mode(mode: Option<Mode>) -> Result<Mode> {
    let mode = mode.ok_or(Error::MissingMode)?;
    if mode == Mode::Async && !cfg!(feature = "async") {
        return Err(Error::AsyncUnsupported);
    }
    Ok(mode)
}

fn check_timeout(timeout: Option<Duration>) -> Result<Duration> {
    match timeout {
        None => Err(Error::MissingTimeout),
        Some(t) if t.is_zero() => Err(Error::ZeroTimeout),
        Some(t) => Ok(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting<'a>(calls: &'a Cell<u32>) -> Work<'a, ()> {
        Work::procedural(move |_| calls.set(calls.get() + 1))
    }

    #[test]
    fn should_parse_mode_names() {
        assert_eq!("procedural".parse::<Mode>().unwrap(), Mode::Procedural);
        assert_eq!("async".parse::<Mode>().unwrap(), Mode::Async);
        assert!(matches!(
            "threaded".parse::<Mode>(),
            Err(Error::UnknownMode(m)) if m == "threaded"
        ));
        assert_eq!(Mode::Async.to_string(), "async");
    }

    #[test]
    fn should_require_mode_first() {
        let err = TestOptions::<()>::new().validate().unwrap_err();
        assert!(matches!(err, Error::MissingMode));
    }

    #[test]
    fn should_describe_plans_by_mode_and_names() {
        let calls = Cell::new(0);
        let plan = TestOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .callback(counting(&calls))
            .validate()
            .unwrap();
        assert_eq!(format!("{:?}", plan), "TestPlan::Procedural");

        let plan = CompareOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .callback("foo", counting(&calls))
            .callback("bar", counting(&calls))
            .validate()
            .unwrap();
        assert_eq!(format!("{:?}", plan), "ComparePlan::Procedural(foo vs bar)");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn should_reject_missing_or_zero_timeout() {
        let calls = Cell::new(0);
        let err = TestOptions::new()
            .mode(Mode::Procedural)
            .callback(counting(&calls))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::MissingTimeout));

        let err = CompareOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(0)
            .callback("foo", counting(&calls))
            .callback("bar", counting(&calls))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::ZeroTimeout));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn should_require_callback() {
        let err = TestOptions::<()>::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::MissingCallback));
    }

    #[test]
    fn should_reject_wrong_callback_count_without_invoking() {
        let calls = Cell::new(0);

        let err = CompareOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .callback("foo", counting(&calls))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::CallbackCount { found: 1 }));

        let err = CompareOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .callbacks([
                ("foo", counting(&calls)),
                ("bar", counting(&calls)),
                ("baz", counting(&calls)),
            ])
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::CallbackCount { found: 3 }));

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn should_reject_duplicate_names() {
        let calls = Cell::new(0);
        let err = CompareOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .callback("foo", counting(&calls))
            .callback("foo", counting(&calls))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName(n) if n == "foo"));
    }

    #[test]
    fn should_keep_insertion_order() {
        let calls = Cell::new(0);
        let plan = CompareOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .callback("zeta", counting(&calls))
            .callback("alpha", counting(&calls))
            .validate()
            .unwrap();

        match plan {
            ComparePlan::Procedural { a, b, .. } => {
                assert_eq!(a.0, "zeta");
                assert_eq!(b.0, "alpha");
            }
            #[allow(unreachable_patterns)]
            _ => panic!("expected a procedural plan"),
        }
    }

    #[test]
    fn should_default_fixture_without_generator() {
        let plan = TestOptions::<Vec<u8>>::new()
            .mode(Mode::Procedural)
            .timeout_ms(1)
            .callback(Work::procedural(|_| {}))
            .validate()
            .unwrap();
        match plan {
            TestPlan::Procedural { generator, .. } => assert!(generator().is_empty()),
            #[allow(unreachable_patterns)]
            _ => panic!("expected a procedural plan"),
        }
    }

    #[cfg(feature = "async")]
    #[test]
    fn should_require_complete_in_async_mode() {
        let err = TestOptions::<()>::new()
            .mode(Mode::Async)
            .timeout_ms(10)
            .callback(Work::callback(|done, _| done.complete()))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::MissingComplete));

        let err = CompareOptions::<()>::new()
            .mode(Mode::Async)
            .timeout_ms(10)
            .callback("foo", Work::callback(|done, _| done.complete()))
            .callback("bar", Work::callback(|done, _| done.complete()))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::MissingComplete));
    }

    #[cfg(feature = "async")]
    #[test]
    fn should_reject_work_of_other_mode() {
        let calls = Cell::new(0);
        let err = CompareOptions::new()
            .mode(Mode::Async)
            .timeout_ms(10)
            .callback("foo", Work::callback(|done, _| done.complete()))
            .callback("bar", counting(&calls))
            .complete(|_| {})
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ModeMismatch { ref name, mode: Mode::Async } if name == "bar"
        ));

        let err = TestOptions::new()
            .mode(Mode::Procedural)
            .timeout_ms(10)
            .callback(Work::callback(|done, _: &()| done.complete()))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::ModeMismatch { mode: Mode::Procedural, .. }));
    }
}
