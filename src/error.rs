//! Errors returned by the validating entry points.

use crate::options::Mode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a measurement before any timing starts.
#[derive(Debug, Error)]
pub enum Error {
    #[error("provisnr requires a mode ('procedural'/'async'). Set a mode on the options.")]
    MissingMode,

    #[error("unknown mode '{0}', expected 'procedural' or 'async'")]
    UnknownMode(String),

    #[error("provisnr requires a timeout. Set a timeout on the options.")]
    MissingTimeout,

    #[error("timeout must be a positive number of milliseconds")]
    ZeroTimeout,

    #[error("provisnr requires a callback. Set a callback on the options.")]
    MissingCallback,

    #[error(
        "provisnr requires exactly 2 callbacks for a comparison, got {found}. \
         Pass two named callbacks on the options."
    )]
    CallbackCount { found: usize },

    #[error("provisnr requires a complete callback in async mode. Set complete on the options.")]
    MissingComplete,

    #[error("callback '{name}' does not match {mode} mode")]
    ModeMismatch { name: String, mode: Mode },

    #[error("callback name '{0}' is used twice")]
    DuplicateName(String),

    #[error("async mode requires the `async` feature")]
    AsyncUnsupported,

    #[error("cannot block on an async run from inside a tokio runtime; await the runner directly")]
    NestedRuntime,

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
