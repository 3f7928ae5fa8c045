use std::{any::Any, fmt};

use thiserror::Error;

/// Boxed error returned by a fallible benchmarked function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shorthand for results carrying an [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any failure surfaced by the harness.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A benchmarked function failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// The API was used out of order.
    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Invalid benchmark configuration. Raised when the configuration is built,
/// never deferred to a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `iterations` is zero, negative or too large.
    #[error("iterations must be a positive 32-bit integer, got {value}")]
    InvalidIterations {
        /// The rejected value.
        value: i64,
    },

    /// `warmup` is negative or too large.
    #[error("warmup must be a non-negative 32-bit integer, got {value}")]
    InvalidWarmup {
        /// The rejected value.
        value: i64,
    },

    /// Two stats share a name.
    #[error("stat '{name}' is already present")]
    DuplicateStat {
        /// The repeated name.
        name: String,
    },

    /// Options have the wrong shape, an unknown key or an unknown identifier.
    #[error("invalid benchmark options: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A benchmarked function failed while being measured.
#[derive(Debug, Error)]
#[error("test '{test}' failed on iteration {iteration}: {cause}")]
pub struct ExecutionError {
    /// Name of the failing test.
    pub test: String,

    /// Zero-based invocation that failed.
    pub iteration: Iteration,

    /// What went wrong.
    #[source]
    pub cause: Failure,
}

/// Where in a test run a failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Iteration {
    /// An unmeasured warmup invocation.
    Warmup(u32),

    /// A measured invocation.
    Measured(u32),
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warmup(n) => write!(f, "{n} (warmup)"),
            Self::Measured(n) => write!(f, "{n}"),
        }
    }
}

/// How a benchmarked function failed.
#[derive(Debug, Error)]
pub enum Failure {
    /// The function panicked with this message.
    #[error("panicked: {0}")]
    Panicked(String),

    /// The function returned an error.
    #[error("returned error: {0}")]
    Returned(#[source] BoxError),
}

impl Failure {
    /// Extracts the message from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("<non-string panic payload>")
        };
        Self::Panicked(message)
    }
}

/// The API was used out of order.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Results were requested before a successful run.
    #[error("test '{test}' has no results; run it first")]
    NotRun {
        /// The test that has not run.
        test: String,
    },
}
