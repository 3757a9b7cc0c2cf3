//! Step Outcome
//!
//! Every guarded step ends in exactly one of three outcomes. Step bodies
//! return [`StepResult`]; the runner turns it into a [`StepOutcome`] and
//! decides whether the pipeline continues.

use std::fmt;

/// Result returned by a step body
pub type StepResult<T = ()> = Result<T, StepError>;

/// Failure raised by a step body
///
/// `Warning` is the only recoverable class. Any other error converts into
/// `Fatal` through `?`.
#[derive(Debug)]
pub enum StepError {
    Warning(String),
    Fatal(anyhow::Error),
}

impl StepError {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    pub fn fatal(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Fatal(anyhow::Error::msg(message))
    }
}

impl<E> From<E> for StepError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self::Fatal(anyhow::Error::new(err))
    }
}

/// Classified outcome of a guarded step
#[derive(Debug)]
pub enum StepOutcome {
    Success,
    Warning(String),
    Fatal(anyhow::Error),
}

impl StepOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success => OutcomeKind::Success,
            Self::Warning(_) => OutcomeKind::Warning,
            Self::Fatal(_) => OutcomeKind::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl From<StepResult> for StepOutcome {
    fn from(result: StepResult) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(StepError::Warning(message)) => Self::Warning(message),
            Err(StepError::Fatal(err)) => Self::Fatal(err),
        }
    }
}

/// Outcome without its payload, kept in the run log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Warning,
    Fatal,
}

impl OutcomeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Warning => "WARNING",
            Self::Fatal => "FAILED",
        }
    }
}
