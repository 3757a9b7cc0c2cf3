//! Step Event Port
//!
//! Provides an observable interface for pipeline progress.
//! The console reporter renders it; tests record it.

use crate::domain::value_objects::StepOutcome;

/// Event emitted while the pipeline runs
#[derive(Debug)]
pub enum StepEvent<'a> {
    /// A pipeline stage begins (`PRE DEPLOY`, `DEPLOY`, ...)
    Stage { name: &'a str },

    /// Free-form progress line (`setting up redis`)
    Note { message: &'a str },

    /// A guarded step started
    StepStarted { title: &'a str },

    /// A guarded step finished
    StepFinished {
        title: &'a str,
        outcome: &'a StepOutcome,
    },

    /// A mutating remote call was suppressed by a dry run
    DryRun { call: &'a str },
}

/// Trait for receiving step events
///
/// Implementations:
/// - `ConsoleReporter`: colored progress in the terminal
/// - `NoopReporter`: silent operation
pub trait StepReporter {
    fn on_event(&self, event: StepEvent<'_>);
}

/// No-op reporter for silent operation
pub struct NoopReporter;

impl StepReporter for NoopReporter {
    fn on_event(&self, _event: StepEvent<'_>) {}
}
