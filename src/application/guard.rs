//! Guarded Step Runner
//!
//! Wraps every pipeline step: announces the title, runs the body, classifies
//! the result and records it in the run log. Cancellation is honored only at
//! step boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::ports::{StepEvent, StepReporter};
use crate::domain::value_objects::{OutcomeKind, StepOutcome, StepResult};
use crate::error::{DeployError, DeployResult};

/// One executed step in the run log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub title: String,
    pub outcome: OutcomeKind,
}

pub struct StepRunner {
    reporter: Arc<dyn StepReporter>,
    cancel: Arc<AtomicBool>,
    log: Vec<StepRecord>,
}

impl StepRunner {
    pub fn new(reporter: Arc<dyn StepReporter>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            reporter,
            cancel,
            log: Vec::new(),
        }
    }

    /// Run a step and classify its result
    ///
    /// Returns `Err` only when the run was cancelled before or during the step.
    pub fn run<F>(&mut self, title: &str, body: F) -> DeployResult<StepOutcome>
    where
        F: FnOnce() -> StepResult,
    {
        if self.cancel.load(Ordering::SeqCst) {
            return Err(DeployError::Interrupted);
        }

        self.reporter.on_event(StepEvent::StepStarted { title });
        let outcome = StepOutcome::from(body());

        // An interrupt also reaches the step's child processes; their failure is not reported
        if self.cancel.load(Ordering::SeqCst) {
            tracing::debug!(title, "step interrupted");
            return Err(DeployError::Interrupted);
        }

        self.reporter.on_event(StepEvent::StepFinished {
            title,
            outcome: &outcome,
        });

        match &outcome {
            StepOutcome::Success => tracing::debug!(title, "step ok"),
            StepOutcome::Warning(message) => tracing::info!(title, %message, "step warning"),
            StepOutcome::Fatal(err) => tracing::debug!(title, error = ?err, "step failed"),
        }

        self.log.push(StepRecord {
            title: title.to_string(),
            outcome: outcome.kind(),
        });
        Ok(outcome)
    }

    /// Run a step, turning a fatal outcome into an error that stops the run
    pub fn step<F>(&mut self, title: &str, body: F) -> DeployResult<()>
    where
        F: FnOnce() -> StepResult,
    {
        match self.run(title, body)? {
            StepOutcome::Fatal(err) => Err(DeployError::Step {
                title: title.to_string(),
                message: format!("{err:#}"),
            }),
            StepOutcome::Success | StepOutcome::Warning(_) => Ok(()),
        }
    }

    pub fn stage(&self, name: &str) {
        self.reporter.on_event(StepEvent::Stage { name });
    }

    pub fn note(&self, message: &str) {
        self.reporter.on_event(StepEvent::Note { message });
    }

    /// Steps executed so far, in order
    pub fn records(&self) -> &[StepRecord] {
        &self.log
    }
}
