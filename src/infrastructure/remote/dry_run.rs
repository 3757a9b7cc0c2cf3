//! Dry-Run Remote Host
//!
//! Wraps a real host. Read-only queries pass through so checks still see the
//! live state; every mutating primitive is reported and recorded instead of
//! executed, and answers with a synthetic success.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::ports::{
    CommandOutput, RemoteHost, StepEvent, StepReporter, TransportError,
};

/// A mutating call suppressed by a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Run(String),
    Sudo(String),
    Put { local: PathBuf, remote: String },
}

impl std::fmt::Display for RecordedCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Run(command) => write!(f, "{}", command),
            Self::Sudo(command) => write!(f, "sudo {}", command),
            Self::Put { local, remote } => write!(f, "put {} {}", local.display(), remote),
        }
    }
}

pub struct DryRunHost<H: RemoteHost> {
    inner: H,
    reporter: Arc<dyn StepReporter>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl<H: RemoteHost> DryRunHost<H> {
    pub fn new(inner: H, reporter: Arc<dyn StepReporter>) -> Self {
        Self {
            inner,
            reporter,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Calls suppressed so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    fn record(&self, call: RecordedCall) {
        let line = call.to_string();
        self.reporter.on_event(StepEvent::DryRun { call: &line });
        self.calls.borrow_mut().push(call);
    }
}

impl<H: RemoteHost> RemoteHost for DryRunHost<H> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn query(&self, command: &str) -> Result<CommandOutput, TransportError> {
        self.inner.query(command)
    }

    fn run(&self, command: &str) -> Result<CommandOutput, TransportError> {
        self.record(RecordedCall::Run(command.to_string()));
        Ok(CommandOutput::success(""))
    }

    fn sudo(&self, command: &str, _input: Option<&str>) -> Result<CommandOutput, TransportError> {
        self.record(RecordedCall::Sudo(command.to_string()));
        Ok(CommandOutput::success(""))
    }

    fn put(&self, local: &Path, remote: &str) -> Result<(), TransportError> {
        self.record(RecordedCall::Put {
            local: local.to_path_buf(),
            remote: remote.to_string(),
        });
        Ok(())
    }
}
