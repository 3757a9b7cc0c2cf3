//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod remote_host;
pub mod secret_store;
pub mod source_control;
pub mod step_events;

pub use remote_host::{remote_join, CommandOutput, RemoteError, RemoteHost, TransportError};
pub use secret_store::{SecretError, SecretStore};
pub use source_control::SourceControl;
pub use step_events::{NoopReporter, StepEvent, StepReporter};
