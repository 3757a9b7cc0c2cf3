//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `remote/` - SSH host, dry-run host, remote file helpers
//! - `git` - source control via the `git` binary
//! - `secrets` - `pass` password store
//! - `template` - minijinja rendering of JSON documents

pub mod git;
pub mod remote;
pub mod secrets;
pub mod template;

// Re-export for convenience
pub use git::GitCli;
pub use remote::{quote, DryRunHost, RecordedCall, RemoteFs, SshHost};
pub use secrets::PassStore;
pub use template::Document;
