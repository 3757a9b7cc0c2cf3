//! Remote Host Implementations
//!
//! - `ssh` - the real transport (one control-master connection per run)
//! - `dry_run` - records mutating calls instead of executing them
//! - `fs` - privileged file and system helpers built on any [`RemoteHost`]
//!
//! [`RemoteHost`]: crate::domain::ports::RemoteHost

mod dry_run;
mod fs;
mod ssh;

pub use dry_run::{DryRunHost, RecordedCall};
pub use fs::RemoteFs;
pub use ssh::SshHost;

/// Quote a value for safe use in a POSIX shell command
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
