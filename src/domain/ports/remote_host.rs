//! Remote Host Port
//!
//! The transport seam of the pipeline. Steps never spawn `ssh` themselves;
//! they go through [`RemoteHost`], which has a real implementation (SSH) and
//! a recording one used for dry runs.
//!
//! Commands are split by intent: [`RemoteHost::query`] only reads remote
//! state and is always executed, while `run`, `sudo` and `put` may mutate
//! the host and are the primitives a dry run replaces.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Captured result of a remote command
///
/// A non-zero exit status is not a transport error; callers decide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Synthetic successful result
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn ok(&self) -> bool {
        self.status == 0
    }
}

/// Transport-level failure (the command could not be delivered)
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to connect to {host}: {message}")]
    Connection { host: String, message: String },

    #[error("failed to copy {} to {remote}: {message}", local.display())]
    Copy {
        local: PathBuf,
        remote: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a remote operation: transport error or non-zero exit
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("`{command}` exited with status {status}: {stderr}")]
    Command {
        command: String,
        status: i32,
        stderr: String,
    },
}

impl RemoteError {
    /// Turn a non-zero exit into an error, keeping stderr verbatim
    pub fn check(command: &str, output: CommandOutput) -> Result<CommandOutput, RemoteError> {
        if output.ok() {
            Ok(output)
        } else {
            let stderr = if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            };
            Err(RemoteError::Command {
                command: command.to_string(),
                status: output.status,
                stderr,
            })
        }
    }
}

/// A single target machine
pub trait RemoteHost {
    /// Host name shown to the operator
    fn name(&self) -> &str;

    /// Run a read-only command (never mutates the host)
    fn query(&self, command: &str) -> Result<CommandOutput, TransportError>;

    /// Run a command as the connecting user
    fn run(&self, command: &str) -> Result<CommandOutput, TransportError>;

    /// Run a command with elevated privileges, feeding `input` on stdin
    fn sudo(&self, command: &str, input: Option<&str>) -> Result<CommandOutput, TransportError>;

    /// Copy a local file to a remote path
    fn put(&self, local: &Path, remote: &str) -> Result<(), TransportError>;
}

impl<T: RemoteHost + ?Sized> RemoteHost for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn query(&self, command: &str) -> Result<CommandOutput, TransportError> {
        (**self).query(command)
    }

    fn run(&self, command: &str) -> Result<CommandOutput, TransportError> {
        (**self).run(command)
    }

    fn sudo(&self, command: &str, input: Option<&str>) -> Result<CommandOutput, TransportError> {
        (**self).sudo(command, input)
    }

    fn put(&self, local: &Path, remote: &str) -> Result<(), TransportError> {
        (**self).put(local, remote)
    }
}

/// Join remote POSIX path segments
pub fn remote_join(base: &str, name: &str) -> String {
    if name.starts_with('/') {
        return name.to_string();
    }
    if base.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), name)
}
