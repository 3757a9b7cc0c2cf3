//! Password Store Secrets
//!
//! Resolves secret references through the `pass` command line tool. Only the
//! first line of an entry is the secret; the rest is metadata.

use std::process::{Command, Stdio};

use crate::domain::ports::{SecretError, SecretStore};

pub struct PassStore {
    program: String,
}

impl PassStore {
    pub fn new() -> Self {
        Self {
            program: "pass".to_string(),
        }
    }

    /// Use a different `pass`-compatible binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PassStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for PassStore {
    fn get(&self, path: &str) -> Result<String, SecretError> {
        tracing::debug!(path, "looking up secret");

        let output = Command::new(&self.program)
            .arg("show")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SecretError::Lookup {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not in the password store") {
                return Err(SecretError::NotFound {
                    path: path.to_string(),
                });
            }
            return Err(SecretError::Lookup {
                path: path.to_string(),
                message: stderr.trim().to_string(),
            });
        }

        first_line(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            SecretError::NotFound {
                path: path.to_string(),
            }
        })
    }
}

fn first_line(entry: &str) -> Option<String> {
    entry
        .lines()
        .next()
        .map(|line| line.trim_end_matches('\r').to_string())
        .filter(|line| !line.is_empty())
}
