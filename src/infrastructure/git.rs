//! Git Source Control
//!
//! Implements [`SourceControl`] with the `git` binary.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::domain::ports::SourceControl;
use crate::error::BuildInfoError;

#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl GitCli {
    fn git(&self, root: &Path, args: &[&str]) -> Result<Output, BuildInfoError> {
        tracing::debug!(root = %root.display(), ?args, "git");
        Command::new("git")
            .arg("-C")
            .arg(root)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BuildInfoError::Git(e.to_string()))
    }
}

impl SourceControl for GitCli {
    fn latest_commit(&self, root: &Path) -> Result<String, BuildInfoError> {
        let output = self.git(root, &["rev-parse", "HEAD"])?;
        if !output.status.success() {
            return Err(BuildInfoError::NotARepository(root.to_path_buf()));
        }

        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if hash.is_empty() {
            return Err(BuildInfoError::NotARepository(root.to_path_buf()));
        }
        Ok(hash)
    }

    fn is_dirty(&self, root: &Path) -> Result<Option<bool>, BuildInfoError> {
        let output = self.git(root, &["status", "--porcelain"])?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(porcelain_is_dirty(&String::from_utf8_lossy(&output.stdout))))
    }
}

fn porcelain_is_dirty(status: &str) -> bool {
    status.lines().any(|line| !line.trim().is_empty())
}
