//! Source Control Port
//!
//! Local repository queries used to stamp and guard a build.

use std::path::Path;

use crate::error::BuildInfoError;

pub trait SourceControl {
    /// Full hash of the latest commit in the repository at `root`
    fn latest_commit(&self, root: &Path) -> Result<String, BuildInfoError>;

    /// Whether the working tree has uncommitted changes
    ///
    /// Returns `None` when `root` is not a repository.
    fn is_dirty(&self, root: &Path) -> Result<Option<bool>, BuildInfoError>;
}
