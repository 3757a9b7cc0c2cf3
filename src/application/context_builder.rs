//! Build Context
//!
//! Gathers local build metadata (version marker, commit, timestamp) and
//! merges it with the loaded configuration into a [`DeployContext`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::DeployConfig;
use crate::domain::entities::DeployContext;
use crate::domain::ports::SourceControl;
use crate::domain::value_objects::Version;
use crate::error::BuildInfoError;

/// Read and validate the local `MAJOR.MINOR.PATCH` version marker
pub fn read_local_version(root: &Path, version_file: &str) -> Result<Version, BuildInfoError> {
    let path = root.join(version_file);
    let contents = std::fs::read_to_string(&path).map_err(|source| BuildInfoError::VersionFile {
        path: path.clone(),
        source,
    })?;

    Version::parse(&contents).map_err(|source| BuildInfoError::MalformedVersion { path, source })
}

/// Assemble the initial context for a run rooted at `root`
pub fn build_context(
    root: PathBuf,
    config: DeployConfig,
    scm: &dyn SourceControl,
    now: DateTime<Utc>,
) -> Result<DeployContext, BuildInfoError> {
    let version = read_local_version(&root, &config.build.version_file)?;
    let commit = scm.latest_commit(&root)?;

    tracing::info!(%version, %commit, root = %root.display(), "gathered build information");
    Ok(DeployContext::new(config, root, version, commit, now))
}
