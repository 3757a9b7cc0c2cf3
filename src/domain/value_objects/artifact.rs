//! Artifact Value Objects
//!
//! An artifact is the immutable unit shipped to the host. Its identity is
//! derived only from (product, build date, version, short commit), so two
//! builds of the same inputs always carry the same name.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::Version;

/// Length of the abbreviated commit hash embedded in artifact names
pub const SHORT_COMMIT_LEN: usize = 7;

/// File extension of packaged artifacts
pub const ARTIFACT_EXTENSION: &str = ".tar.gz";

/// Deterministic artifact identity: `{product}--{date}--{version}--{commit}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId {
    product: String,
    date: NaiveDate,
    version: Version,
    short_commit: String,
}

impl ArtifactId {
    pub fn new(
        product: impl Into<String>,
        built_at: DateTime<Utc>,
        version: Version,
        commit: &str,
    ) -> Self {
        Self {
            product: product.into(),
            date: built_at.date_naive(),
            version,
            short_commit: short_commit(commit).to_string(),
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Archive file name for this artifact
    pub fn file_name(&self) -> String {
        format!("{}{}", self, ARTIFACT_EXTENSION)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}--{}--{}--{}",
            self.product,
            self.date.format("%Y-%m-%d"),
            self.version,
            self.short_commit
        )
    }
}

impl Serialize for ArtifactId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Abbreviate a commit hash (no-op for hashes already short)
pub fn short_commit(commit: &str) -> &str {
    match commit.char_indices().nth(SHORT_COMMIT_LEN) {
        Some((idx, _)) => &commit[..idx],
        None => commit,
    }
}

/// A packaged artifact, created once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub id: ArtifactId,
    /// `{id}.tar.gz`
    pub file_name: String,
    /// Where the archive was written locally
    pub local_path: PathBuf,
    /// Hex MD5 digest of the archive bytes
    pub md5: String,
    /// Remote directory the artifact unpacks into
    pub deploy_path: String,
}
