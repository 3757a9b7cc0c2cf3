//! Error types for hoist
//!
//! Uses `thiserror` for library errors. Step bodies report through
//! [`StepError`](crate::domain::value_objects::StepError); everything that escapes
//! the pipeline is a [`DeployError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{RemoteError, SecretError, TransportError};
use crate::domain::value_objects::VersionError;

/// Result type alias for pipeline operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Error that aborts the pipeline
#[derive(Error, Debug)]
pub enum DeployError {
    /// A guarded step failed fatally; the rest of the pipeline was skipped
    #[error("{title} {message}")]
    Step { title: String, message: String },

    /// The operator interrupted the run between steps
    #[error("interrupted")]
    Interrupted,

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Remote connection could not be established
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DeployError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("invalid configuration in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Template rendering errors
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("rendered {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Artifact packaging errors
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("include '{0}' does not exist")]
    MissingInclude(PathBuf),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("I/O error while packing: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while gathering local build metadata
#[derive(Error, Debug)]
pub enum BuildInfoError {
    #[error("unable to read {path}: {source}")]
    VersionFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is malformed: {source}")]
    MalformedVersion {
        path: PathBuf,
        #[source]
        source: VersionError,
    },

    #[error("{0} is not a repository")]
    NotARepository(PathBuf),

    #[error("git: {0}")]
    Git(String),
}

/// Service configuration errors
#[derive(Error, Debug)]
pub enum ConfigureError {
    #[error("local config path {0} does not exist")]
    LocalConfigMissing(PathBuf),

    #[error("dont know where the {0} config file is located")]
    ConfigFileUnset(String),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
