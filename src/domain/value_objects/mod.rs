//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod artifact;
mod config_warning;
mod outcome;
mod version;

pub use artifact::{short_commit, Artifact, ArtifactId, ARTIFACT_EXTENSION, SHORT_COMMIT_LEN};
pub use config_warning::ConfigWarning;
pub use outcome::{OutcomeKind, StepError, StepOutcome, StepResult};
pub use version::{newer, Version, VersionError};
