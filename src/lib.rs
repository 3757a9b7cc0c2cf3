//! Hoist - single-host deployment pipeline
//!
//! Hoist packs a project into a versioned artifact, ships it to one host
//! over SSH, renders each service's configuration into the new deployment,
//! swaps the production link and restarts the services. Every step runs
//! under a guard that classifies it as OK, WARNING or FAILED; the first
//! failure stops the run.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{format_elapsed, DeployReport, Pipeline, StepRunner};
pub use config::{load_with_warnings, DeployConfig};
pub use domain::entities::DeployContext;
pub use error::{DeployError, DeployResult};
