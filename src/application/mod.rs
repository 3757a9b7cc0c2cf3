//! Application Layer
//!
//! The deployment flow and its steps.
//! This layer:
//! - Depends on Domain layer (entities, ports, value objects)
//! - Talks to the host only through the `RemoteHost` port
//! - Coordinates between Infrastructure and Domain
//!
//! ## Steps
//!
//! - `context_builder` - local version, commit and timestamp
//! - `checks` - pre-deploy checks
//! - `package` - artifact packing and hashing
//! - `transfer` - upload and unpack
//! - `services` - cache, proxy and app configuration
//! - `restart` - post-deploy service restarts
//!
//! `guard` runs each step and `pipeline` sequences them.

pub mod checks;
pub mod context_builder;
pub mod guard;
pub mod package;
pub mod pipeline;
pub mod restart;
pub mod services;
pub mod transfer;

pub use guard::{StepRecord, StepRunner};
pub use pipeline::{format_elapsed, DeployReport, Pipeline};
pub use services::{ResolvedSection, ServiceKind, SERVICE_ORDER};
