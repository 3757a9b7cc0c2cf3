//! Domain Layer
//!
//! The deployment model without I/O: the context threaded through the
//! pipeline, artifact identity, versions and step outcomes.
//!
//! ## Structure
//!
//! - `entities/` - The deployment context
//! - `value_objects/` - Immutable value types (Version, ArtifactId, StepOutcome)
//! - `ports/` - Interface definitions for infrastructure (remote host, secrets, git, events)

pub mod entities;
pub mod ports;
pub mod value_objects;
