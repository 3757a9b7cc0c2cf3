//! Domain Entities
//!
//! Core domain objects with identity and lifecycle.

mod context;

pub use context::{DeployContext, ServiceSections};
