//! Configuration module for hoist
//!
//! One JSON template (default `deploy.json`, overridable with `--config` or
//! `HOIST_CONFIG`) holds every section:
//!
//! - `BUILD` - artifact naming and contents
//! - `PROVISION` - host packages, ownership, interpreter
//! - `DEPLOY` - remote layout
//! - `APP`, `CACHE`, `PROXY` - optional per-service sections

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{load_with_warnings, parse_with_warnings};
pub use types::{
    BuildSection, DeployConfig, DeploySection, Include, ProvisionSection, ServiceSection,
};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "deploy.json";
