//! Secret Store Port
//!
//! Secrets are referenced by store path in the configuration and resolved
//! just before rendering.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    #[error("secret '{path}' not found")]
    NotFound { path: String },

    #[error("failed to look up secret '{path}': {message}")]
    Lookup { path: String, message: String },
}

/// Read access to a password store
pub trait SecretStore {
    /// Fetch the secret stored at `path`
    fn get(&self, path: &str) -> Result<String, SecretError>;
}
