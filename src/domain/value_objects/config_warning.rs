//! Configuration warning value object.

use std::path::PathBuf;

/// Non-fatal configuration warning surfaced to CLI users.
///
/// Produced while loading the deploy configuration, e.g. for keys that no
/// section recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted path of the unknown key (`BUILD.INCLUDE`)
    pub key: String,
    /// The file where the warning occurred
    pub file: PathBuf,
    /// A suggested correction if available
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}
