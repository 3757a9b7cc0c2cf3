//! Release version value object
//!
//! Versions are strictly `MAJOR.MINOR.PATCH`; pre-release and build
//! metadata are rejected so that the local marker file and the deployed
//! marker compare unambiguously.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("'{0}' is not of the form MAJOR.MINOR.PATCH")]
    Malformed(String),
}

/// A `MAJOR.MINOR.PATCH` release version
///
/// Ordering is component-wise: major, then minor, then patch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse a version marker, ignoring surrounding whitespace
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let malformed = || VersionError::Malformed(trimmed.to_string());

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(malformed());
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            *slot = part.parse().map_err(|_| malformed())?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// True if `self` is strictly newer than `other`
    pub fn is_newer_than(&self, other: &Version) -> bool {
        newer(self, other)
    }
}

/// Component-wise "strictly greater" comparison; equal versions are not newer.
pub fn newer(a: &Version, b: &Version) -> bool {
    a > b
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
