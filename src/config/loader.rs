//! Configuration loading
//!
//! The deploy configuration is itself a template: it is rendered against the
//! process environment and the project root, then parsed as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::json;

use crate::domain::value_objects::ConfigWarning;
use crate::error::ConfigError;
use crate::infrastructure::template;

use super::types::DeployConfig;

/// Keys recognized in the fixed sections, used for "did you mean" hints
const KNOWN_KEYS: &[&str] = &[
    "BUILD",
    "PROVISION",
    "DEPLOY",
    "APP",
    "CACHE",
    "PROXY",
    "PRODUCT",
    "VERSION_FILE",
    "ARTIFACT_DIR",
    "INCLUDES",
    "DEPENDENCIES",
    "USER",
    "GROUP",
    "PYTHON",
    "REQUIREMENTS",
    "APP_PATH",
    "PRODUCTION_PATH",
    "DEPLOYED_ID_FILE",
    "LOCAL_CONFIG_PATH",
    "REMOTE_TMP_DIR",
];

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(
    path: &Path,
    local_root: &Path,
) -> Result<(DeployConfig, Vec<ConfigWarning>), ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let env: BTreeMap<String, String> = std::env::vars().collect();
    let rendered = template::render_str(
        &source,
        json!({ "env": env, "LOCAL_ROOT": local_root.display().to_string() }),
    )
    .map_err(|source| ConfigError::Render {
        path: path.to_path_buf(),
        source,
    })?;

    parse_with_warnings(&rendered, path)
}

/// Parse rendered configuration text
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> Result<(DeployConfig, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_str(content);

    let config: DeployConfig = serde_ignored::deserialize(&mut deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    deserializer.end().map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                suggestion: suggest_key(&leaf),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Suggest a known key for a misspelled one
fn suggest_key(key: &str) -> Option<String> {
    let upper = key.to_ascii_uppercase();
    KNOWN_KEYS
        .iter()
        .filter(|known| **known != upper)
        .map(|known| (levenshtein(&upper, known), *known))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, known)| known.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            current[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(current[j] + 1);
        }
        prev = current;
    }

    prev[b_chars.len()]
}
