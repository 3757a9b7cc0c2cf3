//! Deployment Context
//!
//! State threaded through every pipeline step. Configuration sections are
//! fixed at construction; the remaining fields start empty and are filled in
//! by the steps that own them. Later steps must check for presence instead
//! of assuming it.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{BuildSection, DeployConfig, DeploySection, ProvisionSection, ServiceSection};
use crate::domain::value_objects::{Artifact, StepError, Version};

/// Optional per-service sections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceSections {
    pub app: Option<ServiceSection>,
    pub cache: Option<ServiceSection>,
    pub proxy: Option<ServiceSection>,
}

/// Accumulated state of one deployment run
#[derive(Debug, Clone)]
pub struct DeployContext {
    pub build: BuildSection,
    pub provision: ProvisionSection,
    pub deploy: DeploySection,
    pub services: ServiceSections,

    pub local_root: PathBuf,
    pub local_version: Version,
    pub commit_hash: String,
    pub short_commit_hash: String,
    pub timestamp: DateTime<Utc>,

    pub deploy_start_time: Option<DateTime<Utc>>,
    pub deploy_end_time: Option<DateTime<Utc>>,
    pub deployed_artifact_id: Option<String>,
    pub remote_version: Option<Version>,
    pub artifact: Option<Artifact>,
}

impl DeployContext {
    pub fn new(
        config: DeployConfig,
        local_root: PathBuf,
        local_version: Version,
        commit_hash: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let short_commit_hash =
            crate::domain::value_objects::short_commit(&commit_hash).to_string();
        Self {
            build: config.build,
            provision: config.provision,
            deploy: config.deploy,
            services: ServiceSections {
                app: config.app,
                cache: config.cache,
                proxy: config.proxy,
            },
            local_root,
            local_version,
            commit_hash,
            short_commit_hash,
            timestamp,
            deploy_start_time: None,
            deploy_end_time: None,
            deployed_artifact_id: None,
            remote_version: None,
            artifact: None,
        }
    }

    pub fn app_path(&self) -> Result<&str, StepError> {
        require(self.deploy.app_path.as_deref(), "dont know where the app is located")
    }

    pub fn production_path(&self) -> Result<&str, StepError> {
        require(
            self.deploy.production_path.as_deref(),
            "dont know where the production link is located",
        )
    }

    pub fn deployed_id_file(&self) -> Result<&str, StepError> {
        require(
            self.deploy.deployed_id_file.as_deref(),
            "dont know where the deployed id is stored",
        )
    }

    pub fn artifact(&self) -> Result<&Artifact, StepError> {
        self.artifact
            .as_ref()
            .ok_or_else(|| StepError::fatal("no artifact to deploy"))
    }

    /// Remote directory of the new deployment
    pub fn deploy_path(&self) -> Result<&str, StepError> {
        self.artifact
            .as_ref()
            .map(|a| a.deploy_path.as_str())
            .ok_or_else(|| StepError::fatal("unable to locate deployed app"))
    }

    /// Flatten the context into template variables
    ///
    /// DEPLOY, then PROVISION, then BUILD, then the gathered values; later
    /// entries win on key collisions.
    pub fn variables(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        merge_object(&mut vars, &self.deploy);
        merge_object(&mut vars, &self.provision);
        merge_object(&mut vars, &self.build);

        let mut put = |key: &str, value: Value| {
            vars.insert(key.to_string(), value);
        };

        put("LOCAL_ROOT", Value::from(self.local_root.display().to_string()));
        put("LOCAL_VERSION", Value::from(self.local_version.to_string()));
        put("COMMIT_HASH", Value::from(self.commit_hash.clone()));
        put("SHORT_COMMIT_HASH", Value::from(self.short_commit_hash.clone()));
        put("TIMESTAMP", Value::from(self.timestamp.to_rfc3339()));

        if let Some(start) = self.deploy_start_time {
            put("DEPLOY_START_TIME", Value::from(start.to_rfc3339()));
        }
        if let Some(end) = self.deploy_end_time {
            put("DEPLOY_END_TIME", Value::from(end.to_rfc3339()));
        }
        if let Some(id) = &self.deployed_artifact_id {
            put("DEPLOYED_ARTIFACT_ID", Value::from(id.clone()));
        }
        if let Some(remote) = &self.remote_version {
            put("REMOTE_VERSION", Value::from(remote.to_string()));
        }
        if let Some(artifact) = &self.artifact {
            put("ARTIFACT_ID", Value::from(artifact.id.to_string()));
            put("ARTIFACT_FILE", Value::from(artifact.file_name.clone()));
            put(
                "ARTIFACT_LOCAL_PATH",
                Value::from(artifact.local_path.display().to_string()),
            );
            put("ARTIFACT_MD5", Value::from(artifact.md5.clone()));
            put("DEPLOY_PATH", Value::from(artifact.deploy_path.clone()));
        }

        vars
    }
}

fn require<'a>(value: Option<&'a str>, message: &'static str) -> Result<&'a str, StepError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(StepError::fatal(message)),
    }
}

fn merge_object<T: Serialize>(vars: &mut Map<String, Value>, section: &T) {
    if let Ok(Value::Object(map)) = serde_json::to_value(section) {
        for (key, value) in map {
            if !value.is_null() {
                vars.insert(key, value);
            }
        }
    }
}
