//! Configuration type definitions
//!
//! Section and key names are upper-case in the file (`DEPLOY.APP_PATH`) so
//! the same names can be used as template variables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The whole deploy configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    #[serde(rename = "BUILD")]
    pub build: BuildSection,

    #[serde(rename = "PROVISION")]
    pub provision: ProvisionSection,

    #[serde(rename = "DEPLOY")]
    pub deploy: DeploySection,

    #[serde(rename = "APP", skip_serializing_if = "Option::is_none")]
    pub app: Option<ServiceSection>,

    #[serde(rename = "CACHE", skip_serializing_if = "Option::is_none")]
    pub cache: Option<ServiceSection>,

    #[serde(rename = "PROXY", skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ServiceSection>,
}

/// What goes into the artifact and how it is named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct BuildSection {
    /// Product name, first component of the artifact id
    pub product: Option<String>,
    /// Local file holding the `MAJOR.MINOR.PATCH` version
    pub version_file: String,
    /// Directory (relative to the project root) receiving archives
    pub artifact_dir: PathBuf,
    /// Paths packed into the archive, in order
    pub includes: Vec<Include>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            product: None,
            version_file: default_version_file(),
            artifact_dir: PathBuf::from("build"),
            includes: Vec::new(),
        }
    }
}

fn default_version_file() -> String {
    "__version__.py".to_string()
}

/// One archive input, optionally stored under another name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Include {
    Path(PathBuf),
    Aliased {
        #[serde(rename = "PATH")]
        path: PathBuf,
        #[serde(rename = "ALIAS", default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
}

impl Include {
    pub fn path(&self) -> &Path {
        match self {
            Self::Path(path) | Self::Aliased { path, .. } => path,
        }
    }

    /// Name inside the archive; defaults to the path itself
    pub fn archive_name(&self) -> PathBuf {
        match self {
            Self::Aliased {
                alias: Some(alias), ..
            } => PathBuf::from(alias),
            _ => self.path().to_path_buf(),
        }
    }
}

/// Host provisioning: packages, ownership, interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ProvisionSection {
    /// Packages that must already be installed on the host
    pub dependencies: Vec<String>,
    pub user: Option<String>,
    pub group: Option<String>,
    /// Interpreter used to create the virtual environment
    pub python: String,
    /// Requirements file inside the deployment
    pub requirements: String,
}

impl Default for ProvisionSection {
    fn default() -> Self {
        Self {
            dependencies: Vec::new(),
            user: None,
            group: None,
            python: "python3".to_string(),
            requirements: "requirements.txt".to_string(),
        }
    }
}

/// Remote layout of deployments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct DeploySection {
    /// Directory holding every deployment and the deployed-id marker
    pub app_path: Option<String>,
    /// Symlink pointing at the live deployment
    pub production_path: Option<String>,
    /// Marker file name, relative to `app_path`
    pub deployed_id_file: Option<String>,
    /// Local directory with the service config templates
    pub local_config_path: Option<PathBuf>,
    /// Remote staging directory for uploads
    pub remote_tmp_dir: String,
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            app_path: None,
            production_path: None,
            deployed_id_file: None,
            local_config_path: None,
            remote_tmp_dir: "/tmp".to_string(),
        }
    }
}

/// Configuration of one managed service (application, cache, proxy)
///
/// Keys other than the recognized ones are template variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ServiceSection {
    /// Template file name, also the remote file name inside the deployment
    pub config_file: Option<String>,
    /// systemd unit restarted after deployment
    pub service: Option<String>,
    /// `VARIABLE -> secret store path`; resolved before rendering
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub secrets: BTreeMap<String, String>,
    #[serde(flatten)]
    pub vars: Map<String, Value>,
}
