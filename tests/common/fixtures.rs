//! Project fixture: a small application with cache, proxy and app configs.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use hoist::application::StepRecord;
use hoist::domain::ports::{NoopReporter, RemoteHost, SecretStore, SourceControl};
use hoist::{DeployConfig, DeployReport, DeployResult, Pipeline, StepRunner};

pub const APP_PATH: &str = "/srv/pubpublica";
pub const PRODUCTION_PATH: &str = "/srv/pubpublica/production";
pub const MARKER: &str = "/srv/pubpublica/.deployed";

pub const REDIS_TEMPLATE: &str = r#"{"requirepass": "{{ REDIS_PASSWORD }}", "port": {{ REDIS_PORT }}}"#;
pub const NGINX_TEMPLATE: &str = r#"{"server_name": "{{ SERVER_NAME }}", "root": "{{ PRODUCTION_PATH }}"}"#;
pub const APP_TEMPLATE: &str =
    r#"{"secret_key": "{{ FLASK_SECRET_KEY }}", "version": "{{ LOCAL_VERSION }}", "debug": false}"#;

pub struct Project {
    pub dir: TempDir,
    pub config: DeployConfig,
}

impl Project {
    /// Project at version 2.3.0 with every section configured
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create project dir");
        let root = dir.path();

        write(root, "__version__.py", "2.3.0\n");
        write(root, "requirements.txt", "flask\nredis\n");
        write(root, "app/__init__.py", "");
        write(root, "app/views.py", "def index():\n    return 'ok'\n");
        write(root, "app/__pycache__/views.cpython-312.pyc", "bytecode");
        write(root, "config/.redis", REDIS_TEMPLATE);
        write(root, "config/.nginx", NGINX_TEMPLATE);
        write(root, "config/.pubpublica", APP_TEMPLATE);

        let config = serde_json::from_value(json!({
            "BUILD": {
                "PRODUCT": "pubpublica",
                "INCLUDES": ["app", "requirements.txt", "__version__.py"]
            },
            "PROVISION": {
                "DEPENDENCIES": ["redis-server", "nginx"],
                "USER": "pubpublica",
                "GROUP": "www-data"
            },
            "DEPLOY": {
                "APP_PATH": APP_PATH,
                "PRODUCTION_PATH": PRODUCTION_PATH,
                "DEPLOYED_ID_FILE": ".deployed",
                "LOCAL_CONFIG_PATH": "config"
            },
            "CACHE": {
                "CONFIG_FILE": ".redis",
                "SERVICE": "redis-server",
                "SECRETS": {"REDIS_PASSWORD": "pubpublica/redis"},
                "REDIS_PORT": 6379
            },
            "PROXY": {
                "CONFIG_FILE": ".nginx",
                "SERVICE": "nginx",
                "SERVER_NAME": "pubpublica.org"
            },
            "APP": {
                "CONFIG_FILE": ".pubpublica",
                "SERVICE": "pubpublica",
                "SECRETS": {"FLASK_SECRET_KEY": "pubpublica/flask"}
            }
        }))
        .expect("fixture config is valid");

        Self { dir, config }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn set_version(&self, version: &str) {
        write(self.dir.path(), "__version__.py", &format!("{version}\n"));
    }

    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.dir.path().join(relative)).expect("remove fixture file");
    }
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create fixture dir");
    }
    std::fs::write(path, contents).expect("write fixture file");
}

/// Result of one pipeline run
pub struct Run {
    pub result: DeployResult<DeployReport>,
    pub records: Vec<StepRecord>,
}

impl Run {
    pub fn titles(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.title.as_str()).collect()
    }

    /// `LABEL title` per executed step, one per line
    pub fn transcript(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{:<7} {}", r.outcome.label(), r.title))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn report(&self) -> &DeployReport {
        self.result.as_ref().expect("deployment succeeded")
    }
}

pub fn deploy(
    project: &Project,
    host: &dyn RemoteHost,
    scm: &dyn SourceControl,
    secrets: &dyn SecretStore,
) -> Run {
    deploy_with_cancel(project, host, scm, secrets, Arc::new(AtomicBool::new(false)))
}

pub fn deploy_with_cancel(
    project: &Project,
    host: &dyn RemoteHost,
    scm: &dyn SourceControl,
    secrets: &dyn SecretStore,
    cancel: Arc<AtomicBool>,
) -> Run {
    let runner = StepRunner::new(Arc::new(NoopReporter), cancel);
    let mut pipeline = Pipeline::new(host, scm, secrets, runner);
    let result = pipeline.execute(project.root(), project.config.clone());
    let records = pipeline.records().to_vec();
    Run { result, records }
}
