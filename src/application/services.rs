//! Service Configurators
//!
//! Cache, proxy and application share one flow: locate the section, check
//! the paths, resolve secrets and render the template, then write the
//! result atomically into the new deployment. The application additionally
//! gets its virtual environment, ownership, the production link and the
//! deployed-id marker.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::config::ServiceSection;
use crate::domain::entities::DeployContext;
use crate::domain::ports::{remote_join, RemoteHost, SecretError, SecretStore};
use crate::domain::value_objects::{StepError, StepResult};
use crate::error::{ConfigureError, DeployResult};
use crate::infrastructure::template::{self, Document};
use crate::infrastructure::RemoteFs;

use super::guard::StepRunner;

pub const BUILDING: &str = "· building config files...";
pub const WRITING: &str = "· writing config files...";
pub const CREATING_VENV: &str = "· creating virtual environment...";
pub const UPDATING_VENV: &str = "· updating virtual environment...";
pub const CREATING_ACCOUNTS: &str = "· creating user and group...";
pub const CHANGING_PERMISSIONS: &str = "· changing permissions...";
pub const LINKING: &str = "· linking production to new deployment...";
pub const WRITING_ID: &str = "· writing deployed id...";

/// A managed service with its own configuration section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Cache,
    Proxy,
    App,
}

/// Order in which services are configured and restarted
pub const SERVICE_ORDER: [ServiceKind; 3] = [ServiceKind::Cache, ServiceKind::Proxy, ServiceKind::App];

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Proxy => "proxy",
            Self::App => "app",
        }
    }

    /// The app is the deployed product; cache and proxy may be absent
    pub fn is_required(self) -> bool {
        self == Self::App
    }

    pub fn section(self, ctx: &DeployContext) -> Option<&ServiceSection> {
        match self {
            Self::Cache => ctx.services.cache.as_ref(),
            Self::Proxy => ctx.services.proxy.as_ref(),
            Self::App => ctx.services.app.as_ref(),
        }
    }
}

/// Template variables of one service with its secrets resolved
///
/// The `SECRETS` reference map never appears in `variables`; each entry is
/// replaced by `NAME = <secret>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSection {
    pub variables: Map<String, Value>,
}

impl ResolvedSection {
    /// Overlay the section and its secrets onto the context variables
    pub fn resolve(
        ctx: &DeployContext,
        section: &ServiceSection,
        store: &dyn SecretStore,
    ) -> Result<Self, SecretError> {
        let mut variables = ctx.variables();
        for (key, value) in &section.vars {
            variables.insert(key.clone(), value.clone());
        }
        if let Some(file) = &section.config_file {
            variables.insert("CONFIG_FILE".to_string(), Value::from(file.clone()));
        }
        if let Some(service) = &section.service {
            variables.insert("SERVICE".to_string(), Value::from(service.clone()));
        }
        for (name, path) in &section.secrets {
            variables.insert(name.clone(), Value::from(store.get(path)?));
        }
        Ok(Self { variables })
    }
}

/// Where a service's template comes from and where it lands
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigPaths {
    template: PathBuf,
    remote: String,
}

fn config_paths(ctx: &DeployContext, kind: ServiceKind, section: &ServiceSection) -> StepResult<ConfigPaths> {
    let local_dir = ctx
        .deploy
        .local_config_path
        .as_ref()
        .map(|p| ctx.local_root.join(p))
        .ok_or_else(|| StepError::fatal("dont know where the local config is located"))?;
    if !local_dir.is_dir() {
        return Err(ConfigureError::LocalConfigMissing(local_dir).into());
    }

    let deploy_path = ctx.deploy_path()?;
    let config_file = section
        .config_file
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ConfigureError::ConfigFileUnset(kind.name().to_string()))?;

    Ok(ConfigPaths {
        template: local_dir.join(config_file),
        remote: remote_join(deploy_path, config_file),
    })
}

fn build_document(
    ctx: &DeployContext,
    section: &ServiceSection,
    template_path: &std::path::Path,
    store: &dyn SecretStore,
) -> Result<Document, ConfigureError> {
    let resolved = ResolvedSection::resolve(ctx, section, store)?;
    Ok(template::render(template_path, &resolved.variables)?)
}

/// Configure one service inside the new deployment
pub fn configure_service(
    kind: ServiceKind,
    runner: &mut StepRunner,
    ctx: &DeployContext,
    host: &dyn RemoteHost,
    store: &dyn SecretStore,
) -> DeployResult<()> {
    let name = kind.name();
    runner.note(&format!("setting up {name}"));

    let mut section = None;
    runner.step(&format!("· locating {name} config..."), || {
        section = kind.section(ctx);
        match section {
            Some(_) => Ok(()),
            None if kind.is_required() => {
                Err(StepError::fatal(format!("dont know where the {name} config is located")))
            }
            None => Err(StepError::warning(format!("unable to locate {name} config"))),
        }
    })?;
    let Some(section) = section else {
        return Ok(());
    };

    let mut paths = None;
    runner.step(&format!("· checking {name} paths..."), || {
        paths = Some(config_paths(ctx, kind, section)?);
        Ok(())
    })?;
    let Some(paths) = paths else {
        return Ok(());
    };

    let mut document = None;
    runner.step(BUILDING, || {
        document = Some(build_document(ctx, section, &paths.template, store)?);
        Ok(())
    })?;

    runner.step(WRITING, || {
        let doc = document
            .as_ref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| StepError::warning(format!("no {name} config to write")))?;
        RemoteFs::new(host).write_atomic(&paths.remote, &doc.to_pretty_json())?;
        Ok(())
    })?;

    if kind == ServiceKind::App {
        finish_app(runner, ctx, host)?;
    }
    Ok(())
}

fn finish_app(runner: &mut StepRunner, ctx: &DeployContext, host: &dyn RemoteHost) -> DeployResult<()> {
    runner.step(CREATING_VENV, || create_virtualenv(ctx, host))?;
    runner.step(UPDATING_VENV, || update_virtualenv(ctx, host))?;
    runner.step(CREATING_ACCOUNTS, || create_accounts(ctx, host))?;
    runner.step(CHANGING_PERMISSIONS, || change_permissions(ctx, host))?;
    runner.step(LINKING, || link_production(ctx, host))?;
    runner.step(WRITING_ID, || write_deployed_id(ctx, host))?;
    Ok(())
}

fn venv_path(ctx: &DeployContext) -> StepResult<String> {
    Ok(remote_join(ctx.deploy_path()?, "venv"))
}

pub fn create_virtualenv(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let venv = venv_path(ctx)?;
    RemoteFs::new(host)
        .create_venv(&ctx.provision.python, &venv)
        .map_err(|e| StepError::fatal(format!("failed creating virtual environment: {e}")))
}

pub fn update_virtualenv(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let venv = venv_path(ctx)?;
    let requirements = remote_join(ctx.deploy_path()?, &ctx.provision.requirements);
    RemoteFs::new(host)
        .pip_install(&venv, &requirements)
        .map_err(|e| StepError::fatal(format!("failed to update the virtual environment: {e}")))
}

pub fn create_accounts(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let fs = RemoteFs::new(host);
    let user = ctx.provision.user.as_deref();

    if let Some(user) = user {
        if !fs.user_exists(user)? {
            fs.create_user(user)
                .map_err(|e| StepError::fatal(format!("failed to create user '{user}': {e}")))?;
        }
    }

    if let Some(group) = ctx.provision.group.as_deref() {
        if !fs.group_exists(group)? {
            fs.create_group(group)
                .map_err(|e| StepError::fatal(format!("failed to create group '{group}': {e}")))?;
        }
        if let Some(user) = user {
            fs.add_user_to_group(user, group).map_err(|e| {
                StepError::fatal(format!("failed to add user '{user}' to group '{group}': {e}"))
            })?;
        }
    }
    Ok(())
}

pub fn change_permissions(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let deploy_path = ctx.deploy_path()?;
    let fs = RemoteFs::new(host);

    if let Some(user) = ctx.provision.user.as_deref() {
        fs.change_owner(deploy_path, user)
            .map_err(|e| StepError::fatal(format!("failed to change owner of deployment: {e}")))?;
    }
    if let Some(group) = ctx.provision.group.as_deref() {
        fs.change_group(deploy_path, group)
            .map_err(|e| StepError::fatal(format!("failed to change group of deployment: {e}")))?;
    }
    Ok(())
}

pub fn link_production(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let deploy_path = ctx.deploy_path()?;
    let production = ctx.production_path()?;
    RemoteFs::new(host)
        .symlink(deploy_path, production)
        .map_err(|e| {
            StepError::fatal(format!(
                "failed to link {production} to newly deployed app: {e}"
            ))
        })
}

/// Record the new artifact id as the live deployment
pub fn write_deployed_id(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let marker = remote_join(ctx.app_path()?, ctx.deployed_id_file()?);
    let id = ctx.artifact()?.id.to_string();
    RemoteFs::new(host)
        .write_atomic(&marker, &id)
        .map_err(|e| StepError::fatal(format!("unable to write new deployment id to {marker}: {e}")))
}
