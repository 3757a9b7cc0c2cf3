//! Pre-Deploy Checks
//!
//! Read-only checks run before anything is packed or shipped. They only use
//! `query` on the host, so a dry run performs them for real.

use crate::domain::entities::DeployContext;
use crate::domain::ports::{remote_join, SourceControl};
use crate::domain::value_objects::{newer, StepError, StepResult, Version};
use crate::infrastructure::RemoteFs;

pub const GIT_REPO: &str = "· checking git repo...";
pub const DEPLOYMENT: &str = "· checking deployment...";
pub const VERSIONS: &str = "· checking versions...";
pub const DEPENDENCIES: &str = "· checking dependencies...";

/// The local tree must be a clean repository
pub fn check_git_repo(ctx: &DeployContext, scm: &dyn SourceControl) -> StepResult {
    match scm.is_dirty(&ctx.local_root)? {
        None => Err(StepError::fatal(format!(
            "{} is not a repository",
            ctx.local_root.display()
        ))),
        Some(true) => Err(StepError::fatal("repository is dirty")),
        Some(false) => Ok(()),
    }
}

/// Record the id of the live deployment, if there is one
pub fn check_deployment(ctx: &mut DeployContext, fs: &RemoteFs<'_>) -> StepResult {
    let marker = remote_join(ctx.app_path()?, ctx.deployed_id_file()?);

    let id = fs
        .read_file(&marker)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| StepError::warning("unable to find deployed id"))?;

    ctx.deployed_artifact_id = Some(id);
    Ok(())
}

/// The local version must be strictly newer than the deployed one
pub fn check_versions(ctx: &mut DeployContext, fs: &RemoteFs<'_>) -> StepResult {
    let remote_file = remote_join(ctx.production_path()?, &ctx.build.version_file);

    let contents = fs
        .read_file(&remote_file)?
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| StepError::warning("unable to retrieve deployed version"))?;

    let remote = Version::parse(&contents)?;
    ctx.remote_version = Some(remote.clone());

    if !newer(&ctx.local_version, &remote) {
        return Err(StepError::fatal(format!(
            "{} is older or equal to deployed {}",
            ctx.local_version, remote
        )));
    }
    Ok(())
}

/// Every listed package must already be installed on the host
pub fn check_dependencies(ctx: &DeployContext, fs: &RemoteFs<'_>) -> StepResult {
    for dep in &ctx.provision.dependencies {
        if !fs.package_installed(dep)? {
            return Err(StepError::fatal(format!("{} is not installed", dep)));
        }
    }
    Ok(())
}
