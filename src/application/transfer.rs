//! Transfer & Unpack
//!
//! Ships the packed archive through the remote staging directory into the
//! new deployment directory and unpacks it there.

use crate::domain::entities::DeployContext;
use crate::domain::ports::{remote_join, RemoteHost};
use crate::domain::value_objects::{StepError, StepResult};
use crate::infrastructure::RemoteFs;

pub const TRANSFERRING: &str = "· transferring...";
pub const UNPACKING: &str = "· unpacking...";

pub fn transfer_project(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let artifact = ctx.artifact()?;
    if !artifact.local_path.is_file() {
        return Err(StepError::fatal("artifact to be deployed is not a file"));
    }

    let fs = RemoteFs::new(host);
    fs.create_directory(&artifact.deploy_path)?;

    let staged = remote_join(&ctx.deploy.remote_tmp_dir, &artifact.file_name);
    let target = remote_join(&artifact.deploy_path, &artifact.file_name);

    host.put(&artifact.local_path, &staged)?;
    fs.move_file(&staged, &target)?;
    Ok(())
}

pub fn unpack_project(ctx: &DeployContext, host: &dyn RemoteHost) -> StepResult {
    let artifact = ctx.artifact()?;
    let archive = remote_join(&artifact.deploy_path, &artifact.file_name);

    let fs = RemoteFs::new(host);
    fs.unpack(&archive, &artifact.deploy_path)
        .map_err(|e| StepError::fatal(format!("failed to unpack project: {e}")))?;

    if let Err(e) = fs.remove(&archive) {
        tracing::debug!(archive = %archive, error = %e, "archive left behind");
        return Err(StepError::warning("failed to remove artifact after unpacking"));
    }
    Ok(())
}
