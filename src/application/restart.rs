//! Service Restarts
//!
//! Restarts the systemd unit of every configured service once the new
//! deployment is live. A unit that fails to restart does not stop the run.

use crate::domain::entities::DeployContext;
use crate::domain::ports::RemoteHost;
use crate::domain::value_objects::{StepError, StepResult};
use crate::error::DeployResult;
use crate::infrastructure::RemoteFs;

use super::guard::StepRunner;
use super::services::SERVICE_ORDER;

pub fn restart_service(host: &dyn RemoteHost, service: &str) -> StepResult {
    RemoteFs::new(host).restart_service(service).map_err(|e| {
        tracing::debug!(service, error = %e, "restart failed");
        StepError::warning(format!("failed to restart the {service} service"))
    })
}

/// Restart cache, proxy and app units, skipping sections without `SERVICE`
pub fn restart_services(
    runner: &mut StepRunner,
    ctx: &DeployContext,
    host: &dyn RemoteHost,
) -> DeployResult<()> {
    for kind in SERVICE_ORDER {
        let Some(service) = kind.section(ctx).and_then(|s| s.service.as_deref()) else {
            continue;
        };
        runner.step(&format!("· restarting {service} service..."), || {
            restart_service(host, service)
        })?;
    }
    Ok(())
}
