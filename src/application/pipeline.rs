//! Deployment pipeline
//!
//! Drives one run against a single host.
//!
//! ## Flow
//!
//! 1. Gather build information into a [`DeployContext`]
//! 2. PRE DEPLOY: repository, deployed id, version and dependency checks
//! 3. DEPLOY: pack, transfer, unpack, configure cache, proxy and app
//! 4. POST DEPLOY: restart services
//!
//! Every step runs under the [`StepRunner`]; the first fatal step ends the
//! run. Nothing is rolled back.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::DeployConfig;
use crate::domain::entities::DeployContext;
use crate::domain::ports::{RemoteHost, SecretStore, SourceControl};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::RemoteFs;

use super::checks;
use super::context_builder;
use super::guard::{StepRecord, StepRunner};
use super::package;
use super::restart;
use super::services::{self, SERVICE_ORDER};
use super::transfer;

pub const GATHERING: &str = "· gathering build information...";

/// Outcome of a completed run
#[derive(Debug)]
pub struct DeployReport {
    pub context: DeployContext,
    pub elapsed: Duration,
}

pub struct Pipeline<'a> {
    host: &'a dyn RemoteHost,
    scm: &'a dyn SourceControl,
    secrets: &'a dyn SecretStore,
    runner: StepRunner,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        host: &'a dyn RemoteHost,
        scm: &'a dyn SourceControl,
        secrets: &'a dyn SecretStore,
        runner: StepRunner,
    ) -> Self {
        Self {
            host,
            scm,
            secrets,
            runner,
        }
    }

    /// Run every stage in order
    pub fn execute(&mut self, root: PathBuf, config: DeployConfig) -> DeployResult<DeployReport> {
        let started = Instant::now();
        tracing::info!(host = self.host.name(), "starting deployment");

        let mut context = self.build_context(root, config)?;
        self.pre_deploy(&mut context)?;
        self.deploy(&mut context)?;
        self.post_deploy(&mut context)?;

        Ok(DeployReport {
            context,
            elapsed: started.elapsed(),
        })
    }

    pub fn build_context(&mut self, root: PathBuf, config: DeployConfig) -> DeployResult<DeployContext> {
        let scm = self.scm;
        let mut context = None;
        self.runner.step(GATHERING, || {
            context = Some(context_builder::build_context(root, config, scm, Utc::now())?);
            Ok(())
        })?;

        context.ok_or_else(|| DeployError::Step {
            title: GATHERING.to_string(),
            message: "no build information".to_string(),
        })
    }

    pub fn pre_deploy(&mut self, ctx: &mut DeployContext) -> DeployResult<()> {
        self.runner.stage("PRE DEPLOY");
        ctx.deploy_start_time = Some(Utc::now());

        let fs = RemoteFs::new(self.host);
        let scm = self.scm;

        self.runner.step(checks::GIT_REPO, || checks::check_git_repo(ctx, scm))?;
        self.runner.step(checks::DEPLOYMENT, || checks::check_deployment(ctx, &fs))?;
        self.runner.step(checks::VERSIONS, || checks::check_versions(ctx, &fs))?;
        self.runner.step(checks::DEPENDENCIES, || checks::check_dependencies(ctx, &fs))?;
        Ok(())
    }

    pub fn deploy(&mut self, ctx: &mut DeployContext) -> DeployResult<()> {
        self.runner.stage("DEPLOY");
        let host = self.host;

        self.runner.step(package::PACKING, || package::pack_project(ctx))?;
        self.runner.step(transfer::TRANSFERRING, || transfer::transfer_project(ctx, host))?;
        self.runner.step(transfer::UNPACKING, || transfer::unpack_project(ctx, host))?;

        for kind in SERVICE_ORDER {
            services::configure_service(kind, &mut self.runner, ctx, host, self.secrets)?;
        }
        Ok(())
    }

    pub fn post_deploy(&mut self, ctx: &mut DeployContext) -> DeployResult<()> {
        self.runner.stage("POST DEPLOY");
        restart::restart_services(&mut self.runner, ctx, self.host)?;
        ctx.deploy_end_time = Some(Utc::now());
        Ok(())
    }

    /// Steps executed so far, including the one that failed
    pub fn records(&self) -> &[StepRecord] {
        self.runner.records()
    }
}

/// Format a duration as `HH:MM:SS`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
