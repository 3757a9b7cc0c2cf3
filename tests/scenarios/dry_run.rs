//! Scenario: dry runs against a live host.

use std::sync::Arc;

use hoist::domain::ports::NoopReporter;
use hoist::domain::value_objects::{OutcomeKind, Version};
use hoist::infrastructure::{DryRunHost, RecordedCall};

use crate::common::*;

const PREVIOUS_ID: &str = "pubpublica--2024-01-01--2.2.9--0000000";

fn live_host() -> FakeHost {
    FakeHost::provisioned().with_deployed(PREVIOUS_ID, "2.2.9")
}

#[test]
fn dry_run_leaves_host_untouched() {
    let project = Project::new();
    let host = live_host();
    let dry = DryRunHost::new(&host, Arc::new(NoopReporter));

    let run = deploy(&project, &dry, &FixedScm::clean(), &MapSecrets::fixture());
    assert!(run.result.is_ok(), "{:?}", run.result.as_ref().err());

    assert!(host.mutating_calls().is_empty());
    assert_eq!(host.file(MARKER).as_deref(), Some(PREVIOUS_ID));
    assert_eq!(host.link(PRODUCTION_PATH), None);
}

#[test]
fn dry_run_records_every_mutation() {
    let project = Project::new();
    let host = live_host();
    let dry = DryRunHost::new(&host, Arc::new(NoopReporter));

    let run = deploy(&project, &dry, &FixedScm::clean(), &MapSecrets::fixture());
    let artifact = run.report().context.artifact.clone().expect("artifact");
    let calls = dry.calls();

    assert!(calls.contains(&RecordedCall::Put {
        local: artifact.local_path.clone(),
        remote: format!("/tmp/{}", artifact.file_name),
    }));
    assert!(calls.contains(&RecordedCall::Sudo(format!(
        "ln -sfn '{}' '{PRODUCTION_PATH}'",
        artifact.deploy_path
    ))));
    assert!(calls
        .iter()
        .any(|c| *c == RecordedCall::Sudo("systemctl restart 'pubpublica'".to_string())));
}

#[test]
fn dry_run_walks_the_same_steps() {
    let project = Project::new();

    let host = live_host();
    let real = deploy(&project, &host, &FixedScm::clean(), &MapSecrets::fixture());

    let host = live_host();
    let dry = DryRunHost::new(&host, Arc::new(NoopReporter));
    let rehearsal = deploy(&project, &dry, &FixedScm::clean(), &MapSecrets::fixture());

    assert_eq!(rehearsal.titles(), real.titles());
    assert!(rehearsal
        .records
        .iter()
        .all(|r| r.outcome == OutcomeKind::Success));
}

#[test]
fn dry_run_fills_the_context() {
    let project = Project::new();
    let host = live_host();
    let dry = DryRunHost::new(&host, Arc::new(NoopReporter));

    let run = deploy(&project, &dry, &FixedScm::clean(), &MapSecrets::fixture());
    let ctx = &run.report().context;

    assert_eq!(ctx.deployed_artifact_id.as_deref(), Some(PREVIOUS_ID));
    assert_eq!(ctx.remote_version, Some(Version::new(2, 2, 9)));
    assert!(ctx.deploy_start_time.is_some());
    assert!(ctx.deploy_end_time.is_some());

    // The archive is still built locally
    let artifact = ctx.artifact.as_ref().expect("artifact");
    assert!(artifact.local_path.is_file());
}
