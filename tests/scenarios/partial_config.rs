//! Scenario: projects that configure only some services.

use hoist::application::services::WRITING;
use hoist::domain::value_objects::OutcomeKind;
use hoist::DeployError;

use crate::common::*;

fn outcome_of(run: &Run, title: &str) -> Option<OutcomeKind> {
    run.records.iter().find(|r| r.title == title).map(|r| r.outcome)
}

#[test]
fn missing_cache_section_is_skipped() {
    let mut project = Project::new();
    project.config.cache = None;
    let host = FakeHost::provisioned();

    let run = deploy(&project, &host, &FixedScm::clean(), &MapSecrets::fixture());
    let deploy_path = run
        .report()
        .context
        .artifact
        .clone()
        .expect("artifact")
        .deploy_path;

    assert_eq!(
        outcome_of(&run, "· locating cache config..."),
        Some(OutcomeKind::Warning)
    );
    assert!(!run.titles().contains(&"· checking cache paths..."));
    assert_eq!(host.file(&format!("{deploy_path}/.redis")), None);
    assert!(host.file(&format!("{deploy_path}/.nginx")).is_some());
    assert!(host.file(&format!("{deploy_path}/.pubpublica")).is_some());

    assert_eq!(host.position("systemctl restart 'redis-server'"), None);
    assert!(host.position("systemctl restart 'nginx'").is_some());
    assert!(host.position("systemctl restart 'pubpublica'").is_some());
}

#[test]
fn missing_app_section_stops_before_promotion() {
    let mut project = Project::new();
    project.config.app = None;
    let host = FakeHost::provisioned();

    let run = deploy(&project, &host, &FixedScm::clean(), &MapSecrets::fixture());

    match run.result {
        Err(DeployError::Step { ref title, ref message }) => {
            assert_eq!(title, "· locating app config...");
            assert_eq!(message, "dont know where the app config is located");
        }
        ref other => panic!("expected app config failure, got {other:?}"),
    }
    assert_eq!(
        outcome_of(&run, "· locating app config..."),
        Some(OutcomeKind::Fatal)
    );
    assert!(!run.titles().contains(&"· creating virtual environment..."));
    assert_eq!(host.link(PRODUCTION_PATH), None);
    assert_eq!(host.file(MARKER), None);
    assert_eq!(host.position("systemctl"), None);
}

#[test]
fn missing_template_is_not_written() {
    let project = Project::new();
    project.remove("config/.nginx");
    let host = FakeHost::provisioned();

    let run = deploy(&project, &host, &FixedScm::clean(), &MapSecrets::fixture());
    let deploy_path = run
        .report()
        .context
        .artifact
        .clone()
        .expect("artifact")
        .deploy_path;

    let writes: Vec<_> = run
        .records
        .iter()
        .filter(|r| r.title == WRITING)
        .map(|r| r.outcome)
        .collect();
    assert_eq!(
        writes,
        vec![OutcomeKind::Success, OutcomeKind::Warning, OutcomeKind::Success]
    );
    assert_eq!(host.file(&format!("{deploy_path}/.nginx")), None);
}

#[test]
fn service_without_config_file_is_fatal() {
    let mut project = Project::new();
    if let Some(proxy) = project.config.proxy.as_mut() {
        proxy.config_file = None;
    }
    let host = FakeHost::provisioned();

    let run = deploy(&project, &host, &FixedScm::clean(), &MapSecrets::fixture());

    match run.result {
        Err(DeployError::Step { ref title, .. }) => assert_eq!(title, "· checking proxy paths..."),
        ref other => panic!("expected proxy path failure, got {other:?}"),
    }
    assert!(!run.titles().contains(&"· locating app config..."));
}
