// tests/toggles.rs

mod common;

use std::sync::Arc;

use assetdag::Build;
use assetdag::dag::composites;
use assetdag::reload::{ReloadSession, SessionState};
use assetdag::task::registry;
use assetdag::types::{Feature, TaskOutcome};
use assetdag_test_utils::builders::ProjectBuilder;
use assetdag_test_utils::{RecordingTransport, init_tracing, with_timeout};

use common::{TestResult, recorded_build};

#[tokio::test]
async fn everything_disabled_leaves_the_tree_untouched() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .stock_sources()
        .file("dist/old.js", "stale")
        .disable_all()
        .build();
    let before = project.snapshot();
    let (build, transport) = recorded_build(&project);

    let report = with_timeout(build.build(composites::WATCH)).await?;

    assert!(report.is_success());
    assert!(report.tasks.iter().all(|t| t.outcome == TaskOutcome::Skipped));
    assert_eq!(project.snapshot(), before);
    assert!(transport.starts().is_empty());
    assert_eq!(build.session.state(), SessionState::Uninitialized);
    Ok(())
}

#[tokio::test]
async fn clean_removes_stale_outputs() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .stock_sources()
        .file("dist/js/removed-source.js", "stale")
        .build();
    let (build, _) = recorded_build(&project);

    with_timeout(build.build(composites::DEFAULT)).await?;

    assert!(!project.exists("dist/js/removed-source.js"));
    assert!(project.exists("dist/js/app.js"));
    Ok(())
}

#[tokio::test]
async fn clean_disabled_keeps_stale_outputs() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .stock_sources()
        .file("dist/js/removed-source.js", "stale")
        .disable(Feature::Clean)
        .build();
    let (build, _) = recorded_build(&project);

    let report = with_timeout(build.build(composites::DEFAULT)).await?;

    assert_eq!(report.outcome_of("clean"), Some(&TaskOutcome::Skipped));
    assert_eq!(project.read("dist/js/removed-source.js"), "stale");
    assert!(project.exists("dist/js/app.js"));
    Ok(())
}

#[tokio::test]
async fn one_disabled_class_is_skipped_while_others_build() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .stock_sources()
        .disable(Feature::Styles)
        .disable(Feature::Sprite)
        .build();
    let (build, _) = recorded_build(&project);

    let report = with_timeout(build.build(composites::DEFAULT)).await?;

    assert_eq!(report.outcome_of("styles:build"), Some(&TaskOutcome::Skipped));
    assert_eq!(report.outcome_of("svgs:sprite"), Some(&TaskOutcome::Skipped));
    assert!(!project.exists("dist/css"));
    assert!(!project.exists("dist/img/sprite.svg"));
    assert!(project.exists("dist/img/close.svg"));
    assert!(project.exists("dist/js/app.js"));
    Ok(())
}

#[tokio::test]
async fn reload_disabled_never_starts_the_session() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .stock_sources()
        .disable(Feature::Reload)
        .build();
    let (build, transport) = recorded_build(&project);

    with_timeout(build.build(composites::WATCH)).await?;

    assert!(transport.starts().is_empty());
    assert!(project.exists("dist/js/app.js"));
    Ok(())
}

#[tokio::test]
async fn command_line_disables_override_settings() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new().stock_sources().build();
    let transport = Arc::new(RecordingTransport::new());
    let session = Arc::new(ReloadSession::new(transport.clone()));
    let config = project
        .config()
        .with_disabled(&[Feature::Styles, Feature::Polyfills]);
    let build = Build::with_session(config, session);

    let report = with_timeout(build.build(composites::DEFAULT)).await?;

    assert_eq!(report.outcome_of(registry::STYLES_BUILD), Some(&TaskOutcome::Skipped));
    assert!(!project.exists("dist/css"));
    assert!(project.exists("dist/js/app.js"));
    assert!(!project.exists("dist/js/vendor.polyfills.js"));
    Ok(())
}
