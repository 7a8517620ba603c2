// tests/build_outputs.rs

mod common;

use assetdag::dag::composites;
use assetdag::errors::AssetdagError;
use assetdag::task::registry;
use assetdag::types::{Feature, TaskOutcome};
use assetdag_test_utils::builders::ProjectBuilder;
use assetdag_test_utils::{init_tracing, with_timeout};

use common::{TestResult, recorded_build};

const BANNER_PREFIX: &str = "/*! demo-site v2.1.0 | (c) ";

#[tokio::test]
async fn default_build_writes_every_asset_class() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .stock_sources()
        .with_png("src/img/logo.png", 16, 16)
        .build();
    let (build, _) = recorded_build(&project);

    let report = with_timeout(build.build(composites::DEFAULT)).await?;
    assert!(report.is_success(), "failed: {:?}", report.failed_tasks());

    for rel in [
        "dist/js/app.js",
        "dist/js/app.min.js",
        "dist/js/jquery.js",
        "dist/css/main.css",
        "dist/css/main.min.css",
        "dist/img/close.svg",
        "dist/img/sprite.svg",
        "dist/img/logo.png",
        "dist/robots.txt",
        "dist/index.html",
    ] {
        assert!(project.exists(rel), "{rel} missing");
    }

    // Partials are never compiled on their own.
    assert!(!project.exists("dist/css/_vars.css"));
    Ok(())
}

#[tokio::test]
async fn scripts_and_styles_carry_the_banner() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new().stock_sources().build();
    let (build, _) = recorded_build(&project);

    with_timeout(build.build(composites::DEFAULT)).await?;

    for rel in [
        "dist/js/app.js",
        "dist/js/app.min.js",
        "dist/css/main.css",
        "dist/css/main.min.css",
    ] {
        let contents = project.read(rel);
        assert!(contents.starts_with(BANNER_PREFIX), "{rel}: {contents}");
    }
    let app = project.read("dist/js/app.js");
    assert_eq!(app.matches("/*! demo-site").count(), 1, "banner stamped twice");

    // Colors come out of the CSS post-processor in their shortest form.
    let css = project.read("dist/css/main.css");
    assert!(css.contains("#369"), "{css}");
    let min_css = project.read("dist/css/main.min.css");
    assert!(min_css.len() < css.len());
    assert_eq!(min_css.matches("/*! demo-site").count(), 1, "banner stamped twice");
    let app_min = project.read("dist/js/app.min.js");
    assert!(app_min.contains("function greet("), "{app_min}");

    // Copied files are untouched.
    assert_eq!(project.read("dist/robots.txt"), "User-agent: *\n");
    Ok(())
}

#[tokio::test]
async fn polyfills_get_their_own_bundle() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new().stock_sources().build();
    let (build, _) = recorded_build(&project);

    with_timeout(build.build(composites::SCRIPTS)).await?;

    let plain = project.read("dist/js/vendor.js");
    let full = project.read("dist/js/vendor.polyfills.js");
    assert!(plain.contains("var a = 1"));
    assert!(!plain.contains("window.fetch"));
    assert!(full.contains("var a = 1"));
    assert!(full.contains("window.fetch"));

    for rel in [
        "dist/js/vendor.js",
        "dist/js/vendor.min.js",
        "dist/js/vendor.polyfills.js",
        "dist/js/vendor.polyfills.min.js",
    ] {
        let contents = project.read(rel);
        assert!(contents.starts_with(BANNER_PREFIX), "{rel}: {contents}");
    }
    assert!(!project.read("dist/js/vendor.min.js").contains("fetch"));
    assert!(project.read("dist/js/vendor.polyfills.min.js").contains("window.fetch"));
    Ok(())
}

#[tokio::test]
async fn disabling_polyfills_bundles_everything_together() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .stock_sources()
        .disable(Feature::Polyfills)
        .build();
    let (build, _) = recorded_build(&project);

    with_timeout(build.build(composites::SCRIPTS)).await?;

    let bundle = project.read("dist/js/vendor.js");
    assert!(bundle.contains("var a = 1"));
    assert!(bundle.contains("window.fetch"));
    assert!(!project.exists("dist/js/vendor.polyfills.js"));
    Ok(())
}

#[tokio::test]
async fn sprite_holds_one_symbol_per_svg() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .file("src/svg/open.svg", "<svg viewBox=\"0 0 4 4\"><rect/></svg>")
        .file("src/svg/close.svg", "<svg viewBox=\"0 0 8 8\"><path/></svg>")
        .build();
    let (build, _) = recorded_build(&project);

    with_timeout(build.build(composites::ASSETS)).await?;

    let sprite = project.read("dist/img/sprite.svg");
    assert!(sprite.contains(r#"<symbol id="close" viewBox="0 0 8 8">"#));
    assert!(sprite.contains(r#"<symbol id="open" viewBox="0 0 4 4">"#));
    Ok(())
}

#[tokio::test]
async fn narrow_composite_only_touches_its_outputs() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new().stock_sources().build();
    let (build, _) = recorded_build(&project);

    let report = with_timeout(build.build(composites::STYLES)).await?;

    assert_eq!(report.tasks.len(), 1);
    assert_eq!(report.outcome_of(registry::STYLES_BUILD), Some(&TaskOutcome::Success));
    assert!(project.exists("dist/css/main.css"));
    assert!(!project.exists("dist/js"));
    Ok(())
}

#[tokio::test]
async fn broken_script_is_reported_by_lint_without_failing() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new()
        .file("src/js/ok.js", "var ok = true;\n")
        .file("src/js/broken.js", "function ( {\n")
        .build();
    let (build, _) = recorded_build(&project);

    let report = with_timeout(build.run_composite(composites::SCRIPTS)).await?;

    assert_eq!(report.outcome_of(registry::SCRIPTS_LINT), Some(&TaskOutcome::Success));
    assert!(matches!(
        report.outcome_of(registry::SCRIPTS_BUILD),
        Some(TaskOutcome::Failed(_))
    ));
    Ok(())
}

#[tokio::test]
async fn single_task_runs_outside_any_composite() -> TestResult {
    init_tracing();
    let project = ProjectBuilder::new().stock_sources().build();
    let (build, _) = recorded_build(&project);

    let report = with_timeout(build.run_task(registry::STYLES_BUILD)).await?;

    assert_eq!(report.tasks.len(), 1);
    assert_eq!(report.outcome_of(registry::STYLES_BUILD), Some(&TaskOutcome::Success));
    assert!(project.exists("dist/css/main.min.css"));
    assert!(!project.exists("dist/js"));

    let err = with_timeout(build.run_task("deploy")).await.unwrap_err();
    assert!(matches!(err, AssetdagError::UnknownTask { .. }), "{err}");
    assert!(err.to_string().contains(registry::STYLES_BUILD), "{err}");
    Ok(())
}
