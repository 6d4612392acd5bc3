use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn validate_accepts_reporting_manifest() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev (12 resources)"))
        .stdout(predicate::str::contains("prod (12 resources)"));

    assert!(ctx.az().calls().is_empty());
}

#[test]
fn validate_fails_on_unknown_reference() {
    let ctx = TestContext::new();
    ctx.write_manifest(
        r#"
base_name = "bo-gpsc-reports"
location = "canadacentral"

[[resources]]
role = "frontend"
kind = "web-app"
properties = { plan = "missing-plan" }
"#,
    );

    ctx.cli().arg("validate").assert().failure();
}

#[test]
fn missing_manifest_points_at_init() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("azprov init"));
}
