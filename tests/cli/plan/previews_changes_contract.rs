use crate::harness::{DEV_NAMES, TestContext};
use predicates::prelude::*;

#[test]
fn plan_lists_missing_resources_without_changing_anything() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(&["bo-gpsc-reports-dev-vnet"]);

    ctx.cli()
        .args(["plan", "-e", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Apply plan for dev"))
        .stdout(predicate::str::contains("11 to create, 1 unchanged"));

    assert!(ctx.az().mutations().is_empty());
}

#[test]
fn plan_json_describes_each_step() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(DEV_NAMES);

    let output = ctx.cli().args(["plan", "-e", "dev", "--destroy", "--json"]).output().unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["action"], "destroy");
    assert_eq!(plan["environment"], "dev");
    assert_eq!(plan["resource_group"], "bo-gpsc-reports-dev-rg");

    let steps = plan["steps"].as_array().unwrap();
    assert_eq!(steps.len(), DEV_NAMES.len());
    assert!(steps.iter().all(|s| s["disposition"] == "execute" && s["operation"] == "delete"));

    let frontend = steps.iter().position(|s| s["descriptor"]["role"] == "frontend").unwrap();
    let plan_step = steps.iter().position(|s| s["descriptor"]["role"] == "plan").unwrap();
    assert!(frontend < plan_step);
}

#[test]
fn plan_rejects_unknown_target() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["plan", "-e", "dev", "-t", "cache"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown target 'cache'"));
}

#[test]
fn plan_for_missing_group_points_at_create_group() {
    let ctx = TestContext::new();
    ctx.write_manifest(crate::harness::REPORTING_MANIFEST);

    ctx.cli()
        .args(["plan", "-e", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resource group bo-gpsc-reports-dev-rg (needs --create-group)"));
    assert!(!ctx.az().has_group("bo-gpsc-reports-dev-rg"));
}
