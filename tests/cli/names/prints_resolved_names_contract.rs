use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn names_prints_dev_names_offline() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["names", "-e", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bo-gpsc-reports-dev-rg"))
        .stdout(predicate::str::contains("bo-gpsc-reports-dev-backend"))
        .stdout(predicate::str::contains("bogpscreportsdevstorage"))
        .stdout(predicate::str::contains("bo-gpsc-reports-dev-keyv"));

    assert!(ctx.az().calls().is_empty(), "names never calls az");
}

#[test]
fn names_json_covers_every_environment() {
    let ctx = TestContext::with_reporting_manifest();

    let output = ctx.cli().args(["names", "--all-environments", "--json"]).output().unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 36);

    let prod_storage = entries
        .iter()
        .find(|e| e["environment"] == "prod" && e["role"] == "storage")
        .expect("prod storage entry");
    assert_eq!(prod_storage["name"], "bogpscreportsprodstorage");
    assert_eq!(prod_storage["resource_group"], "bo-gpsc-reports-prod-rg");
}

#[test]
fn names_rejects_unknown_environment() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["names", "-e", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid environment 'staging'"))
        .stderr(predicate::str::contains("No changes were made."));
}

#[test]
fn names_honours_resource_group_override() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["names", "-e", "uat", "-g", "shared-reports-rg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shared-reports-rg"));
}
