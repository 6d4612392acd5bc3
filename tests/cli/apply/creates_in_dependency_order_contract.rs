use crate::harness::{DEV_NAMES, TestContext};
use predicates::prelude::*;

fn position(created: &[String], name: &str) -> usize {
    created
        .iter()
        .position(|n| n == name)
        .unwrap_or_else(|| panic!("{} was not created; created: {:?}", name, created))
}

#[test]
fn apply_creates_every_resource_dependencies_first() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli().args(["apply", "-e", "dev", "--yes"]).assert().success();

    let created = ctx.az().names_for("create");
    assert_eq!(created.len(), DEV_NAMES.len(), "created: {:?}", created);
    for name in DEV_NAMES {
        assert!(ctx.az().has_resource(name), "{} should exist", name);
    }

    let pos = |name: &str| position(&created, name);
    assert!(pos("bo-gpsc-reports-dev-vnet") < pos("bo-gpsc-reports-dev-app-subnet"));
    assert!(pos("bo-gpsc-reports-dev-nsg") < pos("bo-gpsc-reports-dev-app-subnet"));
    assert!(pos("bo-gpsc-reports-dev-plan") < pos("bo-gpsc-reports-dev-frontend"));
    assert!(pos("bo-gpsc-reports-dev-plan") < pos("bo-gpsc-reports-dev-backend"));
    assert!(pos("bo-gpsc-reports-dev-app-subnet") < pos("bo-gpsc-reports-dev-backend"));
    assert!(pos("bo-gpsc-reports-dev-sqlserver") < pos("bo-gpsc-reports-dev-database"));
    assert!(pos("bo-gpsc-reports-dev-data-subnet") < pos("bo-gpsc-reports-dev-sql-endpoint"));
}

#[test]
fn apply_is_idempotent() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(DEV_NAMES);

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Everything is already present"));

    assert!(ctx.az().mutations().is_empty(), "mutations: {:?}", ctx.az().mutations());
}

#[test]
fn apply_never_logs_the_sql_admin_password() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dev-Only-Passw0rd").not())
        .stdout(predicate::str::contains("Dev-Only-Passw0rd").not());
}

#[test]
fn dry_run_changes_nothing() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(&["bo-gpsc-reports-dev-vnet"]);

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    assert!(ctx.az().mutations().is_empty(), "mutations: {:?}", ctx.az().mutations());
    assert!(!ctx.az().has_resource("bo-gpsc-reports-dev-plan"));
}

#[test]
fn target_limits_apply_to_a_group() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(&[
        "bo-gpsc-reports-dev-vnet",
        "bo-gpsc-reports-dev-nsg",
        "bo-gpsc-reports-dev-app-subnet",
    ]);

    ctx.cli().args(["apply", "-e", "dev", "--yes", "-t", "web"]).assert().success();

    let mut created = ctx.az().names_for("create");
    created.sort();
    assert_eq!(
        created,
        vec![
            "bo-gpsc-reports-dev-backend",
            "bo-gpsc-reports-dev-frontend",
            "bo-gpsc-reports-dev-plan",
        ]
    );
}
