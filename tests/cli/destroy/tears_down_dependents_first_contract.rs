use crate::harness::{DEV_GROUP, DEV_NAMES, TestContext};
use predicates::prelude::*;

fn position(deleted: &[String], name: &str) -> usize {
    deleted
        .iter()
        .position(|n| n == name)
        .unwrap_or_else(|| panic!("{} was not deleted; deleted: {:?}", name, deleted))
}

#[test]
fn destroy_deletes_dependents_before_dependencies() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(DEV_NAMES);

    ctx.cli().args(["destroy", "-e", "dev", "--yes"]).assert().success();

    let deleted = ctx.az().names_for("delete");
    assert_eq!(deleted.len(), DEV_NAMES.len(), "deleted: {:?}", deleted);
    for name in DEV_NAMES {
        assert!(!ctx.az().has_resource(name), "{} should be gone", name);
    }

    let pos = |name: &str| position(&deleted, name);
    assert!(pos("bo-gpsc-reports-dev-frontend") < pos("bo-gpsc-reports-dev-plan"));
    assert!(pos("bo-gpsc-reports-dev-backend") < pos("bo-gpsc-reports-dev-plan"));
    assert!(pos("bo-gpsc-reports-dev-backend") < pos("bo-gpsc-reports-dev-app-subnet"));
    assert!(pos("bo-gpsc-reports-dev-database") < pos("bo-gpsc-reports-dev-sqlserver"));
    assert!(pos("bo-gpsc-reports-dev-sql-endpoint") < pos("bo-gpsc-reports-dev-sqlserver"));
    assert!(pos("bo-gpsc-reports-dev-app-subnet") < pos("bo-gpsc-reports-dev-vnet"));
    assert!(pos("bo-gpsc-reports-dev-app-subnet") < pos("bo-gpsc-reports-dev-nsg"));

    assert!(ctx.az().has_group(DEV_GROUP), "the resource group is kept");
}

#[test]
fn destroy_refuses_plan_while_web_apps_are_live() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(&["bo-gpsc-reports-dev-plan", "bo-gpsc-reports-dev-frontend"]);

    ctx.cli()
        .args(["destroy", "-e", "dev", "--yes", "-t", "plan"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Refusing to delete 'plan'"))
        .stderr(predicate::str::contains("Aborted after critical step 'plan' failed"));

    assert!(ctx.az().has_resource("bo-gpsc-reports-dev-plan"));
    assert!(ctx.az().names_for("delete").is_empty());
}

#[test]
fn destroy_of_missing_group_is_a_no_op() {
    let ctx = TestContext::new();
    ctx.write_manifest(crate::harness::REPORTING_MANIFEST);

    ctx.cli()
        .args(["destroy", "-e", "dev", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist; nothing to delete"));

    assert!(ctx.az().mutations().is_empty());
}

#[test]
fn destroy_dry_run_keeps_everything() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.seed(DEV_NAMES);

    ctx.cli()
        .args(["destroy", "-e", "dev", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(ctx.az().mutations().is_empty());
    for name in DEV_NAMES {
        assert!(ctx.az().has_resource(name));
    }
}

#[test]
fn destroy_does_not_need_secrets() {
    let ctx = TestContext::new();
    ctx.write_manifest(
        &crate::harness::REPORTING_MANIFEST
            .replace("sql_admin_password = \"Dev-Only-Passw0rd\"\n", ""),
    );
    ctx.az().add_group(DEV_GROUP);
    ctx.seed(&["bo-gpsc-reports-dev-sqlserver"]);

    ctx.cli().args(["destroy", "-e", "dev", "--yes", "-t", "data"]).assert().success();

    assert!(!ctx.az().has_resource("bo-gpsc-reports-dev-sqlserver"));
}
