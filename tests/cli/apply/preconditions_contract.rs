use crate::harness::{DEV_GROUP, TestContext};
use predicates::prelude::*;

#[test]
fn apply_without_yes_is_declined_when_not_interactive() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["apply", "-e", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pass --yes"))
        .stdout(predicate::str::contains("Cancelled; nothing was changed."));

    assert!(ctx.az().mutations().is_empty());
}

#[test]
fn invalid_environment_fails_before_calling_az() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["apply", "-e", "qa", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid environment 'qa'"))
        .stderr(predicate::str::contains("No changes were made."));

    assert!(ctx.az().calls().is_empty());
}

#[test]
fn logged_out_session_stops_the_run() {
    let ctx = TestContext::with_reporting_manifest();
    ctx.az().log_out();

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("az login"))
        .stderr(predicate::str::contains("No changes were made."));

    assert!(ctx.az().mutations().is_empty());
}

#[test]
fn missing_resource_group_requires_opt_in() {
    let ctx = TestContext::new();
    ctx.write_manifest(crate::harness::REPORTING_MANIFEST);

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--create-group"));
    assert!(ctx.az().mutations().is_empty());

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes", "--create-group"])
        .assert()
        .success()
        .stdout(predicate::str::contains("needs --create-group").not())
        .stdout(predicate::str::contains("Resource group bo-gpsc-reports-dev-rg created"));
    assert!(ctx.az().has_group(DEV_GROUP));
    assert!(ctx.az().has_resource("bo-gpsc-reports-dev-plan"));
}

#[test]
fn subscription_is_selected_before_anything_else() {
    let ctx = TestContext::with_reporting_manifest();

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes", "--dry-run", "-s", "reporting-nonprod"])
        .assert()
        .success();

    let calls = ctx.az().calls();
    let select = calls
        .iter()
        .position(|c| c.starts_with("account set --subscription reporting-nonprod"))
        .expect("subscription selected");
    let group_check =
        calls.iter().position(|c| c.starts_with("group exists")).expect("group checked");
    assert!(select < group_check);
}

#[test]
fn missing_secret_is_rejected_before_calling_az() {
    let ctx = TestContext::new();
    ctx.write_manifest(
        &crate::harness::REPORTING_MANIFEST
            .replace("sql_admin_password = \"Dev-Only-Passw0rd\"\n", ""),
    );
    ctx.az().add_group(DEV_GROUP);

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin_password"));
    assert!(ctx.az().calls().is_empty());

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes", "--var", "sql_admin_password=From-Flag-1"])
        .assert()
        .success();
    assert!(ctx.az().has_resource("bo-gpsc-reports-dev-sqlserver"));
}

#[test]
fn dry_run_with_create_group_only_announces_the_group() {
    let ctx = TestContext::new();
    ctx.write_manifest(crate::harness::REPORTING_MANIFEST);

    ctx.cli()
        .args(["apply", "-e", "dev", "--yes", "--dry-run", "--create-group"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resource group bo-gpsc-reports-dev-rg would be created"));
    assert!(!ctx.az().has_group(DEV_GROUP));
    assert!(ctx.az().mutations().is_empty());
}
