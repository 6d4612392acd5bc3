use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn init_refuses_to_overwrite_without_force() {
    let ctx = TestContext::new();
    ctx.write_manifest("base_name = \"keep-me\"\n");

    ctx.cli()
        .args(["init", "-b", "bo-gpsc-reports"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let manifest = std::fs::read_to_string(ctx.manifest_path()).expect("read azprov.toml");
    assert_eq!(manifest, "base_name = \"keep-me\"\n");
}

#[test]
fn init_overwrites_with_force() {
    let ctx = TestContext::new();
    ctx.write_manifest("base_name = \"keep-me\"\n");

    ctx.cli().args(["init", "-b", "bo-gpsc-reports", "--force"]).assert().success();

    let manifest = std::fs::read_to_string(ctx.manifest_path()).expect("read azprov.toml");
    assert!(manifest.contains("bo-gpsc-reports"));
}
