use azprov::{
    Action, AppError, Environment, InitOptions, NoopReporter, RunOptions, Scope, StepStatus,
};
use serial_test::serial;
use tempfile::TempDir;

use crate::harness::fake_az::FakeAz;
use crate::harness::{DEV_GROUP, DEV_NAMES, REPORTING_MANIFEST};

fn dev_scope(dir: &TempDir) -> Scope {
    Scope {
        manifest: dir.path().join("azprov.toml"),
        environment: "dev".to_string(),
        ..Scope::default()
    }
}

fn use_fake_az(az: &FakeAz) {
    // SAFETY: every test touching the process environment is #[serial].
    unsafe { std::env::set_var(azprov::services::AZ_BIN_ENV, &az.bin) };
}

#[test]
fn init_then_names_and_validate_offline() {
    let dir = TempDir::new().unwrap();
    let outcome = azprov::init(&InitOptions {
        dir: dir.path().to_path_buf(),
        base_name: "bo-gpsc-reports".to_string(),
        location: "canadacentral".to_string(),
        force: false,
    })
    .unwrap();
    assert!(outcome.manifest.exists());
    assert!(outcome.created.iter().any(|f| f == "templates/monitoring.json"));

    let names = azprov::names(&dev_scope(&dir), false).unwrap();
    let backend = names.iter().find(|n| n.role == "backend").unwrap();
    assert_eq!(backend.name, "bo-gpsc-reports-dev-backend");
    assert_eq!(backend.environment, Environment::Dev);

    let report = azprov::validate(&dir.path().join("azprov.toml"), &[]).unwrap();
    assert!(report.is_valid(), "{:?}", report);
    assert!(
        report.environments.iter().all(|check| !check.warnings.is_empty()),
        "the scaffold leaves the SQL password to be supplied"
    );

    let report = azprov::validate(
        &dir.path().join("azprov.toml"),
        &["sql_admin_password=Supplied-1".to_string()],
    )
    .unwrap();
    assert!(report.environments.iter().all(|check| check.warnings.is_empty()));
}

#[test]
fn names_rejects_unknown_environment() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("azprov.toml"), REPORTING_MANIFEST).unwrap();
    let scope = Scope { environment: "staging".to_string(), ..dev_scope(&dir) };

    assert!(matches!(azprov::names(&scope, false), Err(AppError::InvalidEnvironment(_))));
}

#[test]
#[serial]
fn apply_then_destroy_round_trip() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("azprov.toml"), REPORTING_MANIFEST).unwrap();
    let az = FakeAz::install(dir.path());
    az.add_group(DEV_GROUP);
    use_fake_az(&az);
    let scope = dev_scope(&dir);

    let plan = azprov::plan(&scope, Action::Apply).unwrap();
    assert_eq!(plan.pending_count(), DEV_NAMES.len());

    let applied = azprov::apply(&scope, RunOptions::default(), NoopReporter, |_| Ok(true)).unwrap();
    assert!(applied.is_success());
    assert_eq!(applied.changed(), DEV_NAMES.len());
    assert!(applied.steps.iter().all(|step| step.status == StepStatus::Done));

    let status = azprov::status(&scope).unwrap();
    assert_eq!(status.present_count(), DEV_NAMES.len());

    let destroyed =
        azprov::destroy(&scope, RunOptions::default(), NoopReporter, |_| Ok(true)).unwrap();
    assert!(destroyed.is_success());
    assert_eq!(destroyed.changed(), DEV_NAMES.len());
    assert_eq!(azprov::status(&scope).unwrap().present_count(), 0);
    assert!(az.has_group(DEV_GROUP));
}

#[test]
#[serial]
fn declined_confirmation_changes_nothing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("azprov.toml"), REPORTING_MANIFEST).unwrap();
    let az = FakeAz::install(dir.path());
    az.add_group(DEV_GROUP);
    use_fake_az(&az);

    let outcome =
        azprov::apply(&dev_scope(&dir), RunOptions::default(), NoopReporter, |_| Ok(false))
            .unwrap();

    assert!(outcome.declined);
    assert!(outcome.steps.is_empty());
    assert!(az.mutations().is_empty());
}
