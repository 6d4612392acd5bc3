//! Shared testing harness for `azprov` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fake_az::FakeAz;
use super::manifest::REPORTING_MANIFEST;

/// Resource group the reporting manifest resolves to in `dev`.
pub(crate) const DEV_GROUP: &str = "bo-gpsc-reports-dev-rg";

/// Testing harness providing an isolated work directory and a fake `az`.
pub(crate) struct TestContext {
    _root: TempDir,
    work_dir: PathBuf,
    az: FakeAz,
}

impl TestContext {
    /// Create a new isolated environment.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        let az = FakeAz::install(root.path());
        Self { _root: root, work_dir, az }
    }

    /// A context with the reporting manifest written and its dev group present.
    pub(crate) fn with_reporting_manifest() -> Self {
        let ctx = Self::new();
        ctx.write_manifest(REPORTING_MANIFEST);
        ctx.az.add_group(DEV_GROUP);
        ctx
    }

    /// Path to the workspace directory used for CLI invocations.
    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub(crate) fn manifest_path(&self) -> PathBuf {
        self.work_dir.join("azprov.toml")
    }

    pub(crate) fn write_manifest(&self, content: &str) {
        fs::write(self.manifest_path(), content).expect("Failed to write manifest");
    }

    pub(crate) fn az(&self) -> &FakeAz {
        &self.az
    }

    /// Build a command for invoking the compiled binary within the test context.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("azprov").expect("Failed to locate azprov binary");
        cmd.current_dir(&self.work_dir)
            .env("AZPROV_AZ_BIN", &self.az.bin)
            .env("NO_COLOR", "1")
            .env_remove("AZPROV_MANIFEST")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Mark every named dev resource as already deployed.
    pub(crate) fn seed(&self, names: &[&str]) {
        for name in names {
            self.az.add_resource(name);
        }
    }
}
