use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::de::DeserializeOwned;

use crate::domain::{AppError, ResolvedResource, ResourceDescriptor, ResourceKind, ResourceState};
use crate::ports::{Account, ControlPlane};

use super::az_args::{self, args};

/// Environment variable that overrides the `az` executable.
pub const AZ_BIN_ENV: &str = "AZPROV_AZ_BIN";

/// Exit code the Azure CLI uses for "resource not found".
const NOT_FOUND_EXIT_CODE: i32 = 3;

#[derive(Debug, Clone)]
pub struct AzCliAdapter {
    program: String,
    /// Directory relative template and parameter paths are resolved from.
    working_dir: Option<PathBuf>,
}

impl AzCliAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), working_dir: None }
    }

    /// Use `$AZPROV_AZ_BIN` when set, `az` from `PATH` otherwise.
    pub fn from_env() -> Self {
        Self::new(std::env::var(AZ_BIN_ENV).unwrap_or_else(|_| "az".to_string()))
    }

    /// Run every invocation from `dir`, normally the manifest's directory.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    fn output(&self, argv: &[String]) -> Result<Output, AppError> {
        let shown = az_args::redacted(argv);
        tracing::debug!(command = %shown, "invoking az");

        let mut command = Command::new(&self.program);
        command.args(argv).arg("--only-show-errors");
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let output = command
            .output()
            .map_err(|e| AppError::Provider { command: shown.clone(), details: e.to_string() })?;

        tracing::debug!(command = %shown, status = ?output.status.code(), "az returned");
        Ok(output)
    }

    fn run(&self, argv: &[String]) -> Result<String, AppError> {
        let output = self.output(argv)?;
        if !output.status.success() {
            return Err(failure(argv, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn query<T: DeserializeOwned>(&self, argv: &[String]) -> Result<T, AppError> {
        let mut argv = argv.to_vec();
        argv.extend(args(&["-o", "json"]));
        let stdout = self.run(&argv)?;
        serde_json::from_str(&stdout).map_err(|e| AppError::ParseError {
            what: format!("output of '{}'", az_args::redacted(&argv)),
            details: e.to_string(),
        })
    }
}

fn failure(argv: &[String], output: &Output) -> AppError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    AppError::Provider {
        command: az_args::redacted(argv),
        details: if stderr.is_empty() { "Unknown error".to_string() } else { stderr },
    }
}

/// Error codes that say something other than the resource is missing.
const UNRELATED_NOT_FOUND: &[&str] = &["SubscriptionNotFound"];

fn is_not_found(output: &Output) -> bool {
    if output.status.code() == Some(NOT_FOUND_EXIT_CODE) {
        return true;
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if UNRELATED_NOT_FOUND.iter().any(|code| stderr.contains(code)) {
        return false;
    }
    ["ResourceNotFound", "not found", "could not be found"]
        .iter()
        .any(|marker| stderr.contains(marker))
}

impl ControlPlane for AzCliAdapter {
    fn account(&self) -> Result<Account, AppError> {
        self.query(&args(&["account", "show"])).map_err(|e| match e {
            AppError::Provider { details, .. } => AppError::NotAuthenticated(details),
            other => other,
        })
    }

    fn select_subscription(&self, subscription: &str) -> Result<(), AppError> {
        self.run(&args(&["account", "set", "--subscription", subscription]))?;
        Ok(())
    }

    fn group_exists(&self, name: &str) -> Result<bool, AppError> {
        let stdout = self.run(&args(&["group", "exists", "-n", name]))?;
        match stdout.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(AppError::ParseError {
                what: "az group exists output".to_string(),
                details: format!("Value: '{}'", other),
            }),
        }
    }

    fn create_group(&self, name: &str, location: &str) -> Result<(), AppError> {
        self.run(&args(&["group", "create", "-n", name, "-l", location, "-o", "none"]))?;
        Ok(())
    }

    fn state(&self, resource: &ResourceDescriptor) -> Result<ResourceState, AppError> {
        let mut argv = az_args::show(resource)?;
        argv.extend(args(&["-o", "none"]));
        let output = self.output(&argv)?;
        if output.status.success() {
            Ok(ResourceState::Present)
        } else if is_not_found(&output) {
            Ok(ResourceState::Absent)
        } else {
            Err(failure(&argv, &output))
        }
    }

    fn create(&self, resource: &ResolvedResource) -> Result<(), AppError> {
        let target_id = match resource.descriptor.kind {
            ResourceKind::PrivateEndpoint => {
                let target = resource.reference("target").ok_or_else(|| {
                    AppError::manifest(format!(
                        "private endpoint '{}' has no target",
                        resource.descriptor.role
                    ))
                })?;
                Some(self.run(&az_args::show_id(target)?)?)
            }
            _ => None,
        };

        for argv in az_args::create(resource, target_id.as_deref())? {
            self.run(&argv)?;
        }
        Ok(())
    }

    fn delete(&self, resource: &ResolvedResource) -> Result<(), AppError> {
        if resource.descriptor.kind == ResourceKind::TemplateDeployment {
            let ids: Vec<String> = self.query(&az_args::deployment_outputs(&resource.descriptor)?)?;
            if let Some(argv) = az_args::delete_by_ids(&ids) {
                tracing::info!(
                    deployment = %resource.descriptor.name,
                    resources = ids.len(),
                    "deleting deployed resources"
                );
                self.run(&argv)?;
            }
        }
        for argv in az_args::delete(resource)? {
            self.run(&argv)?;
        }
        Ok(())
    }

    fn attached(&self, resource: &ResourceDescriptor) -> Result<Vec<String>, AppError> {
        match az_args::attached(resource) {
            Some(argv) => self.query(&argv),
            None => Ok(Vec::new()),
        }
    }
}
