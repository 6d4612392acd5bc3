//! Offline manifest validation. Never calls the provider.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::{
    AppError, Environment, Manifest, Overrides, RenderMode, ResolvedManifest, ResourceKind,
    manifest::resolve,
};

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentCheck {
    pub environment: Environment,
    pub resources: usize,
    pub errors: Vec<String>,
    /// Problems that only matter at apply time, such as unset secret variables.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub environments: Vec<EnvironmentCheck>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environments.iter().all(|check| check.errors.is_empty())
    }

    pub fn error_count(&self) -> usize {
        self.environments.iter().map(|check| check.errors.len()).sum()
    }
}

/// Resolve `manifest` for every environment and check the files it references.
///
/// `base_dir` anchors relative template and parameter file paths.
pub fn execute(
    manifest: &Manifest,
    base_dir: &Path,
    overrides: &Overrides,
) -> Result<ValidationReport, AppError> {
    let mut environments = Vec::new();
    for environment in Environment::ALL {
        environments.push(check_environment(manifest, environment, base_dir, overrides));
    }
    Ok(ValidationReport { environments })
}

fn check_environment(
    manifest: &Manifest,
    environment: Environment,
    base_dir: &Path,
    overrides: &Overrides,
) -> EnvironmentCheck {
    let mut check =
        EnvironmentCheck { environment, resources: 0, errors: Vec::new(), warnings: Vec::new() };

    let lenient = Overrides { render: RenderMode::Lenient, ..overrides.clone() };
    let resolved = match resolve(manifest, environment, &lenient) {
        Ok(resolved) => resolved,
        Err(err) => {
            check.errors.push(err.to_string());
            return check;
        }
    };
    check.resources = resolved.resources().count();

    let strict = Overrides { render: RenderMode::Strict, ..overrides.clone() };
    match resolve(manifest, environment, &strict) {
        Ok(_) => {}
        Err(err @ AppError::Template { .. }) => check.warnings.push(format!(
            "{} (supply it with --var or AZPROV_VAR_<NAME>)",
            err
        )),
        Err(err) => check.errors.push(err.to_string()),
    }

    check.errors.extend(check_files(&resolved, base_dir));
    check.errors.extend(check_rules(&resolved));
    check
}

/// NSG rule priorities must parse and stay within the provider's range.
fn check_rules(resolved: &ResolvedManifest) -> Vec<String> {
    resolved
        .resources()
        .filter(|resource| resource.descriptor.kind == ResourceKind::NetworkSecurityGroup)
        .filter_map(|resource| resource.inbound_rules().err())
        .map(|err| err.to_string())
        .collect()
}

fn check_files(resolved: &ResolvedManifest, base_dir: &Path) -> Vec<String> {
    let mut errors = Vec::new();
    for resource in resolved.resources() {
        if resource.descriptor.kind != ResourceKind::TemplateDeployment {
            continue;
        }
        let role = &resource.descriptor.role;
        if let Some(template) = resource.property("template") {
            let path = base_dir.join(template);
            if !path.is_file() {
                errors.push(format!("'{}': template file {} not found", role, path.display()));
            }
        }
        if let Some(parameters) = resource.property("parameters")
            && let Err(err) = check_parameter_file(&base_dir.join(parameters))
        {
            errors.push(format!("'{}': {}", role, err));
        }
    }
    errors
}

/// A deployment parameter file must be JSON with a top-level `parameters` object.
pub fn check_parameter_file(path: &Path) -> Result<(), AppError> {
    if !path.is_file() {
        return Err(AppError::config_error(format!(
            "parameter file {} not found",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        AppError::ParseError { what: path.display().to_string(), details: e.to_string() }
    })?;
    if !value.get("parameters").is_some_and(serde_json::Value::is_object) {
        return Err(AppError::ParseError {
            what: path.display().to_string(),
            details: "missing top-level 'parameters' object".to_string(),
        });
    }
    Ok(())
}
