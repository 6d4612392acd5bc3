//! Command-line scope: which manifest, which environment, which overrides.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::domain::{
    AppError, Environment, Manifest, Overrides, RenderMode, ResolvedManifest, Role,
    manifest::resolve,
};

/// Prefix of environment variables that become template variables.
/// `AZPROV_VAR_SQL_ADMIN_PASSWORD` sets `sql_admin_password`.
pub const VAR_ENV_PREFIX: &str = "AZPROV_VAR_";

/// Raw selection and overrides as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub manifest: PathBuf,
    pub environment: String,
    pub resource_group: Option<String>,
    pub subscription: Option<String>,
    pub targets: Vec<String>,
    /// `KEY=VALUE` pairs.
    pub variables: Vec<String>,
}

/// A manifest resolved for one environment, plus the selected roles.
#[derive(Debug, Clone)]
pub struct LoadedScope {
    pub manifest: Manifest,
    pub resolved: ResolvedManifest,
    /// `None` means every resource.
    pub selection: Option<BTreeSet<Role>>,
}

impl LoadedScope {
    pub fn selection(&self) -> Option<&BTreeSet<Role>> {
        self.selection.as_ref()
    }
}

impl Scope {
    /// Validate the environment, then load and resolve the manifest.
    ///
    /// The environment is checked before the manifest is read so that a
    /// typo fails fast and never reaches the provider.
    pub fn load(&self, render: RenderMode) -> Result<LoadedScope, AppError> {
        let environment = Environment::parse(&self.environment)?;
        let manifest = Manifest::load(&self.manifest)?;
        let overrides = self.overrides(render)?;
        let resolved = resolve(&manifest, environment, &overrides)?;
        let selection = if self.targets.is_empty() {
            None
        } else {
            Some(manifest.expand_targets(&self.targets)?)
        };
        tracing::debug!(
            manifest = %self.manifest.display(),
            environment = %environment,
            resource_group = %resolved.resource_group,
            "scope loaded"
        );
        Ok(LoadedScope { manifest, resolved, selection })
    }

    pub fn overrides(&self, render: RenderMode) -> Result<Overrides, AppError> {
        Ok(Overrides {
            resource_group: self.resource_group.clone(),
            subscription: self.subscription.clone(),
            variables: collect_variables(std::env::vars(), &self.variables)?,
            render,
        })
    }

    /// Directory the manifest lives in; relative file properties are anchored here.
    pub fn base_dir(&self) -> PathBuf {
        manifest_dir(&self.manifest)
    }
}

pub fn manifest_dir(manifest: &Path) -> PathBuf {
    match manifest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Merge `AZPROV_VAR_*` environment variables with `KEY=VALUE` flags.
/// Flags win over environment variables.
pub fn collect_variables(
    env: impl IntoIterator<Item = (String, String)>,
    flags: &[String],
) -> Result<BTreeMap<String, String>, AppError> {
    let mut variables: BTreeMap<String, String> = env
        .into_iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(VAR_ENV_PREFIX)?;
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), value))
        })
        .collect();

    for flag in flags {
        let (key, value) = flag.split_once('=').ok_or_else(|| {
            AppError::config_error(format!("Invalid --var '{}': expected KEY=VALUE", flag))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::config_error(format!("Invalid --var '{}': empty key", flag)));
        }
        variables.insert(key.to_string(), value.to_string());
    }
    Ok(variables)
}
