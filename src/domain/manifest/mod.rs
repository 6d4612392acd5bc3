//! Desired-state manifest.
//!
//! The manifest declares every resource the application needs, for all
//! environments at once. Names are never written in the manifest; they are
//! derived from `base_name`, the environment and each resource's role.

mod resolution;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AppError, BaseName, Environment, ResourceKind, Role};

pub use resolution::{
    InboundRule, Overrides, RenderMode, ResolvedManifest, ResolvedResource, resolve,
};

/// Default manifest file name looked up in the working directory.
pub const MANIFEST_FILE: &str = "azprov.toml";

fn default_true() -> bool {
    true
}

/// Per-environment settings and default parameter set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// One declared resource.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSpec {
    pub role: Role,
    pub kind: ResourceKind,
    /// Scoping parent (virtual network for a subnet, server for a database).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Role>,
    /// Extra ordering edges beyond those implied by `parent` and reference properties.
    #[serde(default)]
    pub depends_on: Vec<Role>,
    /// A failed critical step aborts the run; a non-critical one only warns.
    #[serde(default = "default_true")]
    pub critical: bool,
    /// Request asynchronous provider-side execution where the kind supports it.
    #[serde(default)]
    pub no_wait: bool,
    /// Kind-specific settings. Values are templates rendered per environment.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ResourceSpec {
    /// Every role this resource must be created after, sorted and deduplicated.
    pub fn dependencies(&self) -> BTreeSet<Role> {
        let mut deps: BTreeSet<Role> = self.depends_on.iter().cloned().collect();
        if let Some(parent) = &self.parent {
            deps.insert(parent.clone());
        }
        for reference in self.kind.reference_keys() {
            if let Some(value) = self.properties.get(reference.key)
                && let Ok(role) = Role::new(value)
            {
                deps.insert(role);
            }
        }
        deps
    }
}

/// Parsed manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub base_name: BaseName,
    pub location: String,
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentSettings>,
    /// Named sets of roles addressable with `--target`.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<Role>>,
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

impl Manifest {
    /// Load a manifest from disk. `.yml`/`.yaml` files are parsed as YAML, anything else as TOML.
    pub fn load(path: &Path) -> Result<Manifest, AppError> {
        if !path.exists() {
            return Err(AppError::ManifestNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Manifest::from_yaml_str(&content),
            _ => Manifest::from_toml_str(&content),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Manifest, AppError> {
        let manifest: Manifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_yaml_str(content: &str) -> Result<Manifest, AppError> {
        let manifest: Manifest = serde_yaml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn resource(&self, role: &str) -> Option<&ResourceSpec> {
        self.resources.iter().find(|spec| spec.role.as_str() == role)
    }

    /// Settings for an environment; an environment without a table gets defaults.
    pub fn settings(&self, environment: Environment) -> EnvironmentSettings {
        self.environments.get(environment.label()).cloned().unwrap_or_default()
    }

    /// Expand command-line targets (roles or group names) into a role set.
    pub fn expand_targets(&self, targets: &[String]) -> Result<BTreeSet<Role>, AppError> {
        let mut selected = BTreeSet::new();
        for target in targets {
            if let Some(spec) = self.resource(target) {
                selected.insert(spec.role.clone());
            } else if let Some(members) = self.groups.get(target) {
                selected.extend(members.iter().cloned());
            } else {
                let mut available: Vec<&str> =
                    self.resources.iter().map(|spec| spec.role.as_str()).collect();
                available.extend(self.groups.keys().map(String::as_str));
                return Err(AppError::UnknownTarget {
                    name: target.clone(),
                    available: available.join(", "),
                });
            }
        }
        Ok(selected)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.location.trim().is_empty() {
            return Err(AppError::manifest("location must not be empty"));
        }

        for key in self.environments.keys() {
            Environment::parse(key)?;
        }

        let mut kinds: BTreeMap<&str, ResourceKind> = BTreeMap::new();
        for spec in &self.resources {
            if kinds.insert(spec.role.as_str(), spec.kind).is_some() {
                return Err(AppError::manifest(format!("duplicate role '{}'", spec.role)));
            }
        }

        for spec in &self.resources {
            self.validate_resource(spec, &kinds)?;
        }

        for (group, members) in &self.groups {
            if kinds.contains_key(group.as_str()) {
                return Err(AppError::manifest(format!(
                    "group '{}' has the same name as a resource role",
                    group
                )));
            }
            for member in members {
                if !kinds.contains_key(member.as_str()) {
                    return Err(AppError::UnknownRole {
                        role: format!("group {}", group),
                        target: member.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn validate_resource(
        &self,
        spec: &ResourceSpec,
        kinds: &BTreeMap<&str, ResourceKind>,
    ) -> Result<(), AppError> {
        let role = spec.role.to_string();
        let unknown =
            |target: &str| AppError::UnknownRole { role: role.clone(), target: target.to_string() };

        match (spec.kind.parent_kind(), &spec.parent) {
            (Some(expected), Some(parent)) => {
                let actual = kinds.get(parent.as_str()).ok_or_else(|| unknown(parent.as_str()))?;
                if *actual != expected {
                    return Err(AppError::manifest(format!(
                        "'{}' is a {} and needs a {} parent, but '{}' is a {}",
                        spec.role, spec.kind, expected, parent, actual
                    )));
                }
            }
            (Some(expected), None) => {
                return Err(AppError::manifest(format!(
                    "'{}' is a {} and requires a {} parent",
                    spec.role, spec.kind, expected
                )));
            }
            (None, Some(_)) => {
                return Err(AppError::manifest(format!(
                    "'{}' is a {} and cannot have a parent",
                    spec.role, spec.kind
                )));
            }
            (None, None) => {}
        }

        for dep in &spec.depends_on {
            if dep == &spec.role {
                return Err(AppError::CircularDependency(format!("{} -> {}", role, role)));
            }
            if !kinds.contains_key(dep.as_str()) {
                return Err(unknown(dep.as_str()));
            }
        }

        for reference in spec.kind.reference_keys() {
            let Some(value) = spec.properties.get(reference.key) else { continue };
            let actual =
                kinds.get(value.as_str()).ok_or_else(|| unknown(value.as_str()))?;
            if !reference.kinds.contains(actual) {
                return Err(AppError::manifest(format!(
                    "property '{}' of '{}' must name a {}, but '{}' is a {}",
                    reference.key,
                    spec.role,
                    reference.kinds.iter().map(|k| k.label()).collect::<Vec<_>>().join(" or "),
                    value,
                    actual
                )));
            }
        }

        for required in spec.kind.required_properties() {
            if !spec.properties.contains_key(*required) {
                return Err(AppError::manifest(format!(
                    "'{}' ({}) is missing required property '{}'",
                    spec.role, spec.kind, required
                )));
            }
        }

        Ok(())
    }
}
