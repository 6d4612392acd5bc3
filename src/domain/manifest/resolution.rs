use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

use minijinja::{Environment as TemplateEnv, UndefinedBehavior, Value, context};
use serde::Serialize;

use super::{Manifest, ResourceSpec};
use crate::domain::naming::{default_resource_group, resource_name};
use crate::domain::{AppError, DependencyGraph, Environment, ResourceDescriptor, Role};

/// How property templates treat variables that are not defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Undefined variables and empty required properties are errors.
    #[default]
    Strict,
    /// Undefined variables render as empty strings. For commands that only
    /// need names and ordering, so secrets need not be supplied.
    Lenient,
}

/// Values supplied on the command line that take precedence over the manifest.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub resource_group: Option<String>,
    pub subscription: Option<String>,
    /// Extra template variables; they shadow the environment's parameters.
    pub variables: BTreeMap<String, String>,
    pub render: RenderMode,
}

/// A resource with its name, rendered properties and resolved references.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedResource {
    pub descriptor: ResourceDescriptor,
    pub location: String,
    pub critical: bool,
    pub no_wait: bool,
    pub properties: BTreeMap<String, String>,
    /// Descriptors of roles named by reference properties, keyed by property.
    #[serde(skip)]
    pub references: BTreeMap<String, ResourceDescriptor>,
}

impl ResolvedResource {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }

    pub fn reference(&self, key: &str) -> Option<&ResourceDescriptor> {
        self.references.get(key)
    }

    /// Whether `--no-wait` should be passed for this resource.
    pub fn wants_no_wait(&self) -> bool {
        self.no_wait && self.descriptor.kind.supports_no_wait()
    }

    /// Inbound allow rules from the comma-separated `allow_inbound_ports` property.
    ///
    /// Priorities start at `rule_priority_start` (default 100) and step by 10;
    /// the provider caps priorities at 4096.
    pub fn inbound_rules(&self) -> Result<Vec<InboundRule>, AppError> {
        let Some(ports) = self.property("allow_inbound_ports") else {
            return Ok(Vec::new());
        };
        let start: u32 = match self.property("rule_priority_start") {
            Some(value) => value.parse().map_err(|e| AppError::ParseError {
                what: format!("rule_priority_start of '{}'", self.descriptor.role),
                details: format!("Value: '{}', Error: {}", value, e),
            })?,
            None => DEFAULT_RULE_PRIORITY,
        };

        ports
            .split(',')
            .map(str::trim)
            .filter(|port| !port.is_empty())
            .enumerate()
            .map(|(idx, port)| {
                let priority = start.saturating_add(RULE_PRIORITY_STEP.saturating_mul(idx as u32));
                if priority > MAX_RULE_PRIORITY {
                    return Err(AppError::manifest(format!(
                        "NSG rule priority {} for '{}' exceeds {}",
                        priority, self.descriptor.role, MAX_RULE_PRIORITY
                    )));
                }
                Ok(InboundRule { port: port.to_string(), priority })
            })
            .collect()
    }
}

const DEFAULT_RULE_PRIORITY: u32 = 100;
const RULE_PRIORITY_STEP: u32 = 10;
const MAX_RULE_PRIORITY: u32 = 4096;

/// One inbound TCP allow rule of a network security group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRule {
    pub port: String,
    pub priority: u32,
}

/// The manifest evaluated for one environment.
#[derive(Debug, Clone)]
pub struct ResolvedManifest {
    pub environment: Environment,
    pub resource_group: String,
    pub subscription: Option<String>,
    pub location: String,
    pub graph: DependencyGraph,
    resources: BTreeMap<Role, ResolvedResource>,
}

impl ResolvedManifest {
    pub fn resource<Q>(&self, role: &Q) -> Option<&ResolvedResource>
    where
        Role: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.resources.get(role)
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResolvedResource> {
        self.resources.values()
    }

    pub fn roles(&self) -> BTreeSet<Role> {
        self.resources.keys().cloned().collect()
    }

    /// Roles in creation order, optionally limited to a selection.
    pub fn creation_order(&self, selection: Option<&BTreeSet<Role>>) -> Result<Vec<Role>, AppError> {
        self.graph.creation_order(selection)
    }

    /// Roles in teardown order, optionally limited to a selection.
    pub fn teardown_order(&self, selection: Option<&BTreeSet<Role>>) -> Result<Vec<Role>, AppError> {
        self.graph.teardown_order(selection)
    }
}

/// Evaluate `manifest` for `environment`.
pub fn resolve(
    manifest: &Manifest,
    environment: Environment,
    overrides: &Overrides,
) -> Result<ResolvedManifest, AppError> {
    let settings = manifest.settings(environment);
    let resource_group = overrides
        .resource_group
        .clone()
        .or(settings.resource_group.clone())
        .unwrap_or_else(|| default_resource_group(&manifest.base_name, environment));
    let subscription = overrides.subscription.clone().or(settings.subscription.clone());
    let location = settings.location.clone().unwrap_or_else(|| manifest.location.clone());

    let graph = DependencyGraph::from_manifest(manifest);
    graph.creation_order(None)?;

    let names: BTreeMap<&Role, String> = manifest
        .resources
        .iter()
        .map(|spec| {
            (&spec.role, resource_name(&manifest.base_name, environment, &spec.role, spec.kind))
        })
        .collect();

    let descriptors: BTreeMap<Role, ResourceDescriptor> = manifest
        .resources
        .iter()
        .map(|spec| {
            let descriptor = ResourceDescriptor {
                kind: spec.kind,
                role: spec.role.to_string(),
                name: names[&spec.role].clone(),
                resource_group: resource_group.clone(),
                parent: spec.parent.as_ref().map(|parent| names[parent].clone()),
            };
            (spec.role.clone(), descriptor)
        })
        .collect();

    check_collisions(manifest, &descriptors)?;

    let mut variables = settings.parameters.clone();
    variables.extend(overrides.variables.clone());
    let name_map: BTreeMap<&str, &str> =
        names.iter().map(|(role, name)| (role.as_str(), name.as_str())).collect();
    let render_ctx = context! {
        environment => environment.label(),
        base_name => manifest.base_name.as_str(),
        location => &location,
        resource_group => &resource_group,
        names => name_map,
        ..Value::from_serialize(&variables)
    };

    let mut templates = TemplateEnv::new();
    templates.set_undefined_behavior(match overrides.render {
        RenderMode::Strict => UndefinedBehavior::Strict,
        RenderMode::Lenient => UndefinedBehavior::Lenient,
    });

    let mut resources = BTreeMap::new();
    for spec in &manifest.resources {
        let properties = render_properties(&templates, spec, &render_ctx)?;
        let references = spec
            .kind
            .reference_keys()
            .iter()
            .filter_map(|reference| {
                let target = spec.properties.get(reference.key)?;
                let role = Role::new(target).ok()?;
                Some((reference.key.to_string(), descriptors.get(&role)?.clone()))
            })
            .collect();

        for required in spec.kind.required_properties() {
            let empty = properties.get(*required).is_none_or(|value| value.trim().is_empty());
            if overrides.render == RenderMode::Strict && empty {
                return Err(AppError::manifest(format!(
                    "'{}' ({}) has an empty '{}' in environment {}",
                    spec.role, spec.kind, required, environment
                )));
            }
        }

        resources.insert(
            spec.role.clone(),
            ResolvedResource {
                descriptor: descriptors[&spec.role].clone(),
                location: location.clone(),
                critical: spec.critical,
                no_wait: spec.no_wait,
                properties,
                references,
            },
        );
    }

    Ok(ResolvedManifest { environment, resource_group, subscription, location, graph, resources })
}

fn render_properties(
    templates: &TemplateEnv<'_>,
    spec: &ResourceSpec,
    ctx: &Value,
) -> Result<BTreeMap<String, String>, AppError> {
    spec.properties
        .iter()
        .map(|(key, source)| {
            let rendered = templates.render_str(source, ctx).map_err(|e| AppError::Template {
                role: spec.role.to_string(),
                property: key.clone(),
                details: e.to_string(),
            })?;
            Ok((key.clone(), rendered))
        })
        .collect()
}

fn check_collisions(
    manifest: &Manifest,
    descriptors: &BTreeMap<Role, ResourceDescriptor>,
) -> Result<(), AppError> {
    let mut seen: BTreeMap<(String, Option<String>, String), &str> = BTreeMap::new();
    for spec in &manifest.resources {
        let descriptor = &descriptors[&spec.role];
        let key =
            (descriptor.kind.label().to_string(), descriptor.parent.clone(), descriptor.name.clone());
        if let Some(first) = seen.insert(key, spec.role.as_str()) {
            return Err(AppError::NameCollision {
                kind: descriptor.kind.to_string(),
                name: descriptor.name.clone(),
                first: first.to_string(),
                second: spec.role.to_string(),
            });
        }
    }
    Ok(())
}
