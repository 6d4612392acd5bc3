use serde::Serialize;

use crate::domain::{
    AppError, Environment, Manifest, Overrides, RenderMode, ResourceKind, manifest::resolve,
};

/// One resolved provider name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameEntry {
    pub environment: Environment,
    pub role: String,
    pub kind: ResourceKind,
    pub name: String,
    pub resource_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Resolve names for each environment in `environments`, in creation order.
///
/// Property templates are rendered leniently: names never depend on
/// variables, so secrets need not be supplied.
pub fn execute(
    manifest: &Manifest,
    environments: &[Environment],
    overrides: &Overrides,
) -> Result<Vec<NameEntry>, AppError> {
    let overrides = Overrides { render: RenderMode::Lenient, ..overrides.clone() };
    let mut entries = Vec::new();
    for environment in environments {
        let resolved = resolve(manifest, *environment, &overrides)?;
        for role in resolved.creation_order(None)? {
            let Some(resource) = resolved.resource(&role) else { continue };
            let descriptor = &resource.descriptor;
            entries.push(NameEntry {
                environment: *environment,
                role: descriptor.role.clone(),
                kind: descriptor.kind,
                name: descriptor.name.clone(),
                resource_group: descriptor.resource_group.clone(),
                parent: descriptor.parent.clone(),
            });
        }
    }
    Ok(entries)
}
