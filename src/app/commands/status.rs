use std::collections::BTreeSet;

use serde::Serialize;

use crate::app::commands::{StateLedger, preflight};
use crate::domain::{AppError, Environment, ResolvedManifest, ResourceDescriptor, ResourceState, Role};
use crate::ports::ControlPlane;

#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub descriptor: ResourceDescriptor,
    pub state: ResourceState,
}

/// Live state of every selected resource, in creation order.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub environment: Environment,
    pub resource_group: String,
    pub group_present: bool,
    pub entries: Vec<StatusEntry>,
}

impl StatusReport {
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.state.is_present()).count()
    }
}

pub fn execute<C: ControlPlane>(
    cloud: &C,
    resolved: &ResolvedManifest,
    selection: Option<&BTreeSet<Role>>,
) -> Result<StatusReport, AppError> {
    let checked = preflight::check(cloud, resolved)?;
    let mut ledger = StateLedger::new(checked.group_present);

    let mut entries = Vec::new();
    for role in resolved.creation_order(selection)? {
        let Some(resource) = resolved.resource(&role) else { continue };
        let state = ledger.state(cloud, &resource.descriptor)?;
        entries.push(StatusEntry { descriptor: resource.descriptor.clone(), state });
    }

    Ok(StatusReport {
        environment: resolved.environment,
        resource_group: resolved.resource_group.clone(),
        group_present: checked.group_present,
        entries,
    })
}
