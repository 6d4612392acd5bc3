use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AppError, ResourceDescriptor, ResourceState};
use crate::ports::ControlPlane;

/// Effective state of resources during one run.
///
/// Live state is queried once per resource and then overlaid with the
/// transitions this run has made (or, in a dry run, would have made), so
/// later gates see the result of earlier steps.
#[derive(Debug, Default)]
pub struct StateLedger {
    group_present: bool,
    states: BTreeMap<String, ResourceState>,
    removed: BTreeSet<String>,
}

impl StateLedger {
    pub fn new(group_present: bool) -> Self {
        Self { group_present, ..Self::default() }
    }

    pub fn group_present(&self) -> bool {
        self.group_present
    }

    /// Record that the resource group now exists.
    pub fn mark_group_present(&mut self) {
        self.group_present = true;
    }

    /// Effective state of `resource`. Nothing can exist in an absent group, so
    /// the provider is not asked in that case.
    pub fn state<C: ControlPlane>(
        &mut self,
        cloud: &C,
        resource: &ResourceDescriptor,
    ) -> Result<ResourceState, AppError> {
        if let Some(state) = self.states.get(&resource.role) {
            return Ok(*state);
        }
        let state = if self.group_present { cloud.state(resource)? } else { ResourceState::Absent };
        self.states.insert(resource.role.clone(), state);
        Ok(state)
    }

    pub fn record(&mut self, resource: &ResourceDescriptor, state: ResourceState) {
        if state == ResourceState::Absent {
            self.removed.insert(resource.name.clone());
        } else {
            self.removed.remove(&resource.name);
        }
        self.states.insert(resource.role.clone(), state);
    }

    /// Whether a resource with provider name `name` was deleted during this run.
    pub fn was_removed(&self, name: &str) -> bool {
        self.removed.contains(name)
    }
}
