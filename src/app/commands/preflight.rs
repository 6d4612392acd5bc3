//! Precondition checks run before any provider mutation.

use crate::app::commands::StateLedger;
use crate::domain::{AppError, ResolvedManifest, Role};
use crate::ports::{Account, ControlPlane};

/// What the environment checks established.
#[derive(Debug, Clone)]
pub struct Preflight {
    pub account: Account,
    pub group_present: bool,
}

/// Authentication, subscription selection and resource group lookup.
pub fn check<C: ControlPlane>(
    cloud: &C,
    resolved: &ResolvedManifest,
) -> Result<Preflight, AppError> {
    let account = cloud.account()?;
    if let Some(subscription) = &resolved.subscription {
        cloud.select_subscription(subscription)?;
    }
    let group_present = cloud.group_exists(&resolved.resource_group)?;
    tracing::info!(
        subscription = %account.name,
        resource_group = %resolved.resource_group,
        group_present,
        "preflight complete"
    );
    Ok(Preflight { account, group_present })
}

/// A missing group is only acceptable when the caller asked for it to be created.
pub fn require_group(
    preflight: &Preflight,
    resolved: &ResolvedManifest,
    create_group: bool,
) -> Result<(), AppError> {
    if preflight.group_present || create_group {
        Ok(())
    } else {
        Err(AppError::ResourceGroupMissing(resolved.resource_group.clone()))
    }
}

/// Every dependency of `role` must be present before it is created.
pub fn gate_create<C: ControlPlane>(
    cloud: &C,
    resolved: &ResolvedManifest,
    ledger: &mut StateLedger,
    role: &Role,
) -> Result<(), AppError> {
    for dependency in resolved.graph.dependencies_of(role) {
        let Some(resource) = resolved.resource(dependency) else { continue };
        if !ledger.state(cloud, &resource.descriptor)?.is_present() {
            return Err(AppError::DependencyMissing {
                resource: role.to_string(),
                dependency: dependency.to_string(),
            });
        }
    }
    Ok(())
}

/// Refuse to delete `role` while anything still depends on it: manifest
/// dependents that are present, or resources the provider reports as
/// attached that this run has not already removed.
pub fn gate_delete<C: ControlPlane>(
    cloud: &C,
    resolved: &ResolvedManifest,
    ledger: &mut StateLedger,
    role: &Role,
) -> Result<(), AppError> {
    let mut blocking = Vec::new();
    for dependent in resolved.graph.dependents_of(role) {
        let Some(resource) = resolved.resource(dependent) else { continue };
        if ledger.state(cloud, &resource.descriptor)?.is_present() {
            blocking.push(resource.descriptor.name.clone());
        }
    }

    if let Some(resource) = resolved.resource(role) {
        for name in cloud.attached(&resource.descriptor)? {
            if !ledger.was_removed(&name) && !blocking.contains(&name) {
                blocking.push(name);
            }
        }
    }

    if blocking.is_empty() {
        Ok(())
    } else {
        Err(AppError::DependentsPresent { resource: role.to_string(), dependents: blocking.join(", ") })
    }
}
