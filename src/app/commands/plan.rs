use std::collections::BTreeSet;

use crate::app::commands::StateLedger;
use crate::app::commands::preflight;
use crate::domain::{Action, AppError, Plan, PlanStep, ResolvedManifest, Role};
use crate::ports::ControlPlane;

/// Build the ordered plan for `action` from live state recorded in `ledger`.
pub fn build<C: ControlPlane>(
    cloud: &C,
    resolved: &ResolvedManifest,
    action: Action,
    selection: Option<&BTreeSet<Role>>,
    ledger: &mut StateLedger,
) -> Result<Plan, AppError> {
    let order = match action {
        Action::Apply => resolved.creation_order(selection)?,
        Action::Destroy => resolved.teardown_order(selection)?,
    };

    let mut plan = Plan::new(resolved.environment, resolved.resource_group.clone(), action);
    plan.create_group = action == Action::Apply && !ledger.group_present();

    let operation = action.operation();
    for role in &order {
        let Some(resource) = resolved.resource(role) else { continue };
        let state = ledger.state(cloud, &resource.descriptor)?;
        plan.steps.push(PlanStep::new(
            resource.descriptor.clone(),
            operation,
            state,
            resource.critical,
        ));
    }
    Ok(plan)
}

/// Read-only preview: authenticate, look up live state, build the plan.
pub fn execute<C: ControlPlane>(
    cloud: &C,
    resolved: &ResolvedManifest,
    action: Action,
    selection: Option<&BTreeSet<Role>>,
) -> Result<Plan, AppError> {
    let checked = preflight::check(cloud, resolved)?;
    let mut ledger = StateLedger::new(checked.group_present);
    build(cloud, resolved, action, selection, &mut ledger)
}
