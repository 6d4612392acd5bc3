use std::collections::BTreeSet;

use crate::app::AppContext;
use crate::app::commands::execution::run_steps;
use crate::app::commands::{RunOptions, RunOutcome, StateLedger, plan, preflight};
use crate::domain::{Action, AppError, Plan, ResolvedManifest, Role};
use crate::ports::{ControlPlane, Reporter};

/// Bring every selected resource to Absent, dependents first.
///
/// The resource group itself is never deleted.
pub fn execute<C, R, F>(
    ctx: &AppContext<C, R>,
    resolved: &ResolvedManifest,
    selection: Option<&BTreeSet<Role>>,
    options: RunOptions,
    confirm: F,
) -> Result<RunOutcome, AppError>
where
    C: ControlPlane,
    R: Reporter,
    F: FnOnce(&Plan) -> Result<bool, AppError>,
{
    let cloud = ctx.cloud();
    let checked = preflight::check(cloud, resolved)?;
    ctx.reporter().notice(&format!(
        "Subscription: {} ({})",
        checked.account.name, checked.account.id
    ));
    if !checked.group_present {
        ctx.reporter().notice(&format!(
            "Resource group {} does not exist; nothing to delete",
            resolved.resource_group
        ));
    }

    let mut ledger = StateLedger::new(checked.group_present);
    let plan = plan::build(cloud, resolved, Action::Destroy, selection, &mut ledger)?;
    let mut outcome = RunOutcome::new(&plan, options.dry_run);

    if plan.is_noop() {
        ctx.reporter().notice("Everything is already absent");
    } else if !options.dry_run && !confirm(&plan)? {
        outcome.declined = true;
        return Ok(outcome);
    }

    run_steps(ctx, resolved, &plan, &mut ledger, &mut outcome)?;
    Ok(outcome)
}
