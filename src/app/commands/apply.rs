use std::collections::BTreeSet;

use crate::app::AppContext;
use crate::app::commands::execution::run_steps;
use crate::app::commands::{RunOptions, RunOutcome, StateLedger, plan, preflight};
use crate::domain::{Action, AppError, Plan, ResolvedManifest, Role};
use crate::ports::{ControlPlane, Reporter};

/// Bring every selected resource to Present, dependencies first.
///
/// `confirm` sees the plan before anything is changed and is skipped for dry
/// runs and no-op plans. Returning `false` leaves the environment untouched.
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
    preflight::require_group(&checked, resolved, options.create_group)?;

    let mut ledger = StateLedger::new(checked.group_present);
    let plan = plan::build(cloud, resolved, Action::Apply, selection, &mut ledger)?;
    let mut outcome = RunOutcome::new(&plan, options.dry_run);

    if plan.is_noop() {
        ctx.reporter().notice("Everything is already present");
    } else if !options.dry_run && !confirm(&plan)? {
        outcome.declined = true;
        return Ok(outcome);
    }

    if plan.create_group {
        if !options.dry_run {
            cloud.create_group(&resolved.resource_group, &resolved.location)?;
        }
        let done = if options.dry_run { "would be created" } else { "created" };
        ctx.reporter().notice(&format!("Resource group {} {}", resolved.resource_group, done));
        outcome.group_created = !options.dry_run;
        ledger.mark_group_present();
    }

    run_steps(ctx, resolved, &plan, &mut ledger, &mut outcome)?;
    Ok(outcome)
}
