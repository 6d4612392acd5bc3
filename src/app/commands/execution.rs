use crate::app::AppContext;
use crate::app::commands::{RunOutcome, StateLedger, StepOutcome, StepStatus, preflight};
use crate::domain::{AppError, Disposition, Operation, Plan, ResolvedManifest, Role};
use crate::ports::{ControlPlane, Reporter};

/// Flags shared by apply and destroy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Evaluate gates and report without mutating anything.
    pub dry_run: bool,
    /// Create the resource group when it is missing (apply only).
    pub create_group: bool,
}

/// Walk the plan in order. A failed critical step stops the run; a failed
/// non-critical step is recorded and the run continues. Nothing is rolled back.
pub(crate) fn run_steps<C: ControlPlane, R: Reporter>(
    ctx: &AppContext<C, R>,
    resolved: &ResolvedManifest,
    plan: &Plan,
    ledger: &mut StateLedger,
    outcome: &mut RunOutcome,
) -> Result<(), AppError> {
    let cloud = ctx.cloud();
    let reporter = ctx.reporter();

    for step in &plan.steps {
        if !step.is_pending() {
            let reason = match &step.disposition {
                Disposition::Skip(reason) => reason.clone(),
                Disposition::Execute => String::new(),
            };
            let finished = StepOutcome::new(step, StepStatus::Skipped(reason));
            reporter.step_finished(&finished);
            outcome.steps.push(finished);
            continue;
        }

        let role = Role::new(&step.descriptor.role)?;
        let resource = resolved.resource(&role).ok_or_else(|| {
            AppError::manifest(format!("plan names unknown role '{}'", step.descriptor.role))
        })?;

        reporter.step_started(step);
        let result = match step.operation {
            Operation::Create => preflight::gate_create(cloud, resolved, ledger, &role),
            Operation::Delete => preflight::gate_delete(cloud, resolved, ledger, &role),
        }
        .and_then(|()| {
            if outcome.dry_run {
                return Ok(StepStatus::Planned);
            }
            match step.operation {
                Operation::Create => cloud.create(resource),
                Operation::Delete => cloud.delete(resource),
            }
            .map(|()| StepStatus::Done)
        });

        let status = match result {
            Ok(status) => {
                ledger.record(&step.descriptor, step.operation.target_state());
                tracing::info!(role = %role, operation = %step.operation, %status, "step finished");
                status
            }
            Err(err) => {
                tracing::warn!(role = %role, operation = %step.operation, error = %err, "step failed");
                StepStatus::Failed(err.to_string())
            }
        };

        let finished = StepOutcome::new(step, status);
        reporter.step_finished(&finished);
        let abort = finished.is_failure() && step.critical;
        outcome.steps.push(finished);
        if abort {
            outcome.aborted_at = Some(role.to_string());
            break;
        }
    }
    Ok(())
}
