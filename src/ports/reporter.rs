use crate::app::commands::StepOutcome;
use crate::domain::PlanStep;

/// Port for progress reporting while a run executes.
pub trait Reporter {
    /// A step is about to touch the provider (or would, in a dry run).
    fn step_started(&self, step: &PlanStep);

    fn step_finished(&self, outcome: &StepOutcome);

    /// Free-form status line.
    fn notice(&self, message: &str);
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn step_started(&self, _step: &PlanStep) {}

    fn step_finished(&self, _outcome: &StepOutcome) {}

    fn notice(&self, _message: &str) {}
}
