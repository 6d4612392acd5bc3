use std::fmt;

use serde::Serialize;

use crate::domain::{Action, Environment, Operation, Plan, PlanStep, ResourceDescriptor};

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum StepStatus {
    /// The provider call succeeded.
    Done,
    /// Dry run: the step passed its gate and would have been executed.
    Planned,
    /// Target state already held.
    Skipped(String),
    Failed(String),
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Done => f.write_str("done"),
            StepStatus::Planned => f.write_str("planned"),
            StepStatus::Skipped(reason) => write!(f, "skipped ({})", reason),
            StepStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub descriptor: ResourceDescriptor,
    pub operation: Operation,
    pub critical: bool,
    #[serde(flatten)]
    pub status: StepStatus,
}

impl StepOutcome {
    pub fn new(step: &PlanStep, status: StepStatus) -> Self {
        Self {
            descriptor: step.descriptor.clone(),
            operation: step.operation,
            critical: step.critical,
            status,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, StepStatus::Failed(_))
    }
}

/// Summary of an apply or destroy run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub action: Action,
    pub environment: Environment,
    pub resource_group: String,
    pub dry_run: bool,
    /// The operator declined the confirmation prompt; nothing was changed.
    pub declined: bool,
    pub group_created: bool,
    pub steps: Vec<StepOutcome>,
    /// Role of the critical step that stopped the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<String>,
}

impl RunOutcome {
    pub fn new(plan: &Plan, dry_run: bool) -> Self {
        Self {
            action: plan.action,
            environment: plan.environment,
            resource_group: plan.resource_group.clone(),
            dry_run,
            declined: false,
            group_created: false,
            steps: Vec::new(),
            aborted_at: None,
        }
    }

    pub fn changed(&self) -> usize {
        self.steps.iter().filter(|s| s.status == StepStatus::Done).count()
    }

    pub fn planned(&self) -> usize {
        self.steps.iter().filter(|s| s.status == StepStatus::Planned).count()
    }

    pub fn skipped(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s.status, StepStatus::Skipped(_))).count()
    }

    /// Non-critical failures the run continued past.
    pub fn warnings(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.is_failure() && !s.critical)
    }

    pub fn is_success(&self) -> bool {
        self.aborted_at.is_none()
    }
}
