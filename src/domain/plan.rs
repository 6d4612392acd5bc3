use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Environment, ResourceDescriptor, ResourceState};

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Apply,
    Destroy,
}

impl Action {
    pub fn operation(&self) -> Operation {
        match self {
            Action::Apply => Operation::Create,
            Action::Destroy => Operation::Delete,
        }
    }
}

/// Transition attempted on a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Delete,
}

impl Operation {
    /// State the resource must already be in for the step to be a no-op.
    pub fn satisfied_by(&self, state: ResourceState) -> bool {
        match self {
            Operation::Create => state == ResourceState::Present,
            Operation::Delete => state == ResourceState::Absent,
        }
    }

    /// State reached after the operation succeeds.
    pub fn target_state(&self) -> ResourceState {
        match self {
            Operation::Create => ResourceState::Present,
            Operation::Delete => ResourceState::Absent,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
        })
    }
}

/// Whether a planned step will touch the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", content = "reason", rename_all = "lowercase")]
pub enum Disposition {
    Execute,
    Skip(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanStep {
    pub descriptor: ResourceDescriptor,
    pub operation: Operation,
    pub state: ResourceState,
    pub critical: bool,
    #[serde(flatten)]
    pub disposition: Disposition,
}

impl PlanStep {
    pub fn new(
        descriptor: ResourceDescriptor,
        operation: Operation,
        state: ResourceState,
        critical: bool,
    ) -> Self {
        let disposition = if operation.satisfied_by(state) {
            Disposition::Skip(format!("already {}", state))
        } else {
            Disposition::Execute
        };
        Self { descriptor, operation, state, critical, disposition }
    }

    pub fn is_pending(&self) -> bool {
        self.disposition == Disposition::Execute
    }
}

/// Ordered list of steps for one environment.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub environment: Environment,
    pub resource_group: String,
    pub action: Action,
    /// Set when the resource group itself is absent and will be created first.
    pub create_group: bool,
    pub generated_at: DateTime<Utc>,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(environment: Environment, resource_group: String, action: Action) -> Self {
        Self {
            environment,
            resource_group,
            action,
            create_group: false,
            generated_at: Utc::now(),
            steps: Vec::new(),
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter().filter(|step| step.is_pending())
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    /// Nothing to do: every step is already satisfied.
    pub fn is_noop(&self) -> bool {
        self.pending_count() == 0 && !self.create_group
    }
}
