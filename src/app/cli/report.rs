//! Human-readable console output.

use colored::*;

use crate::app::commands::{RunOutcome, StepOutcome, StepStatus};
use crate::domain::{Action, Disposition, Plan, PlanStep, ResourceState};

/// Streams step progress to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl crate::ports::Reporter for ConsoleReporter {
    fn step_started(&self, step: &PlanStep) {
        println!("{} {} {}", "▸".cyan(), step.operation.to_string().cyan(), step.descriptor);
    }

    fn step_finished(&self, outcome: &StepOutcome) {
        match &outcome.status {
            StepStatus::Done => println!("  {} {}", "✓".green(), outcome.descriptor.name),
            StepStatus::Planned => {
                println!("  {} {} (dry run)", "○".cyan(), outcome.descriptor.name)
            }
            StepStatus::Skipped(reason) => println!(
                "  {}",
                format!("- {} {} ({})", outcome.operation, outcome.descriptor, reason).dimmed()
            ),
            StepStatus::Failed(reason) if outcome.critical => {
                println!("  {} {}", "✗".red(), reason.red())
            }
            StepStatus::Failed(reason) => {
                println!("  {} {}", "⚠️ ".yellow(), reason.yellow())
            }
        }
    }

    fn notice(&self, message: &str) {
        println!("{}", message.dimmed());
    }
}

/// `create_group` says whether the caller asked for a missing group to be created.
pub fn print_plan(plan: &Plan, create_group: bool) {
    let verb = match plan.action {
        Action::Apply => "Apply",
        Action::Destroy => "Destroy",
    };
    println!(
        "{} plan for {} in {}",
        verb.bold(),
        plan.environment.to_string().cyan(),
        plan.resource_group.cyan()
    );
    if plan.create_group {
        let note = if create_group { "" } else { " (needs --create-group)" };
        println!("  {} resource group {}{}", "+".green(), plan.resource_group, note.dimmed());
    }
    for step in &plan.steps {
        match &step.disposition {
            Disposition::Execute => {
                let marker = match plan.action {
                    Action::Apply => "+".green(),
                    Action::Destroy => "-".red(),
                };
                let tag = if step.critical { "" } else { " (non-critical)" };
                println!("  {} {}{}", marker, step.descriptor, tag.dimmed());
            }
            Disposition::Skip(reason) => {
                println!("  {}", format!("= {} ({})", step.descriptor, reason).dimmed());
            }
        }
    }
    println!(
        "{} to {}, {} unchanged",
        plan.pending_count(),
        match plan.action {
            Action::Apply => "create",
            Action::Destroy => "delete",
        },
        plan.steps.len() - plan.pending_count()
    );
}

pub fn state_label(state: ResourceState) -> ColoredString {
    match state {
        ResourceState::Present => "present".green(),
        ResourceState::Absent => "absent".dimmed(),
    }
}

pub fn print_summary(outcome: &RunOutcome) {
    for warning in outcome.warnings() {
        if let StepStatus::Failed(reason) = &warning.status {
            println!("{} {}: {}", "⚠️  Warning".yellow(), warning.descriptor.role, reason);
        }
    }

    if outcome.aborted_at.is_some() {
        println!("{} {} completed step(s) were kept", "✗".red(), outcome.changed());
        return;
    }

    let verb = match outcome.action {
        Action::Apply => "created",
        Action::Destroy => "deleted",
    };
    if outcome.dry_run {
        println!(
            "{} Dry run: {} would be {}, {} unchanged",
            "✅".green(),
            outcome.planned(),
            verb,
            outcome.skipped()
        );
    } else {
        println!(
            "{} {} {}, {} unchanged, {} warning(s)",
            "✅".green(),
            outcome.changed(),
            verb,
            outcome.skipped(),
            outcome.warnings().count()
        );
    }
}
