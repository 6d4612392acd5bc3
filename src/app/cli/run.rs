//! Mutating commands: apply and destroy.

use std::io::{ErrorKind, IsTerminal};

use colored::*;
use dialoguer::{Confirm, Error as DialoguerError};

use super::report::{ConsoleReporter, print_plan, print_summary};
use crate::app::api;
use crate::app::commands::{RunOptions, RunOutcome};
use crate::app::config::Scope;
use crate::domain::{Action, AppError, Plan};

pub fn run_apply(scope: &Scope, yes: bool, dry_run: bool, create_group: bool) -> Result<i32, AppError> {
    let options = RunOptions { dry_run, create_group };
    let outcome =
        api::apply(scope, options, ConsoleReporter, |plan| confirm(plan, yes, create_group))?;
    finish(&outcome)
}

pub fn run_destroy(scope: &Scope, yes: bool, dry_run: bool) -> Result<i32, AppError> {
    let options = RunOptions { dry_run, create_group: false };
    let outcome = api::destroy(scope, options, ConsoleReporter, |plan| confirm(plan, yes, false))?;
    finish(&outcome)
}

fn finish(outcome: &RunOutcome) -> Result<i32, AppError> {
    if outcome.declined {
        println!("Cancelled; nothing was changed.");
        return Ok(0);
    }
    print_summary(outcome);
    match &outcome.aborted_at {
        Some(role) => Err(AppError::Aborted { role: role.clone() }),
        None => Ok(0),
    }
}

/// Show the plan and ask before changing anything. Without a terminal and
/// without `--yes`, the answer is no.
fn confirm(plan: &Plan, yes: bool, create_group: bool) -> Result<bool, AppError> {
    print_plan(plan, create_group);
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        println!("{}", "Not running interactively; pass --yes to proceed.".yellow());
        return Ok(false);
    }

    let verb = match plan.action {
        Action::Apply => "Create",
        Action::Destroy => "Delete",
    };
    let prompt = format!(
        "{} {} resource(s) in {}?",
        verb,
        plan.pending_count(),
        plan.resource_group
    );
    match Confirm::new().with_prompt(prompt).default(false).interact() {
        Ok(answer) => Ok(answer),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(false),
        Err(err) => Err(AppError::config_error(format!("Failed to read confirmation: {}", err))),
    }
}
