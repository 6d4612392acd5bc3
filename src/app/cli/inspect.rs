//! Read-only commands: names, plan and status.

use colored::*;

use super::report::{print_plan, state_label};
use crate::app::api;
use crate::app::config::Scope;
use crate::domain::{Action, AppError};

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run_names(scope: &Scope, all_environments: bool, json: bool) -> Result<(), AppError> {
    let entries = api::names(scope, all_environments)?;
    if json {
        return print_json(&entries);
    }

    let mut current = None;
    for entry in &entries {
        if current != Some(entry.environment) {
            println!("{} ({})", entry.environment.to_string().bold(), entry.resource_group.cyan());
            current = Some(entry.environment);
        }
        println!("  {:<16} {:<24} {}", entry.role, entry.kind.to_string().dimmed(), entry.name);
    }
    Ok(())
}

pub fn run_plan(scope: &Scope, destroy: bool, json: bool) -> Result<(), AppError> {
    let action = if destroy { Action::Destroy } else { Action::Apply };
    let plan = api::plan(scope, action)?;
    if json {
        return print_json(&plan);
    }
    print_plan(&plan, false);
    Ok(())
}

pub fn run_status(scope: &Scope, json: bool) -> Result<(), AppError> {
    let report = api::status(scope)?;
    if json {
        return print_json(&report);
    }

    let group = if report.group_present { "present".green() } else { "absent".red() };
    println!(
        "{} {} resource group {} ({})",
        "Status".bold(),
        report.environment.to_string().cyan(),
        report.resource_group,
        group
    );
    for entry in &report.entries {
        println!("  {:<8} {}", state_label(entry.state), entry.descriptor);
    }
    println!("{}/{} present", report.present_count(), report.entries.len());
    Ok(())
}
