//! Validate command implementation.

use std::path::Path;

use colored::*;

use crate::app::api;
use crate::domain::AppError;

pub fn run_validate(manifest: &Path, variables: &[String]) -> Result<i32, AppError> {
    let report = api::validate(manifest, variables)?;

    for check in &report.environments {
        let marker = if check.errors.is_empty() { "✓".green() } else { "✗".red() };
        println!("{} {} ({} resources)", marker, check.environment, check.resources);
        for error in &check.errors {
            println!("  {} {}", "error:".red(), error);
        }
        for warning in &check.warnings {
            println!("  {} {}", "warning:".yellow(), warning);
        }
    }

    if report.is_valid() {
        println!("✅ {} is valid", manifest.display());
        Ok(0)
    } else {
        println!("❌ {} error(s)", report.error_count());
        Ok(1)
    }
}
