//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together manifest
//! loading, context creation and command execution against the `az` CLI.

use std::path::Path;

use crate::app::commands::init::{InitOptions, InitOutcome};
use crate::app::commands::names::NameEntry;
use crate::app::commands::status::StatusReport;
use crate::app::commands::validate::ValidationReport;
use crate::app::commands::{RunOptions, RunOutcome, apply, destroy, init, names, plan, status, validate};
use crate::app::config::{Scope, collect_variables, manifest_dir};
use crate::app::AppContext;
use crate::domain::{Action, AppError, Environment, Manifest, Overrides, Plan, RenderMode};
use crate::ports::Reporter;
use crate::services::AzCliAdapter;

pub use crate::app::config::VAR_ENV_PREFIX;

fn cloud_for(scope: &Scope) -> AzCliAdapter {
    AzCliAdapter::from_env().in_dir(&scope.base_dir())
}

// =============================================================================
// Offline commands
// =============================================================================

/// Scaffold a manifest and parameter files.
pub fn init(options: &InitOptions) -> Result<InitOutcome, AppError> {
    init::execute(options)
}

/// Resolved provider names for the scope's environment, or for every
/// environment when `all_environments` is set.
pub fn names(scope: &Scope, all_environments: bool) -> Result<Vec<NameEntry>, AppError> {
    let environments = if all_environments {
        Environment::ALL.to_vec()
    } else {
        vec![Environment::parse(&scope.environment)?]
    };
    let manifest = Manifest::load(&scope.manifest)?;
    names::execute(&manifest, &environments, &scope.overrides(RenderMode::Lenient)?)
}

/// Check the manifest for every environment without contacting the provider.
pub fn validate(manifest: &Path, variables: &[String]) -> Result<ValidationReport, AppError> {
    let parsed = Manifest::load(manifest)?;
    let overrides = Overrides {
        variables: collect_variables(std::env::vars(), variables)?,
        ..Overrides::default()
    };
    validate::execute(&parsed, &manifest_dir(manifest), &overrides)
}

// =============================================================================
// Provider commands
// =============================================================================

/// Preview what `apply` (or `destroy`) would do.
pub fn plan(scope: &Scope, action: Action) -> Result<Plan, AppError> {
    let loaded = scope.load(RenderMode::Lenient)?;
    plan::execute(&cloud_for(scope), &loaded.resolved, action, loaded.selection())
}

/// Live state of every selected resource.
pub fn status(scope: &Scope) -> Result<StatusReport, AppError> {
    let loaded = scope.load(RenderMode::Lenient)?;
    status::execute(&cloud_for(scope), &loaded.resolved, loaded.selection())
}

/// Create missing resources. Property templates must fully resolve.
pub fn apply<R, F>(
    scope: &Scope,
    options: RunOptions,
    reporter: R,
    confirm: F,
) -> Result<RunOutcome, AppError>
where
    R: Reporter,
    F: FnOnce(&Plan) -> Result<bool, AppError>,
{
    let loaded = scope.load(RenderMode::Strict)?;
    let ctx = AppContext::new(cloud_for(scope), reporter);
    apply::execute(&ctx, &loaded.resolved, loaded.selection(), options, confirm)
}

/// Delete present resources in teardown order.
pub fn destroy<R, F>(
    scope: &Scope,
    options: RunOptions,
    reporter: R,
    confirm: F,
) -> Result<RunOutcome, AppError>
where
    R: Reporter,
    F: FnOnce(&Plan) -> Result<bool, AppError>,
{
    let loaded = scope.load(RenderMode::Lenient)?;
    let ctx = AppContext::new(cloud_for(scope), reporter);
    destroy::execute(&ctx, &loaded.resolved, loaded.selection(), options, confirm)
}
