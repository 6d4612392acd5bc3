//! CLI Adapter.

mod init;
mod inspect;
mod report;
mod run;
mod validate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::config::Scope;
use crate::domain::{AppError, ErrorCategory, MANIFEST_FILE};

#[derive(Parser)]
#[command(name = "azprov")]
#[command(version)]
#[command(
    about = "Provision and tear down an application's Azure resources from one manifest",
    long_about = None
)]
struct Cli {
    /// Path to the manifest
    #[arg(short, long, global = true, env = "AZPROV_MANIFEST", default_value = MANIFEST_FILE)]
    manifest: PathBuf,
    /// Log every provider call (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Environment selection shared by provider-facing commands.
#[derive(Args, Debug, Clone)]
struct ScopeArgs {
    /// Target environment (dev, uat, prod)
    #[arg(short, long)]
    environment: String,
    /// Resource group override
    #[arg(short = 'g', long)]
    resource_group: Option<String>,
    /// Subscription id or name to select before running
    #[arg(short, long)]
    subscription: Option<String>,
    /// Limit to these roles or groups (repeatable)
    #[arg(short, long = "target")]
    targets: Vec<String>,
    /// Template variable as KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    variables: Vec<String>,
}

impl ScopeArgs {
    fn into_scope(self, manifest: PathBuf) -> Scope {
        Scope {
            manifest,
            environment: self.environment,
            resource_group: self.resource_group,
            subscription: self.subscription,
            targets: self.targets,
            variables: self.variables,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a manifest and per-environment parameter files
    Init {
        /// Application base name, e.g. bo-gpsc-reports
        #[arg(short, long)]
        base_name: String,
        /// Default Azure region
        #[arg(short, long, default_value = "canadacentral")]
        location: String,
        /// Overwrite an existing manifest
        #[arg(short, long)]
        force: bool,
    },
    /// Print resolved resource names without contacting Azure
    #[clap(visible_alias = "n")]
    Names {
        /// Target environment (dev, uat, prod)
        #[arg(short, long, required_unless_present = "all_environments")]
        environment: Option<String>,
        /// Print names for every environment
        #[arg(short, long, conflicts_with = "environment")]
        all_environments: bool,
        /// Resource group override
        #[arg(short = 'g', long)]
        resource_group: Option<String>,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
    /// Check the manifest for every environment without contacting Azure
    Validate {
        /// Template variable as KEY=VALUE (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        variables: Vec<String>,
    },
    /// Show what apply (or destroy) would do
    #[clap(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Plan a teardown instead of a deployment
        #[arg(long)]
        destroy: bool,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
    /// Show whether each resource exists
    #[clap(visible_alias = "st")]
    Status {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
    /// Create missing resources, dependencies first
    Apply {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Report what would change without changing anything
        #[arg(short, long)]
        dry_run: bool,
        /// Create the resource group if it does not exist
        #[arg(long)]
        create_group: bool,
    },
    /// Delete resources, dependents first. The resource group is kept
    Destroy {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Report what would change without changing anything
        #[arg(short, long)]
        dry_run: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "azprov=debug" } else { "azprov=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let manifest = cli.manifest;

    let result: Result<i32, AppError> = match cli.command {
        Commands::Init { base_name, location, force } => {
            init::run_init(&manifest, base_name, location, force).map(|_| 0)
        }
        Commands::Names { environment, all_environments, resource_group, json } => {
            let scope = Scope {
                manifest,
                environment: environment.unwrap_or_default(),
                resource_group,
                ..Scope::default()
            };
            inspect::run_names(&scope, all_environments, json).map(|_| 0)
        }
        Commands::Validate { variables } => validate::run_validate(&manifest, &variables),
        Commands::Plan { scope, destroy, json } => {
            inspect::run_plan(&scope.into_scope(manifest), destroy, json).map(|_| 0)
        }
        Commands::Status { scope, json } => {
            inspect::run_status(&scope.into_scope(manifest), json).map(|_| 0)
        }
        Commands::Apply { scope, yes, dry_run, create_group } => {
            run::run_apply(&scope.into_scope(manifest), yes, dry_run, create_group)
        }
        Commands::Destroy { scope, yes, dry_run } => {
            run::run_destroy(&scope.into_scope(manifest), yes, dry_run)
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.category() == ErrorCategory::Precondition {
                eprintln!("No changes were made.");
            }
            std::process::exit(1);
        }
    }
}
