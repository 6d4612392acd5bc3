//! azprov: provision and tear down an application's Azure resources, for
//! every environment, from a single declarative manifest.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;


pub use app::api::*;
pub use app::cli::run as run_cli;
pub use app::commands::init::{InitOptions, InitOutcome};
pub use app::commands::names::NameEntry;
pub use app::commands::status::{StatusEntry, StatusReport};
pub use app::commands::validate::{EnvironmentCheck, ValidationReport};
pub use app::commands::{RunOptions, RunOutcome, StepOutcome, StepStatus};
pub use app::config::Scope;
pub use domain::{Action, AppError, Environment, Plan};
pub use ports::{NoopReporter, Reporter};
