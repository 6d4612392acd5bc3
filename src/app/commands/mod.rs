//! Command implementations.
//!
//! Each submodule exposes an `execute` entry point generic over the ports it
//! needs, so the same code runs against the `az` CLI and the in-memory fake.

pub mod apply;
pub mod destroy;
pub mod init;
pub mod names;
pub mod plan;
pub mod preflight;
pub mod status;
pub mod validate;

mod execution;
mod ledger;
mod outcome;

pub use execution::RunOptions;
pub use ledger::StateLedger;
pub use outcome::{RunOutcome, StepOutcome, StepStatus};
