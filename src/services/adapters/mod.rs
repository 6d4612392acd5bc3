pub mod az_args;
mod az_command;

pub use az_command::{AZ_BIN_ENV, AzCliAdapter};
