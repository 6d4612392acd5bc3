pub mod adapters;
pub mod scaffold_assets;

pub use adapters::{AZ_BIN_ENV, AzCliAdapter};
