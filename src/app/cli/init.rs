//! Init command implementation.

use std::path::Path;

use crate::app::api;
use crate::app::commands::init::InitOptions;
use crate::app::config::manifest_dir;
use crate::domain::AppError;

pub fn run_init(manifest: &Path, base_name: String, location: String, force: bool) -> Result<(), AppError> {
    let options = InitOptions { dir: manifest_dir(manifest), base_name, location, force };
    let outcome = api::init(&options)?;
    println!("✅ Initialized {}", outcome.manifest.display());
    for file in &outcome.created {
        println!("  • {}", file);
    }
    Ok(())
}
