use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, BaseName, MANIFEST_FILE, Manifest};
use crate::services::scaffold_assets::render_scaffold;

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub dir: PathBuf,
    pub base_name: String,
    pub location: String,
    pub force: bool,
}

#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub manifest: PathBuf,
    pub created: Vec<String>,
}

/// Write the starter manifest and parameter files into `options.dir`.
pub fn execute(options: &InitOptions) -> Result<InitOutcome, AppError> {
    let base_name = BaseName::new(&options.base_name)?;
    if options.location.trim().is_empty() {
        return Err(AppError::config_error("location must not be empty"));
    }

    let manifest_path = options.dir.join(MANIFEST_FILE);
    if manifest_path.exists() && !options.force {
        return Err(AppError::ManifestExists(manifest_path.display().to_string()));
    }

    let files = render_scaffold(&base_name, &options.location)?;
    if let Some(manifest) = files.iter().find(|file| file.path == MANIFEST_FILE) {
        Manifest::from_toml_str(&manifest.content)?;
    }

    let mut created = Vec::new();
    for file in files {
        write_file(&options.dir, &file.path, &file.content)?;
        created.push(file.path);
    }
    tracing::info!(dir = %options.dir.display(), files = created.len(), "scaffold written");

    Ok(InitOutcome { manifest: manifest_path, created })
}

fn write_file(root: &Path, relative: &str, content: &str) -> Result<(), AppError> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
