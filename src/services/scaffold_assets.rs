//! Embedded `azprov init` scaffold.

use include_dir::{Dir, DirEntry, include_dir};
use minijinja::{Environment, UndefinedBehavior, Value, context};
use std::path::Path;

use crate::domain::{AppError, BaseName};

static SCAFFOLD_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/scaffold");

/// A file to write, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: String,
    pub content: String,
}

/// Render the scaffold for `base_name` in `location`, sorted by path.
pub fn render_scaffold(base_name: &BaseName, location: &str) -> Result<Vec<ScaffoldFile>, AppError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    let ctx = context! {
        base_name => base_name.as_str(),
        location => location,
    };

    let mut files = Vec::new();
    collect_and_render_files(&SCAFFOLD_DIR, SCAFFOLD_DIR.path(), &mut files, &env, &ctx)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));

    if files.is_empty() {
        return Err(AppError::config_error("Scaffold assets are empty"));
    }
    Ok(files)
}

fn collect_and_render_files(
    dir: &Dir,
    base_path: &Path,
    files: &mut Vec<ScaffoldFile>,
    env: &Environment,
    ctx: &Value,
) -> Result<(), AppError> {
    for entry in dir.entries() {
        match entry {
            DirEntry::File(file) => {
                let file_path = file.path();
                let content = file.contents_utf8().ok_or_else(|| {
                    AppError::config_error(format!(
                        "Scaffold file is not UTF-8: {}",
                        file_path.display()
                    ))
                })?;
                let relative = file_path.strip_prefix(base_path).unwrap_or(file_path);
                let relative = relative.to_string_lossy();

                let (path, content) = match relative.strip_suffix(".j2") {
                    Some(output) => {
                        let rendered = env.render_str(content, ctx).map_err(|e| {
                            AppError::config_error(format!(
                                "Failed to render scaffold template '{}': {}",
                                relative, e
                            ))
                        })?;
                        (output.to_string(), rendered)
                    }
                    None => (relative.to_string(), content.to_string()),
                };
                files.push(ScaffoldFile { path, content });
            }
            DirEntry::Dir(subdir) => collect_and_render_files(subdir, base_path, files, env, ctx)?,
        }
    }
    Ok(())
}
