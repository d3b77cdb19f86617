// ABOUTME: Writes a created project's spec, task list and package manifest to disk
// ABOUTME: Only runs when file creation is enabled; I/O failures are returned to the caller

use openspec_core::{OpenSpecError, Result, TemplateBundle};
use serde_json::json;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Reject names that would escape `root` or are not a single path component.
pub fn validate_project_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OpenSpecError::InvalidProjectName(
            "project name is empty".to_string(),
        ));
    }

    if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
        return Err(OpenSpecError::InvalidProjectName(format!(
            "'{}' must not contain path separators or '..'",
            name
        )));
    }

    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(OpenSpecError::InvalidProjectName(format!(
            "'{}' is not a plain directory name",
            name
        ))),
    }
}

/// npm package name: lower-cased, whitespace runs collapsed to `-`.
pub fn package_slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

pub fn package_manifest(project_name: &str) -> serde_json::Value {
    json!({
        "name": package_slug(project_name),
        "version": "1.0.0",
        "description": format!("OpenSpec项目: {}", project_name),
        "main": "src/index.js",
        "scripts": {
            "start": "node src/index.js",
            "dev": "nodemon src/index.js",
            "test": "jest"
        },
        "dependencies": {
            "express": "^4.18.0",
            "cors": "^2.8.5",
            "dotenv": "^16.0.0"
        },
        "devDependencies": {
            "nodemon": "^3.0.0",
            "jest": "^29.0.0"
        }
    })
}

/// Write `<root>/<project_name>/openspec/specs/{spec.md,tasks.md}` and
/// `<root>/<project_name>/package.json`. Returns the project directory.
pub async fn materialize(
    root: &Path,
    project_name: &str,
    bundle: &TemplateBundle,
) -> Result<PathBuf> {
    validate_project_name(project_name)?;

    let project_dir = root.join(project_name.trim());
    let specs_dir = project_dir.join("openspec").join("specs");
    fs::create_dir_all(&specs_dir).await?;

    fs::write(specs_dir.join("spec.md"), &bundle.spec_text).await?;
    fs::write(specs_dir.join("tasks.md"), &bundle.tasks_text).await?;

    let manifest = serde_json::to_string_pretty(&package_manifest(project_name))?;
    fs::write(project_dir.join("package.json"), manifest).await?;

    info!("📁 Project files written: {}", project_dir.display());
    Ok(project_dir)
}
