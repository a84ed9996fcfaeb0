// src/project.rs

//! Project Validator: does a directory look like a TV web project?

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::fs::FileSystem;

/// Marker files a project must contain, in reporting order.
pub const REQUIRED_FILES: [&str; 3] = ["config.xml", "index.html", ".tproject"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectValidation {
    pub is_valid: bool,
    pub missing_files: Vec<String>,
}

/// Check `project_path` for every entry of [`REQUIRED_FILES`].
///
/// Missing entries are reported in declared order, not filesystem order.
pub fn validate_project(fs: &dyn FileSystem, project_path: &Path) -> ProjectValidation {
    info!(project = %project_path.display(), "validating project structure");

    let missing_files: Vec<String> = REQUIRED_FILES
        .iter()
        .filter(|file| {
            let full = project_path.join(file);
            let exists = fs.exists(&full);
            debug!(file, path = %full.display(), exists, "checked project marker");
            !exists
        })
        .map(|file| file.to_string())
        .collect();

    if !missing_files.is_empty() {
        info!(?missing_files, "project is missing required files");
    }

    ProjectValidation {
        is_valid: missing_files.is_empty(),
        missing_files,
    }
}
