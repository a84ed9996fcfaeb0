// src/upload.rs

//! Persisting uploaded packages before they are installed.
//!
//! Files land in the configured upload directory as
//! `<unix-millis>-<original name>` and are never removed by tvdeploy.
//! Two uploads of the same name within the same millisecond collide.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{Result, TvdeployError};
use crate::fs::FileSystem;

/// Only `.wgt` archives are accepted.
pub fn is_package_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wgt"))
}

/// Strip any client-supplied directories and characters that have no
/// business in a file name.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "package.wgt".to_string()
    } else {
        cleaned
    }
}

pub fn upload_path(upload_dir: &Path, file_name: &str, timestamp_millis: i64) -> PathBuf {
    upload_dir.join(format!("{timestamp_millis}-{}", sanitize_file_name(file_name)))
}

/// Write `contents` under `upload_dir` and return where it went.
pub fn save_upload(
    fs: &dyn FileSystem,
    upload_dir: &Path,
    file_name: &str,
    contents: &[u8],
) -> Result<PathBuf> {
    let path = upload_path(upload_dir, file_name, chrono::Utc::now().timestamp_millis());

    fs.write(&path, contents).map_err(|e| {
        TvdeployError::Upload(format!("saving {} to {}: {:#}", file_name, path.display(), e))
    })?;

    info!(path = %path.display(), bytes = contents.len(), "saved uploaded package");
    Ok(path)
}
