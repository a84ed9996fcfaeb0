// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked `ConfigFile`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the configuration for a run.
///
/// - An explicitly given path must exist and be valid.
/// - Without one, `Tvdeploy.toml` in the working directory is used if it
///   exists; otherwise built-in defaults apply.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_and_validate(&path)
            } else {
                debug!(path = %path.display(), "no config file found; using defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Tvdeploy.toml")
}
