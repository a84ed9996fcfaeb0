// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! External tool failures are not errors here: they travel as
//! `CommandResult` / `PipelineOutcome` values. This type covers config
//! problems and internal failures (filesystem, upload persistence, ...).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TvdeployError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TvdeployError>;
