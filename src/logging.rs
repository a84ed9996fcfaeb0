// src/logging.rs

//! `tracing` subscriber setup.
//!
//! The filter comes from, in order:
//! 1. `--log-level`, applied to tvdeploy and the HTTP trace layer;
//! 2. `TVDEPLOY_LOG`, a full `EnvFilter` directive string
//!    (e.g. `"tvdeploy=debug,tower_http=info"`);
//! 3. `info` for tvdeploy and the HTTP trace layer, `warn` for everything else.
//!
//! Output goes to stderr. One-shot commands print their JSON outcome on
//! stdout, so the two never interleave.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "TVDEPLOY_LOG";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return directives_for(level_from_log_level(lvl));
    }

    match std::env::var(LOG_ENV) {
        Ok(raw) => match parse_level_str(&raw) {
            Some(level) => directives_for(level),
            None => EnvFilter::try_new(raw.trim())
                .unwrap_or_else(|_| directives_for(tracing::Level::INFO)),
        },
        Err(_) => directives_for(tracing::Level::INFO),
    }
}

fn directives_for(level: tracing::Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::new(format!("warn,tvdeploy={level},tower_http={level}"))
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Bare level names; anything else is treated as a directive string.
pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
