// src/config/validate.rs

use std::net::SocketAddr;
use std::time::Duration;

use crate::config::model::{
    default_upload_dir, ConfigFile, ExecSection, RawConfigFile, ServerSection, ToolsSection,
};
use crate::errors::{Result, TvdeployError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TvdeployError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let server = validate_server(&raw)?;
        validate_tools(&raw.tools)?;
        let exec = validate_exec(&raw)?;
        Ok(ConfigFile::new_unchecked(server, raw.tools, raw.connect, exec))
    }
}

fn validate_server(cfg: &RawConfigFile) -> Result<ServerSection> {
    let bind: SocketAddr = cfg.server.bind.trim().parse().map_err(|e| {
        TvdeployError::ConfigError(format!(
            "[server].bind '{}' is not a socket address: {}",
            cfg.server.bind, e
        ))
    })?;

    if cfg.server.max_upload_bytes == 0 {
        return Err(TvdeployError::ConfigError(
            "[server].max_upload_bytes must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(ServerSection {
        bind,
        upload_dir: cfg
            .server
            .upload_dir
            .clone()
            .unwrap_or_else(default_upload_dir),
        max_upload_bytes: cfg.server.max_upload_bytes,
    })
}

fn validate_tools(tools: &ToolsSection) -> Result<()> {
    for (key, value) in [("bridge_path", &tools.bridge_path), ("sdk_path", &tools.sdk_path)] {
        if let Some(path) = value {
            if path.trim().is_empty() {
                return Err(TvdeployError::ConfigError(format!(
                    "[tools].{key} must not be empty when set"
                )));
            }
        }
    }
    Ok(())
}

fn validate_exec(cfg: &RawConfigFile) -> Result<ExecSection> {
    let timeout = match cfg.exec.timeout.as_deref() {
        None => None,
        Some(s) => {
            let d = parse_duration(s).map_err(|e| {
                TvdeployError::ConfigError(format!("[exec].timeout: {e}"))
            })?;
            if d.is_zero() {
                return Err(TvdeployError::ConfigError(
                    "[exec].timeout must be greater than zero".to_string(),
                ));
            }
            Some(d)
        }
    };
    Ok(ExecSection { timeout })
}

/// Parse durations like `"500ms"`, `"30s"`, `"10m"`, `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}
