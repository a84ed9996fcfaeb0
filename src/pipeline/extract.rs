// src/pipeline/extract.rs

//! Reading results out of free-form tool output.
//!
//! Each pattern has exactly one function here; the steps never match text
//! themselves.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::exec::CommandResult;
use crate::types::ConnectCheck;

static PACKAGE_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Package File Location: (.+\.wgt)").expect("valid regex"));

static INSTALLED_PACKAGE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Installed the package: Id\(([^)]+)\)").expect("valid regex"));

/// Path of the `.wgt` produced by `<sdk> package`.
pub fn extract_package_path(output: &str) -> Option<String> {
    PACKAGE_LOCATION
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Package identifier reported by `<sdk> install`.
pub fn extract_package_id(output: &str) -> Option<String> {
    INSTALLED_PACKAGE_ID
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Judge a `<bridge> connect <ip>` result.
pub fn connect_succeeded(result: &CommandResult, check: ConnectCheck) -> bool {
    match check {
        ConnectCheck::Loose => result.success,
        ConnectCheck::Strict => {
            result.success
                && result.error.is_empty()
                && result.output.contains("connected")
                && !result.output.contains("failed to connect")
        }
    }
}

/// Whether `<bridge> devices` output lists the target IP.
pub fn device_listed(output: &str, ip_address: &str) -> bool {
    output.lines().any(|line| line.contains(ip_address))
}
