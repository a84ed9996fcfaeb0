// src/orchestrator/request.rs

//! Request records for each flow.
//!
//! Every field is optional at this level so that absent and empty values
//! are reported the same way, as a missing required field.

use serde::Deserialize;

/// Test Connection input.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub ip_address: Option<String>,
    #[serde(alias = "bridgeToolPath")]
    pub sdb_path: Option<String>,
    #[serde(alias = "sdkToolPath")]
    pub tizen_path: Option<String>,
}

/// Generate Package and Debug input.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageRequest {
    pub project_path: Option<String>,
    #[serde(alias = "sdkToolPath")]
    pub tizen_path: Option<String>,
}

/// Full Run input.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub project_path: Option<String>,
    #[serde(alias = "sdkToolPath")]
    pub tizen_path: Option<String>,
    #[serde(alias = "bridgeToolPath")]
    pub sdb_path: Option<String>,
    pub ip_address: Option<String>,
}

/// Upload & Deploy input. Built from a multipart form or a local file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployRequest {
    pub ip_address: Option<String>,
    pub sdb_path: Option<String>,
    pub tizen_path: Option<String>,
    pub file_name: Option<String>,
    pub file: Option<Vec<u8>>,
}

/// Collects missing required fields in the order they are checked.
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    /// Returns the trimmed value, or records `name` as missing.
    pub(crate) fn take(&mut self, name: &'static str, value: Option<&str>) -> String {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    pub(crate) fn mark_missing(&mut self, name: &'static str) {
        self.missing.push(name);
    }

    /// `Err` lists every missing field.
    pub(crate) fn finish(self) -> Result<(), Vec<&'static str>> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(self.missing)
        }
    }
}

/// A request's own value wins; otherwise the configured fallback.
pub(crate) fn or_fallback<'a>(value: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .or(fallback.as_deref())
}
