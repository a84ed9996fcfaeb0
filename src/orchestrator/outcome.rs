// src/orchestrator/outcome.rs

//! The terminal value of every flow.

use serde::Serialize;

use crate::pipeline::{StepFailure, StepLog};
use crate::project::ProjectValidation;

/// How a flow ended; the transport maps this to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    /// Rejected before any external tool ran.
    Invalid,
    /// An external step failed.
    StepFailed,
    /// Something inside tvdeploy went wrong.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentData {
    pub ip_address: String,
    pub file_name: String,
    pub saved_file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageData {
    pub package_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunData {
    pub package_path: String,
    pub package_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutcomeData {
    Deployment(DeploymentData),
    Package(PackageData),
    Run(RunData),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    #[serde(skip)]
    pub kind: OutcomeKind,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OutcomeData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "StepLog::is_empty")]
    pub logs: StepLog,
}

impl PipelineOutcome {
    fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            success: kind == OutcomeKind::Success,
            message: message.into(),
            details: None,
            project_path: None,
            data: None,
            error: None,
            logs: StepLog::new(),
        }
    }

    pub fn success(message: impl Into<String>, logs: StepLog) -> Self {
        Self {
            logs,
            ..Self::new(OutcomeKind::Success, message)
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Invalid, message)
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        let label = if fields.len() == 1 { "field" } else { "fields" };
        Self::invalid(format!("Missing required {label}: {}", fields.join(", ")))
    }

    pub fn invalid_project(project_path: &str, validation: &ProjectValidation) -> Self {
        Self {
            details: Some(format!(
                "Missing required files: {}",
                validation.missing_files.join(", ")
            )),
            project_path: Some(project_path.to_string()),
            ..Self::invalid("Invalid Tizen project structure")
        }
    }

    pub fn step_failed(failure: &StepFailure, logs: StepLog) -> Self {
        Self {
            logs,
            ..Self::new(OutcomeKind::StepFailed, failure.message.clone())
        }
    }

    pub fn internal(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(OutcomeKind::Internal, message)
        }
    }

    pub fn with_data(mut self, data: OutcomeData) -> Self {
        self.data = Some(data);
        self
    }
}
