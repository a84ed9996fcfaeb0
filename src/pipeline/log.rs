// src/pipeline/log.rs

//! Per-step captured output, kept in execution order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::exec::CommandResult;
use crate::types::StepName;

/// What one step printed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StepEntry {
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepEntry {
    /// Entry for a step that succeeded; stderr is kept only if non-empty.
    pub fn succeeded(result: &CommandResult) -> Self {
        Self {
            output: result.output.clone(),
            error: (!result.error.is_empty()).then(|| result.error.clone()),
        }
    }

    /// Entry for the step that stopped the pipeline; always carries `error`.
    pub fn failed(result: &CommandResult) -> Self {
        Self {
            output: result.output.clone(),
            error: Some(result.error.clone()),
        }
    }
}

/// Append-only log of the steps that actually ran.
///
/// Serialises as a JSON object whose keys appear in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepLog {
    entries: Vec<(StepName, StepEntry)>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: StepName, entry: StepEntry) {
        self.entries.push((step, entry));
    }

    pub fn get(&self, step: StepName) -> Option<&StepEntry> {
        self.entries
            .iter()
            .find(|(name, _)| *name == step)
            .map(|(_, entry)| entry)
    }

    /// Step names in the order they executed.
    pub fn steps(&self) -> Vec<StepName> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StepLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name.as_str(), entry)?;
        }
        map.end()
    }
}
