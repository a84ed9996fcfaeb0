// src/pipeline/mod.rs

//! Ordered, fail-fast execution of pipeline steps.
//!
//! A flow is a [`Pipeline`]: a list of [`Step`]s run one after another over
//! a shared [`PipelineState`]. The first failing step ends the run; its
//! output is already in the log, later steps never start.
//!
//! - [`steps`] knows how to invoke each external command.
//! - [`extract`] holds the output-scraping patterns.
//! - [`log`] is the ordered per-step output record.

pub mod extract;
pub mod log;
pub mod steps;

use tracing::{debug, info};

use crate::exec::ProcessRunner;

pub use log::{StepEntry, StepLog};
pub use steps::{PipelineState, Step, StepFailure};

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

/// State after a run, plus the failure that stopped it (if any).
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub state: PipelineState,
    pub failure: Option<StepFailure>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub async fn run(&self, runner: &dyn ProcessRunner, mut state: PipelineState) -> PipelineRun {
        for step in &self.steps {
            info!(step = %step.name(), "running step");
            if let Err(failure) = step.execute(runner, &mut state).await {
                info!(step = %failure.step, "pipeline stopped");
                return PipelineRun {
                    state,
                    failure: Some(failure),
                };
            }
        }

        debug!(steps = ?state.log.steps(), "pipeline finished");
        PipelineRun {
            state,
            failure: None,
        }
    }
}
