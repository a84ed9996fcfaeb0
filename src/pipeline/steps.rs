// src/pipeline/steps.rs

//! Pipeline Steps: the individual bridge / SDK invocations and how each one
//! decides whether it worked.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::exec::{CommandResult, CommandSpec, ProcessRunner};
use crate::pipeline::extract::{
    connect_succeeded, device_listed, extract_package_id, extract_package_path,
};
use crate::pipeline::log::{StepEntry, StepLog};
use crate::types::{ConnectCheck, StepName};

/// Values threaded from one step to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    /// `.wgt` to install: extracted from package output, or the saved upload.
    pub package_path: Option<String>,
    /// Identifier reported by install, needed to launch.
    pub package_id: Option<String>,
    pub log: StepLog,
}

impl PipelineState {
    pub fn with_package_path(path: impl Into<String>) -> Self {
        Self {
            package_path: Some(path.into()),
            ..Self::default()
        }
    }
}

/// Why the pipeline stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: StepName,
    pub message: String,
}

impl StepFailure {
    fn new(step: StepName, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

/// One stage of a flow. Each variant carries the inputs it needs; values
/// produced by earlier stages come from [`PipelineState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `<bridge> connect <ip>`, optionally followed by `<bridge> devices`.
    Connect {
        bridge_path: String,
        ip_address: String,
        check: ConnectCheck,
        verify_devices: bool,
    },
    /// `<sdk> build-web --output dist -- <project>`
    Build {
        sdk_path: String,
        project_path: PathBuf,
    },
    /// `<sdk> package --type wgt -- <source>`
    ///
    /// With `require_location`, the produced `.wgt` path must be found in
    /// the output; it is stored in `PipelineState::package_path`.
    Package {
        sdk_path: String,
        source: PathBuf,
        working_dir: PathBuf,
        require_location: bool,
    },
    /// `<sdk> install -n <package_path>`
    Install { sdk_path: String },
    /// `<sdk> run -p <package_id>`, logged under `log_as` (`run` or `launch`).
    Launch { sdk_path: String, log_as: StepName },
}

impl Step {
    /// Name under which this step's output is logged.
    pub fn name(&self) -> StepName {
        match self {
            Step::Connect { .. } => StepName::Connect,
            Step::Build { .. } => StepName::Build,
            Step::Package { .. } => StepName::Package,
            Step::Install { .. } => StepName::Install,
            Step::Launch { log_as, .. } => *log_as,
        }
    }

    pub async fn execute(
        &self,
        runner: &dyn ProcessRunner,
        state: &mut PipelineState,
    ) -> Result<(), StepFailure> {
        match self {
            Step::Connect {
                bridge_path,
                ip_address,
                check,
                verify_devices,
            } => connect(runner, state, bridge_path, ip_address, *check, *verify_devices).await,
            Step::Build {
                sdk_path,
                project_path,
            } => {
                let spec = CommandSpec::new(sdk_path)
                    .args(["build-web", "--output", "dist", "--"])
                    .arg(project_path.to_string_lossy())
                    .current_dir(project_path);
                let result = runner.run(&spec).await;
                if !result.success {
                    return Err(fail(state, StepName::Build, &result, "Failed to build application"));
                }
                state.log.record(StepName::Build, StepEntry::succeeded(&result));
                Ok(())
            }
            Step::Package {
                sdk_path,
                source,
                working_dir,
                require_location,
            } => package(runner, state, sdk_path, source, working_dir, *require_location).await,
            Step::Install { sdk_path } => install(runner, state, sdk_path).await,
            Step::Launch { sdk_path, log_as } => launch(runner, state, sdk_path, *log_as).await,
        }
    }
}

async fn connect(
    runner: &dyn ProcessRunner,
    state: &mut PipelineState,
    bridge_path: &str,
    ip_address: &str,
    check: ConnectCheck,
    verify_devices: bool,
) -> Result<(), StepFailure> {
    info!(ip_address, ?check, "connecting to device");
    let spec = CommandSpec::new(bridge_path).args(["connect", ip_address]);
    let mut result = runner.run(&spec).await;

    if !connect_succeeded(&result, check) {
        if result.error.is_empty() {
            result.error = "Connection failed".to_string();
        }
        return Err(fail(state, StepName::Connect, &result, "Failed to connect to TV"));
    }
    state.log.record(StepName::Connect, StepEntry::succeeded(&result));

    if verify_devices {
        let spec = CommandSpec::new(bridge_path).arg("devices");
        let mut listing = runner.run(&spec).await;
        if !listing.success || !device_listed(&listing.output, ip_address) {
            if listing.error.is_empty() {
                listing.error = format!("device {ip_address} is not listed as connected");
            }
            return Err(fail(state, StepName::Devices, &listing, "Failed to connect to TV"));
        }
        state.log.record(StepName::Devices, StepEntry::succeeded(&listing));
    }

    Ok(())
}

async fn package(
    runner: &dyn ProcessRunner,
    state: &mut PipelineState,
    sdk_path: &str,
    source: &std::path::Path,
    working_dir: &std::path::Path,
    require_location: bool,
) -> Result<(), StepFailure> {
    let spec = CommandSpec::new(sdk_path)
        .args(["package", "--type", "wgt", "--"])
        .arg(source.to_string_lossy())
        .current_dir(working_dir);
    let result = runner.run(&spec).await;

    if !result.success {
        return Err(fail(state, StepName::Package, &result, "Failed to package application"));
    }

    if require_location {
        match extract_package_path(&result.output) {
            Some(path) => {
                info!(package_path = %path, "package created");
                state.package_path = Some(path);
            }
            None => {
                return Err(fail(
                    state,
                    StepName::Package,
                    &result,
                    "Failed to extract WGT file path from package output",
                ));
            }
        }
    }

    state.log.record(StepName::Package, StepEntry::succeeded(&result));
    Ok(())
}

async fn install(
    runner: &dyn ProcessRunner,
    state: &mut PipelineState,
    sdk_path: &str,
) -> Result<(), StepFailure> {
    let Some(package_path) = state.package_path.clone() else {
        warn!("install requested without a package path");
        return Err(StepFailure::new(
            StepName::Install,
            "Failed to install application",
        ));
    };

    let spec = CommandSpec::new(sdk_path).args(["install", "-n", package_path.as_str()]);
    let result = runner.run(&spec).await;

    if !result.success {
        return Err(fail(state, StepName::Install, &result, "Failed to install application"));
    }

    match extract_package_id(&result.output) {
        Some(id) => {
            info!(package_id = %id, "package installed");
            state.package_id = Some(id);
        }
        None => {
            return Err(fail(
                state,
                StepName::Install,
                &result,
                "Failed to extract package ID from installation logs",
            ));
        }
    }

    state.log.record(StepName::Install, StepEntry::succeeded(&result));
    Ok(())
}

async fn launch(
    runner: &dyn ProcessRunner,
    state: &mut PipelineState,
    sdk_path: &str,
    log_as: StepName,
) -> Result<(), StepFailure> {
    let message = match log_as {
        StepName::Launch => "Failed to launch application",
        _ => "Failed to run application",
    };

    let Some(package_id) = state.package_id.clone() else {
        warn!(step = %log_as, "launch requested without a package id");
        return Err(StepFailure::new(log_as, message));
    };

    let spec = CommandSpec::new(sdk_path).args(["run", "-p", package_id.as_str()]);
    let result = runner.run(&spec).await;

    if !result.success {
        return Err(fail(state, log_as, &result, message));
    }

    state.log.record(log_as, StepEntry::succeeded(&result));
    Ok(())
}

/// Record the failing step's output and build the failure.
fn fail(
    state: &mut PipelineState,
    step: StepName,
    result: &CommandResult,
    message: &str,
) -> StepFailure {
    warn!(%step, error = %result.error, "{message}");
    state.log.record(step, StepEntry::failed(result));
    StepFailure::new(step, message)
}
