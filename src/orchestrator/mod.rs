// src/orchestrator/mod.rs

//! The request-level flows.
//!
//! Each flow checks its required inputs, then runs a fixed [`Pipeline`]
//! and folds the result into a [`PipelineOutcome`]:
//!
//! 1. Test Connection: Connect.
//! 2. Upload & Deploy: save upload, Connect, Install, Launch.
//! 3. Generate Package: validate project, Build, Package.
//! 4. Full Run: validate project, Package, Connect, Install, Run.
//!
//! plus Debug: validate project, Package.
//!
//! Nothing external runs before validation passes.

pub mod outcome;
pub mod request;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::{ConfigFile, ConnectSection, ToolsSection};
use crate::errors::Result;
use crate::exec::ProcessRunner;
use crate::fs::FileSystem;
use crate::pipeline::{Pipeline, PipelineRun, PipelineState, Step};
use crate::project::validate_project;
use crate::types::{ConnectCheck, StepName};
use crate::upload;

pub use outcome::{
    DeploymentData, OutcomeData, OutcomeKind, PackageData, PipelineOutcome, RunData,
};
pub use request::{ConnectionRequest, DeployRequest, PackageRequest, RunRequest};

use request::{or_fallback, RequiredFields};

/// Runs flows against a process runner and filesystem.
///
/// Holds no per-request state; clones share the runner and filesystem.
#[derive(Clone)]
pub struct Orchestrator {
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    tools: ToolsSection,
    connect: ConnectSection,
    upload_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(
        config: &ConfigFile,
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            runner,
            fs,
            tools: config.tools.clone(),
            connect: config.connect,
            upload_dir: config.server.upload_dir.clone(),
        }
    }

    pub async fn test_connection(&self, req: &ConnectionRequest) -> PipelineOutcome {
        let mut fields = RequiredFields::default();
        let ip_address = fields.take("ipAddress", req.ip_address.as_deref());
        let bridge = fields.take("sdbPath", or_fallback(&req.sdb_path, &self.tools.bridge_path));
        if let Err(missing) = fields.finish() {
            return PipelineOutcome::missing_fields(&missing);
        }

        info!(%ip_address, "testing connection");
        let pipeline =
            Pipeline::new().then(self.connect_step(&bridge, &ip_address, self.connect.test_check));
        let run = self.run(&pipeline, PipelineState::default()).await;

        conclude(run, "Successfully connected to TV")
    }

    /// Save the uploaded package, then connect, install and launch it.
    ///
    /// `Err` only for internal failures such as the upload not being
    /// writable.
    pub async fn deploy(&self, req: &DeployRequest) -> Result<PipelineOutcome> {
        let mut fields = RequiredFields::default();
        let ip_address = fields.take("ipAddress", req.ip_address.as_deref());
        let bridge = fields.take("sdbPath", or_fallback(&req.sdb_path, &self.tools.bridge_path));
        let sdk = fields.take("tizenPath", or_fallback(&req.tizen_path, &self.tools.sdk_path));
        let contents = req.file.as_deref().filter(|bytes| !bytes.is_empty());
        if contents.is_none() {
            fields.mark_missing("file");
        }
        if let Err(missing) = fields.finish() {
            return Ok(PipelineOutcome::missing_fields(&missing));
        }
        let contents = contents.unwrap_or_default();

        let file_name = req.file_name.as_deref().unwrap_or_default();
        if !upload::is_package_file(file_name) {
            return Ok(PipelineOutcome::invalid("Please upload a valid .wgt file"));
        }

        let saved = upload::save_upload(self.fs.as_ref(), &self.upload_dir, file_name, contents)?;
        let saved_file_path = saved.to_string_lossy().to_string();
        info!(%ip_address, file = %file_name, saved = %saved_file_path, "deploying uploaded package");

        let pipeline = Pipeline::new()
            .then(self.connect_step(&bridge, &ip_address, self.connect.pipeline_check))
            .then(Step::Install {
                sdk_path: sdk.clone(),
            })
            .then(Step::Launch {
                sdk_path: sdk,
                log_as: StepName::Launch,
            });
        let run = self
            .run(&pipeline, PipelineState::with_package_path(&saved_file_path))
            .await;

        let data = OutcomeData::Deployment(DeploymentData {
            ip_address,
            file_name: file_name.to_string(),
            saved_file_path,
            package_id: run.state.package_id.clone(),
        });
        Ok(conclude(run, "Application deployed and launched successfully").with_data(data))
    }

    /// Build the project into `dist/` and package that.
    pub async fn generate_package(&self, req: &PackageRequest) -> PipelineOutcome {
        let mut fields = RequiredFields::default();
        let project = fields.take("projectPath", req.project_path.as_deref());
        let sdk = fields.take("tizenPath", or_fallback(&req.tizen_path, &self.tools.sdk_path));
        if let Err(missing) = fields.finish() {
            return PipelineOutcome::missing_fields(&missing);
        }
        if let Some(rejected) = self.check_project(&project) {
            return rejected;
        }

        info!(%project, "generating package");
        let project_dir = PathBuf::from(&project);
        let pipeline = Pipeline::new()
            .then(Step::Build {
                sdk_path: sdk.clone(),
                project_path: project_dir.clone(),
            })
            .then(Step::Package {
                sdk_path: sdk,
                source: project_dir.join("dist"),
                working_dir: project_dir,
                require_location: true,
            });
        let run = self.run(&pipeline, PipelineState::default()).await;

        let data = run
            .state
            .package_path
            .clone()
            .map(|package_path| OutcomeData::Package(PackageData { package_path }));
        let outcome = conclude(run, "Application packaged successfully");
        match data {
            Some(data) => outcome.with_data(data),
            None => outcome,
        }
    }

    /// Package, connect, install and run a project.
    pub async fn full_run(&self, req: &RunRequest) -> PipelineOutcome {
        let mut fields = RequiredFields::default();
        let project = fields.take("projectPath", req.project_path.as_deref());
        let sdk = fields.take("tizenPath", or_fallback(&req.tizen_path, &self.tools.sdk_path));
        let bridge = fields.take("sdbPath", or_fallback(&req.sdb_path, &self.tools.bridge_path));
        let ip_address = fields.take("ipAddress", req.ip_address.as_deref());
        if let Err(missing) = fields.finish() {
            return PipelineOutcome::missing_fields(&missing);
        }
        if let Some(rejected) = self.check_project(&project) {
            return rejected;
        }

        info!(%project, %ip_address, "running project on device");
        let project_dir = PathBuf::from(&project);
        let pipeline = Pipeline::new()
            .then(Step::Package {
                sdk_path: sdk.clone(),
                source: project_dir.clone(),
                working_dir: project_dir,
                require_location: true,
            })
            .then(self.connect_step(&bridge, &ip_address, self.connect.pipeline_check))
            .then(Step::Install {
                sdk_path: sdk.clone(),
            })
            .then(Step::Launch {
                sdk_path: sdk,
                log_as: StepName::Run,
            });
        let run = self.run(&pipeline, PipelineState::default()).await;

        let data = match (&run.state.package_path, &run.state.package_id) {
            (Some(package_path), Some(package_id)) => Some(OutcomeData::Run(RunData {
                package_path: package_path.clone(),
                package_id: package_id.clone(),
            })),
            _ => None,
        };
        let outcome = conclude(run, "Application running successfully");
        match data {
            Some(data) => outcome.with_data(data),
            None => outcome,
        }
    }

    /// Package only, for inspecting the SDK's packaging output.
    pub async fn debug(&self, req: &PackageRequest) -> PipelineOutcome {
        let mut fields = RequiredFields::default();
        let project = fields.take("projectPath", req.project_path.as_deref());
        let sdk = fields.take("tizenPath", or_fallback(&req.tizen_path, &self.tools.sdk_path));
        if let Err(missing) = fields.finish() {
            return PipelineOutcome::missing_fields(&missing);
        }
        if let Some(rejected) = self.check_project(&project) {
            return rejected;
        }

        info!(%project, "debug packaging");
        let project_dir = PathBuf::from(&project);
        let pipeline = Pipeline::new().then(Step::Package {
            sdk_path: sdk,
            source: project_dir.clone(),
            working_dir: project_dir,
            require_location: false,
        });
        let run = self.run(&pipeline, PipelineState::default()).await;

        conclude(run, "Application packaged successfully")
    }

    fn connect_step(&self, bridge: &str, ip_address: &str, check: ConnectCheck) -> Step {
        Step::Connect {
            bridge_path: bridge.to_string(),
            ip_address: ip_address.to_string(),
            check,
            verify_devices: self.connect.verify_devices,
        }
    }

    /// `Some` rejection when the project is missing marker files.
    fn check_project(&self, project: &str) -> Option<PipelineOutcome> {
        let validation = validate_project(self.fs.as_ref(), Path::new(project));
        (!validation.is_valid).then(|| PipelineOutcome::invalid_project(project, &validation))
    }

    async fn run(&self, pipeline: &Pipeline, state: PipelineState) -> PipelineRun {
        pipeline.run(self.runner.as_ref(), state).await
    }
}

fn conclude(run: PipelineRun, success_message: &str) -> PipelineOutcome {
    match run.failure {
        Some(failure) => PipelineOutcome::step_failed(&failure, run.state.log),
        None => PipelineOutcome::success(success_message, run.state.log),
    }
}
