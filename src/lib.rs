// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod project;
pub mod server;
pub mod types;
pub mod upload;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{resolve_config, ConfigFile};
use crate::exec::RealProcessRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::orchestrator::{
    ConnectionRequest, DeployRequest, Orchestrator, PackageRequest, PipelineOutcome, RunRequest,
};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the process runner and filesystem
/// - the orchestrator
/// - either the HTTP console or a single flow
///
/// Returns whether the requested work succeeded.
pub async fn run(args: CliArgs) -> Result<bool> {
    let cfg = resolve_config(args.config.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(true);
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let runner = Arc::new(RealProcessRunner::with_timeout(cfg.exec.timeout));
    let orchestrator = Orchestrator::new(&cfg, runner, fs.clone());

    let outcome = match args.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(cfg.server.bind);
            let router = server::build_router(orchestrator, cfg.server.max_upload_bytes);
            server::serve(addr, router).await?;
            return Ok(true);
        }
        Command::TestConnection { ip, tools } => {
            orchestrator
                .test_connection(&ConnectionRequest {
                    ip_address: Some(ip),
                    sdb_path: tools.sdb,
                    tizen_path: tools.tizen,
                })
                .await
        }
        Command::Deploy { ip, file, tools } => {
            let req = DeployRequest {
                ip_address: Some(ip),
                sdb_path: tools.sdb,
                tizen_path: tools.tizen,
                file_name: file_name_of(&file),
                file: Some(fs.read(&file)?),
            };
            orchestrator
                .deploy(&req)
                .await
                .context("deploying package")?
        }
        Command::Generate { project, tools } => {
            orchestrator
                .generate_package(&PackageRequest {
                    project_path: Some(project),
                    tizen_path: tools.tizen,
                })
                .await
        }
        Command::Run { project, ip, tools } => {
            orchestrator
                .full_run(&RunRequest {
                    project_path: Some(project),
                    tizen_path: tools.tizen,
                    sdb_path: tools.sdb,
                    ip_address: Some(ip),
                })
                .await
        }
        Command::Debug { project, tools } => {
            orchestrator
                .debug(&PackageRequest {
                    project_path: Some(project),
                    tizen_path: tools.tizen,
                })
                .await
        }
    };

    print_outcome(&outcome)?;
    Ok(outcome.success)
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}

fn print_outcome(outcome: &PipelineOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("serialising outcome")?;
    println!("{json}");
    info!(success = outcome.success, message = %outcome.message, "done");
    Ok(())
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("tvdeploy dry-run");
    println!("  server.bind = {}", cfg.server.bind);
    println!("  server.upload_dir = {}", cfg.server.upload_dir.display());
    println!("  server.max_upload_bytes = {}", cfg.server.max_upload_bytes);
    println!();

    println!("tools:");
    match cfg.tools.bridge_path {
        Some(ref p) => println!("  bridge_path: {p}"),
        None => println!("  bridge_path: (per request)"),
    }
    match cfg.tools.sdk_path {
        Some(ref p) => println!("  sdk_path: {p}"),
        None => println!("  sdk_path: (per request)"),
    }
    println!();

    println!("connect:");
    println!("  test_check: {:?}", cfg.connect.test_check);
    println!("  pipeline_check: {:?}", cfg.connect.pipeline_check);
    println!("  verify_devices: {}", cfg.connect.verify_devices);
    println!();

    match cfg.exec.timeout {
        Some(t) => println!("exec.timeout = {t:?}"),
        None => println!("exec.timeout = none"),
    }

    debug!("dry-run complete (nothing executed)");
}
