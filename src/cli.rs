// src/cli.rs

//! CLI argument parsing using `clap`.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `tvdeploy`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tvdeploy",
    version,
    about = "Package, install and launch web apps on a networked TV.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Tvdeploy.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TVDEPLOY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Load + validate config, print it, but don't run anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the local web console.
    Serve {
        /// Overrides `[server].bind`.
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },

    /// Connect to the device and report whether it worked.
    TestConnection {
        #[arg(long, value_name = "IP")]
        ip: String,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Install and launch an existing `.wgt` package.
    Deploy {
        #[arg(long, value_name = "IP")]
        ip: String,

        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Build a project into `dist/` and package it.
    Generate {
        #[arg(long, value_name = "PATH")]
        project: String,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Package a project, then install and run it on the device.
    Run {
        #[arg(long, value_name = "PATH")]
        project: String,

        #[arg(long, value_name = "IP")]
        ip: String,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Package a project without installing it.
    Debug {
        #[arg(long, value_name = "PATH")]
        project: String,

        #[command(flatten)]
        tools: ToolArgs,
    },
}

/// Tool path overrides; fall back to `[tools]` in the config.
#[derive(Debug, Clone, Default, Args)]
pub struct ToolArgs {
    /// Device bridge executable (`sdb`).
    #[arg(long, value_name = "PATH")]
    pub sdb: Option<String>,

    /// SDK CLI executable (`tizen`).
    #[arg(long, value_name = "PATH")]
    pub tizen: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
