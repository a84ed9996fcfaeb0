// src/config/model.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::ConnectCheck;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [server]
/// bind = "127.0.0.1:3000"
/// upload_dir = "/tmp/tizen-uploads"
///
/// [tools]
/// bridge_path = "/opt/tizen-studio/tools/sdb"
/// sdk_path = "/opt/tizen-studio/tools/ide/bin/tizen"
///
/// [connect]
/// test_check = "strict"
/// pipeline_check = "loose"
/// verify_devices = false
///
/// [exec]
/// timeout = "10m"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: RawServerSection,

    #[serde(default)]
    pub tools: ToolsSection,

    #[serde(default)]
    pub connect: ConnectSection,

    #[serde(default)]
    pub exec: RawExecSection,
}

/// `[server]` section, unvalidated.
#[derive(Debug, Clone, Deserialize)]
pub struct RawServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Where uploaded packages are written. `None` means
    /// `<system temp dir>/tizen-uploads`.
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_upload_bytes() -> usize {
    256 * 1024 * 1024
}

impl Default for RawServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            upload_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// `[tools]` section.
///
/// Fallback executable paths used when a request does not name its own.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ToolsSection {
    /// Device bridge client (`sdb`).
    #[serde(default)]
    pub bridge_path: Option<String>,

    /// Platform SDK CLI (`tizen`).
    #[serde(default)]
    pub sdk_path: Option<String>,
}

/// `[connect]` section.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ConnectSection {
    /// Check used by the Test Connection flow.
    #[serde(default = "default_test_check")]
    pub test_check: ConnectCheck,

    /// Check used when connecting as part of Deploy / Full Run.
    #[serde(default = "default_pipeline_check")]
    pub pipeline_check: ConnectCheck,

    /// Follow every connect with `<bridge> devices` and require the target
    /// IP to be listed.
    #[serde(default)]
    pub verify_devices: bool,
}

fn default_test_check() -> ConnectCheck {
    ConnectCheck::Strict
}

fn default_pipeline_check() -> ConnectCheck {
    ConnectCheck::Loose
}

impl Default for ConnectSection {
    fn default() -> Self {
        Self {
            test_check: default_test_check(),
            pipeline_check: default_pipeline_check(),
            verify_devices: false,
        }
    }
}

/// `[exec]` section, unvalidated.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawExecSection {
    /// Duration string such as `"90s"` or `"10m"`. Absent means external
    /// processes may run forever.
    #[serde(default)]
    pub timeout: Option<String>,
}

/// Validated configuration.
///
/// Construct via `ConfigFile::try_from(raw)` (see `validate.rs`) or
/// `ConfigFile::default()`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub tools: ToolsSection,
    pub connect: ConnectSection,
    pub exec: ExecSection,
}

#[derive(Debug, Clone)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecSection {
    pub timeout: Option<Duration>,
}

impl ConfigFile {
    /// Used by the validator once all checks passed.
    pub(crate) fn new_unchecked(
        server: ServerSection,
        tools: ToolsSection,
        connect: ConnectSection,
        exec: ExecSection,
    ) -> Self {
        Self {
            server,
            tools,
            connect,
            exec,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSection {
                bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
                upload_dir: default_upload_dir(),
                max_upload_bytes: default_max_upload_bytes(),
            },
            tools: ToolsSection::default(),
            connect: ConnectSection::default(),
            exec: ExecSection::default(),
        }
    }
}

pub fn default_upload_dir() -> PathBuf {
    std::env::temp_dir().join("tizen-uploads")
}
