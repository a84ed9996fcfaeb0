#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tvdeploy::config::{ConfigFile, RawConfigFile};
use tvdeploy::fs::mock::MockFileSystem;
use tvdeploy::project::REQUIRED_FILES;
use tvdeploy::types::ConnectCheck;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn bridge_path(mut self, path: &str) -> Self {
        self.config.tools.bridge_path = Some(path.to_string());
        self
    }

    pub fn sdk_path(mut self, path: &str) -> Self {
        self.config.tools.sdk_path = Some(path.to_string());
        self
    }

    /// Both tool paths set to `sdb` / `tizen`.
    pub fn with_default_tools(self) -> Self {
        self.bridge_path("sdb").sdk_path("tizen")
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.server.upload_dir = Some(dir.into());
        self
    }

    pub fn test_check(mut self, check: ConnectCheck) -> Self {
        self.config.connect.test_check = check;
        self
    }

    pub fn pipeline_check(mut self, check: ConnectCheck) -> Self {
        self.config.connect.pipeline_check = check;
        self
    }

    pub fn verify_devices(mut self, val: bool) -> Self {
        self.config.connect.verify_devices = val;
        self
    }

    pub fn timeout(mut self, duration: &str) -> Self {
        self.config.exec.timeout = Some(duration.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Add every required project marker file under `dir` in a mock filesystem.
pub fn mock_project(fs: &MockFileSystem, dir: impl AsRef<Path>) {
    for file in REQUIRED_FILES {
        fs.add_file(dir.as_ref().join(file), b"".to_vec());
    }
}

/// Create every required project marker file under a real directory.
pub fn write_project(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for file in REQUIRED_FILES {
        std::fs::write(dir.join(file), b"")?;
    }
    Ok(())
}
