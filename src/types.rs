use std::fmt;

use serde::Deserialize;

/// How strictly the output of `<bridge> connect <ip>` is judged.
///
/// - `Strict`: exit code 0, empty stderr, stdout contains `connected` and
///   does not contain `failed to connect`. The bridge tool is known to exit
///   0 on some failed connects, so this is what "Test Connection" uses.
/// - `Loose`: any zero exit code counts as connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectCheck {
    Strict,
    Loose,
}

/// Names under which step output is recorded in a `StepLog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    Connect,
    Devices,
    Build,
    Package,
    Install,
    Run,
    Launch,
}

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::Connect => "connect",
            StepName::Devices => "devices",
            StepName::Build => "build",
            StepName::Package => "package",
            StepName::Install => "install",
            StepName::Run => "run",
            StepName::Launch => "launch",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
