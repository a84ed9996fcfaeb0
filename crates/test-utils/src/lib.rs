//! Shared fixtures for tvdeploy's integration tests: a scripted process
//! runner, config and project builders, and tracing setup.

pub mod builders;
pub mod fake_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

pub use builders::{mock_project, write_project, ConfigBuilder};
pub use fake_runner::{failed, ok, FakeRunner};

static TRACING: Once = Once::new();

/// Route tvdeploy's logs through the test harness writer, once per binary.
///
/// Captured output only shows for failing tests. Raise verbosity with
/// `TVDEPLOY_LOG=tvdeploy=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("TVDEPLOY_LOG")
            .unwrap_or_else(|_| EnvFilter::new("tvdeploy=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Guard against a hung child process wedging the test run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("test future did not finish within 5s")
}
