//! Shared helpers for the `ftrap` integration tests.

pub mod builders;
pub mod scripts;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single scenario. Real processes and real inotify
/// are involved, so a hang means a lost signal or a missed exit.
pub const SCENARIO_TIMEOUT: Duration = Duration::from_secs(10);

static INIT: Once = Once::new();

/// Install a test-captured subscriber once per test binary.
///
/// Defaults to `ftrap=debug`; override with `RUST_LOG`. Output is only shown
/// for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ftrap=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}

/// Await `f`, panicking after [`SCENARIO_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(SCENARIO_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("scenario did not finish within {SCENARIO_TIMEOUT:?}"),
    }
}
