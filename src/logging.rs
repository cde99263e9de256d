// src/logging.rs

//! Diagnostics for `ftrap`, written to STDERR with `tracing-subscriber`.
//!
//! The filter is chosen as follows:
//! 1. `--log-level` on the command line;
//! 2. otherwise the `FTRAP_LOG` environment variable, which accepts full
//!    `EnvFilter` directives (e.g. `debug` or `ftrap::watch=trace`);
//! 3. otherwise `warn`, so a healthy run prints nothing.
//!
//! STDOUT is never written to: it is inherited by the supervised command.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "FTRAP_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(directive(level)),
        None => EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("{e}"))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
