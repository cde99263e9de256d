// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{TrapSettings, resolve_settings};
use crate::engine::Runtime;
use crate::errors::Result;
use crate::exec::Disposition;

/// What `main.rs` should do once [`run`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `--dry-run`: settings were printed, nothing was run.
    DryRun,
    /// The command terminated; mirror its disposition.
    Finished(Disposition),
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI flags over the optional config file)
/// - the inotify channel and the initial watches
/// - the supervised command
/// - the main loop, until the command terminates
pub async fn run(args: CliArgs) -> Result<Outcome> {
    let settings = resolve_settings(&args)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(Outcome::DryRun);
    }

    run_settings(&settings).await.map(Outcome::Finished)
}

/// Supervise `settings.command` until it terminates.
pub async fn run_settings(settings: &TrapSettings) -> Result<Disposition> {
    info!(
        files = settings.files.len(),
        signal = %settings.signal,
        interval = ?settings.interval,
        "starting ftrap"
    );
    let runtime = Runtime::start(settings)?;
    runtime.run().await
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(settings: &TrapSettings) {
    println!("ftrap dry-run");
    println!("  signal = {}", settings.signal);
    println!("  interval_ms = {}", settings.interval.as_millis());
    println!("  command = {:?}", settings.command);
    println!();

    println!("files ({}):", settings.files.len());
    for path in settings.files.iter() {
        let state = if path.exists() { "exists" } else { "pending" };
        println!("  - {} ({state})", path.display());
    }

    debug!("dry-run complete (no execution)");
}
