// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use crate::errors::EXIT_INTERNAL_ERROR;
use crate::types::TrapSignal;

/// Command-line arguments for `ftrap`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ftrap",
    version,
    about = "Send a signal to COMMAND when any one of the watched files is changed.",
    long_about = None
)]
pub struct CliArgs {
    /// Add a file to watch. May be given multiple times.
    ///
    /// The file does not need to exist yet; it is picked up once created.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Signal to send: HUP, USR1, USR2, TERM, QUIT or INT. Default is HUP.
    #[arg(short, long, value_name = "SIGNAL")]
    pub signal: Option<TrapSignal>,

    /// Interval, in milliseconds, for re-checking files that do not exist yet.
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Optional TOML config file providing `files`, `signal`, `interval_ms`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FTRAP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the settings, but don't watch or run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command to run, followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
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

/// Parse the process arguments.
///
/// `--help` and `--version` exit with 0; any usage error exits with
/// [`EXIT_INTERNAL_ERROR`] so it cannot be mistaken for the command's own
/// exit code.
pub fn parse() -> CliArgs {
    match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(EXIT_INTERNAL_ERROR);
        }
    }
}
