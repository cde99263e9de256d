// src/errors.rs

//! Crate-wide error type and exit codes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code used when `ftrap` fails without a child disposition to mirror
/// (bad usage, cannot start inotify, cannot spawn the command, ...).
pub const EXIT_INTERNAL_ERROR: i32 = 112;

#[derive(Error, Debug)]
pub enum FtrapError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cannot start inotify - {0}")]
    NotifyInit(#[source] io::Error),

    #[error("Cannot watch file '{}' - {source}", path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn command '{program}' - {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read inotify events - {0}")]
    ReadEvents(#[source] io::Error),

    #[error("Error waiting for the command - {0}")]
    Wait(#[source] io::Error),

    #[error("Failed to send signal {signal} - {source}")]
    Signal {
        signal: String,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FtrapError>;
