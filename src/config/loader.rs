// src/config/loader.rs

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{DEFAULT_INTERVAL_MS, RawConfigFile, TrapSettings};
use crate::config::validate::validate_settings;
use crate::errors::Result;

/// Load a config file from a given path.
///
/// This only performs TOML deserialization; the merge with CLI flags and the
/// semantic checks happen in [`resolve_settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), files = config.files.len(), "loaded config file");

    Ok(config)
}

/// Combine the CLI arguments with the optional config file they point at.
///
/// - `files`: entries from the config file first, then every `-f`.
/// - `signal` / `interval_ms`: CLI wins over the file, the file wins over
///   the defaults.
pub fn resolve_settings(args: &CliArgs) -> Result<TrapSettings> {
    let file = match args.config {
        Some(ref path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };

    let mut files = file.files;
    files.extend(args.files.iter().cloned());

    let interval_ms = args
        .interval_ms
        .or(file.interval_ms)
        .unwrap_or(DEFAULT_INTERVAL_MS);

    let settings = TrapSettings {
        files,
        signal: args.signal.or(file.signal).unwrap_or_default(),
        interval: Duration::from_millis(interval_ms),
        command: args.command.clone(),
    };

    validate_settings(&settings)?;
    Ok(settings)
}
