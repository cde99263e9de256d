// src/config/validate.rs

use std::time::Duration;

use tracing::warn;

use crate::config::model::TrapSettings;
use crate::errors::{FtrapError, Result};

pub fn validate_settings(settings: &TrapSettings) -> Result<()> {
    ensure_has_command(settings)?;
    validate_interval(settings)?;
    validate_files(settings)?;
    Ok(())
}

fn ensure_has_command(settings: &TrapSettings) -> Result<()> {
    match settings.command.first() {
        Some(program) if !program.is_empty() => Ok(()),
        _ => Err(FtrapError::ConfigError(
            "command is not specified; see ftrap --help for usage".to_string(),
        )),
    }
}

fn validate_interval(settings: &TrapSettings) -> Result<()> {
    if settings.interval < Duration::from_millis(1) {
        return Err(FtrapError::ConfigError(
            "interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_files(settings: &TrapSettings) -> Result<()> {
    if settings.files.iter().any(|p| p.as_os_str().is_empty()) {
        return Err(FtrapError::ConfigError(
            "watched file path must not be empty".to_string(),
        ));
    }
    if settings.files.is_empty() {
        warn!("no files to watch; the command will be supervised but never signalled");
    }
    Ok(())
}
