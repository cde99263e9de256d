// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::TrapSignal;

/// Default retry tick for paths that do not exist yet.
///
/// There is no notification for "a path started existing" short of watching
/// every ancestor directory, so pending paths are simply re-checked this often.
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Optional config file, as read from TOML.
///
/// ```toml
/// files = ["app.conf", "/etc/app/extra.conf"]
/// signal = "USR1"
/// interval_ms = 1000
/// ```
///
/// Every key is optional; CLI flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub files: Vec<PathBuf>,

    #[serde(default)]
    pub signal: Option<TrapSignal>,

    #[serde(default)]
    pub interval_ms: Option<u64>,
}

/// Fully resolved and validated settings handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapSettings {
    /// One entry per watched path; duplicates are kept.
    pub files: Vec<PathBuf>,
    pub signal: TrapSignal,
    pub interval: Duration,
    /// `argv` of the supervised command; never empty.
    pub command: Vec<String>,
}
