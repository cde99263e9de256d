#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use ftrap::config::TrapSettings;
use ftrap::types::TrapSignal;

/// Builder for `TrapSettings` to simplify test setup.
///
/// Defaults to `SIGHUP` and a 100ms retry tick so tests do not wait for the
/// production interval.
pub struct SettingsBuilder {
    settings: TrapSettings,
}

impl SettingsBuilder {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            settings: TrapSettings {
                files: Vec::new(),
                signal: TrapSignal::Hup,
                interval: Duration::from_millis(100),
                command,
            },
        }
    }

    pub fn watch(mut self, path: impl AsRef<Path>) -> Self {
        self.settings.files.push(PathBuf::from(path.as_ref()));
        self
    }

    pub fn signal(mut self, signal: TrapSignal) -> Self {
        self.settings.signal = signal;
        self
    }

    pub fn interval_ms(mut self, ms: u64) -> Self {
        self.settings.interval = Duration::from_millis(ms);
        self
    }

    pub fn build(self) -> TrapSettings {
        self.settings
    }
}
