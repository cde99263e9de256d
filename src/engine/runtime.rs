// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use inotify::WatchDescriptor;
use tracing::{debug, error, info, warn};

use crate::config::TrapSettings;
use crate::errors::{FtrapError, Result};
use crate::exec::{ChildSupervisor, Disposition};
use crate::types::TrapSignal;
use crate::watch::{ChangeRecord, ChangeSource};

use super::core::CoreRuntime;
use super::{CoreCommand, CoreStep};

/// What woke the main loop.
enum Wake {
    ChildExited(Result<Disposition>),
    Changes(Result<Vec<ChangeRecord<WatchDescriptor>>>),
    Tick,
}

/// Drives the core in response to inotify batches and retry ticks, and
/// delegates signalling and reaping to a [`ChildSupervisor`].
///
/// This is a pure IO shell around [`CoreRuntime`], which contains the watch
/// semantics.
pub struct Runtime {
    core: CoreRuntime<WatchDescriptor>,
    source: ChangeSource,
    child: ChildSupervisor,
    signal: TrapSignal,
    interval: Duration,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("child", &self.child)
            .field("signal", &self.signal)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Create the inotify channel, watch every path that already exists,
    /// then spawn the command.
    ///
    /// Nothing has been spawned if this returns an error, and the inotify
    /// descriptor is released on every early return.
    pub fn start(settings: &TrapSettings) -> Result<Self> {
        let mut source = ChangeSource::new()?;
        let mut core = CoreRuntime::new(settings.files.iter().cloned());
        core.start(&mut source)?;

        let child = ChildSupervisor::spawn(&settings.command)?;

        Ok(Self {
            core,
            source,
            child,
            signal: settings.signal,
            interval: settings.interval,
        })
    }

    /// Process id of the command.
    pub fn child_id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn core(&self) -> &CoreRuntime<WatchDescriptor> {
        &self.core
    }

    /// Main loop. Returns once the command has terminated.
    ///
    /// The child's exit takes priority over pending change records. On a
    /// fatal error the command is still reaped before the error is returned.
    pub async fn run(mut self) -> Result<Disposition> {
        info!(signal = %self.signal, "ftrap runtime started");

        loop {
            let wake = tokio::select! {
                biased;
                res = self.child.wait() => Wake::ChildExited(res),
                res = self.source.read_batch() => Wake::Changes(res),
                _ = tokio::time::sleep(self.interval) => Wake::Tick,
            };

            let step = match wake {
                Wake::ChildExited(Ok(disposition)) => return Ok(disposition),
                Wake::ChildExited(Err(err)) => return self.fail(err).await,
                Wake::Changes(Ok(records)) => {
                    debug!(count = records.len(), "received inotify batch");
                    self.core.handle_batch(records, &mut self.source)
                }
                Wake::Changes(Err(err)) => Err(err),
                Wake::Tick => self.core.handle_tick(&mut self.source),
            };

            match step {
                Ok(step) => self.execute(step),
                Err(err) => return self.fail(err).await,
            }
        }
    }

    fn execute(&self, step: CoreStep) {
        for command in step.commands {
            match command {
                CoreCommand::DeliverSignal(reason) => {
                    debug!(?reason, "delivering signal");
                    if let Err(err) = self.child.signal(self.signal) {
                        warn!(error = %err, "could not signal the command; continuing");
                    }
                }
            }
        }
    }

    /// Reap the command after a fatal error, then report the error.
    async fn fail(mut self, err: FtrapError) -> Result<Disposition> {
        error!(error = %err, "fatal error");
        error!("Waiting for the command to exit");
        match self.child.wait().await {
            Ok(disposition) => info!(%disposition, "command reaped after fatal error"),
            Err(wait_err) => error!(error = %wait_err, "could not reap the command"),
        }
        Err(err)
    }
}
