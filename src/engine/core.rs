// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes change batches and retry ticks and produces:
//! - updated watch state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for:
//! - waiting on the inotify channel, the child's exit and the retry timer
//! - delivering signals to the command
//! - reaping the command
//!
//! The core is generic over the [`WatchBackend`] so it can be driven by the
//! in-memory mock in tests.

use std::path::PathBuf;

use tracing::debug;

use crate::engine::event_handlers::{CoreStep, handle_change_record, handle_retry};
use crate::errors::Result;
use crate::watch::{ChangeRecord, WatchBackend, WatchSet};

/// Pure core runtime state: the set of watch targets.
///
/// It has **no** channels, no Tokio types, and does not talk to the kernel
/// except through the backend passed to each call.
pub struct CoreRuntime<H> {
    watches: WatchSet<H>,
}

impl<H: std::fmt::Debug> std::fmt::Debug for CoreRuntime<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreRuntime")
            .field("watches", &self.watches)
            .finish()
    }
}

impl<H: Clone + Eq + std::fmt::Debug> CoreRuntime<H> {
    /// Queue one target per path, in order. Nothing is watched yet.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut watches = WatchSet::new();
        for path in paths {
            watches.enqueue(path);
        }
        Self { watches }
    }

    pub fn watches(&self) -> &WatchSet<H> {
        &self.watches
    }

    /// Initial activation before the command is started. Nothing is
    /// signalled for it.
    pub fn start<B>(&mut self, backend: &mut B) -> Result<usize>
    where
        B: WatchBackend<Handle = H>,
    {
        let count = self.watches.activate_pending(backend)?;
        debug!(
            active = count,
            pending = self.watches.queued_len(),
            "initial watch activation"
        );
        Ok(count)
    }

    /// Apply a whole batch, then retry Queued targets.
    pub fn handle_batch<B>(
        &mut self,
        records: Vec<ChangeRecord<H>>,
        backend: &mut B,
    ) -> Result<CoreStep>
    where
        B: WatchBackend<Handle = H>,
    {
        let mut commands = Vec::new();
        for record in records {
            handle_change_record(&mut self.watches, backend, record, &mut commands);
        }
        handle_retry(&mut self.watches, backend, &mut commands)?;
        Ok(CoreStep { commands })
    }

    /// The retry timer fired without any change records.
    pub fn handle_tick<B>(&mut self, backend: &mut B) -> Result<CoreStep>
    where
        B: WatchBackend<Handle = H>,
    {
        let mut commands = Vec::new();
        handle_retry(&mut self.watches, backend, &mut commands)?;
        Ok(CoreStep { commands })
    }
}
