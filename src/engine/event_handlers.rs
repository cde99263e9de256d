// src/engine/event_handlers.rs

//! Per-record policy for the core runtime.

use std::path::PathBuf;

use inotify::EventMask;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::watch::{ChangeRecord, WatchBackend, WatchSet};

/// Why the command is being signalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalReason {
    /// A watched file was written, or an entry was created in a watched
    /// directory. `path` is `None` when the record's handle is no longer
    /// Active.
    ContentChanged { path: Option<PathBuf> },
    /// `count` Queued paths became watchable, i.e. they were created since
    /// the previous check.
    PathsAppeared { count: usize },
}

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Deliver the configured signal to the command once.
    DeliverSignal(SignalReason),
}

/// Decision returned by the core after handling a batch or a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
}

impl CoreStep {
    /// Number of signal deliveries requested.
    pub fn signal_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, CoreCommand::DeliverSignal(_)))
            .count()
    }
}

/// Apply the policy for a single change record.
///
/// - content changed: request one signal.
/// - handle invalidated: release the watch (an already released watch is
///   fine) and requeue every target holding it.
/// - auto removed: requeue every target holding the handle.
/// - queue overflow: release and requeue every Active target.
///
/// A target that is no longer Active was already requeued by an earlier
/// record of the same batch; that record is skipped.
pub fn handle_change_record<B>(
    set: &mut WatchSet<B::Handle>,
    backend: &mut B,
    record: ChangeRecord<B::Handle>,
    commands: &mut Vec<CoreCommand>,
) where
    B: WatchBackend,
{
    if record.mask.contains(EventMask::Q_OVERFLOW) {
        resync_after_overflow(set, backend);
        return;
    }

    let class = record.class();
    let targets = set.find_all_active(&record.handle);

    if class.content_changed {
        let path = targets.first().map(|&id| set.target(id).path().to_path_buf());
        debug!(?path, mask = ?record.mask, "watched path changed");
        commands.push(CoreCommand::DeliverSignal(SignalReason::ContentChanged { path }));
    }

    if class.handle_invalidated {
        if let Err(err) = backend.remove_watch(record.handle.clone()) {
            // The kernel may have dropped it already, depending on the order
            // in which the records were read.
            debug!(handle = ?record.handle, error = %err, "watch already released");
        }
    }

    if class.needs_requeue() {
        if targets.is_empty() {
            debug!(handle = ?record.handle, "target already requeued");
        }
        // Duplicate paths share the handle: all of them lose it together.
        for id in targets {
            set.requeue(id);
        }
    }
}

/// Lost records may include `IN_IGNORED` for any watch, so no Active handle
/// can be trusted. Release them all and let the retry that follows the
/// batch rebuild the Active set.
fn resync_after_overflow<B>(set: &mut WatchSet<B::Handle>, backend: &mut B)
where
    B: WatchBackend,
{
    warn!(
        active = set.active_len(),
        "inotify queue overflowed; some change notifications were lost, re-arming all watches"
    );
    for handle in set.requeue_all() {
        if let Err(err) = backend.remove_watch(handle.clone()) {
            debug!(?handle, error = %err, "watch already released");
        }
    }
}

/// Re-arm Queued targets and request a signal if any of them came into
/// existence.
pub fn handle_retry<B>(
    set: &mut WatchSet<B::Handle>,
    backend: &mut B,
    commands: &mut Vec<CoreCommand>,
) -> Result<()>
where
    B: WatchBackend,
{
    let count = set.activate_pending(backend)?;
    if count > 0 {
        commands.push(CoreCommand::DeliverSignal(SignalReason::PathsAppeared { count }));
    }
    Ok(())
}
