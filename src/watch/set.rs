// src/watch/set.rs

//! Watch targets partitioned into Queued and Active.
//!
//! Targets live in an arena (`Vec<WatchTarget>`) and are addressed by a
//! stable [`TargetId`]. The two states are two ordered index collections; a
//! target id is in exactly one of them, and its handle is `Some` iff it is
//! in `active`.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{FtrapError, Result};
use crate::watch::backend::WatchBackend;

/// Stable index of a target inside a [`WatchSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One configured path plus its current watch state.
#[derive(Debug, Clone)]
pub struct WatchTarget<H> {
    path: PathBuf,
    handle: Option<H>,
}

impl<H> WatchTarget<H> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }
}

pub struct WatchSet<H> {
    targets: Vec<WatchTarget<H>>,
    queued: VecDeque<TargetId>,
    active: Vec<TargetId>,
}

impl<H: fmt::Debug> fmt::Debug for WatchSet<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSet")
            .field("queued", &self.queued.len())
            .field("active", &self.active.len())
            .finish_non_exhaustive()
    }
}

impl<H> Default for WatchSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> WatchSet<H> {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            queued: VecDeque::new(),
            active: Vec::new(),
        }
    }

    /// Append a new target in the Queued state. The path does not need to
    /// exist.
    pub fn enqueue(&mut self, path: impl Into<PathBuf>) -> TargetId {
        let id = TargetId(self.targets.len());
        self.targets.push(WatchTarget {
            path: path.into(),
            handle: None,
        });
        self.queued.push_back(id);
        id
    }

    pub fn target(&self, id: TargetId) -> &WatchTarget<H> {
        &self.targets[id.0]
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn queued(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.queued.iter().copied()
    }

    pub fn active(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.active.iter().copied()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, id: TargetId) -> bool {
        self.targets[id.0].handle.is_some()
    }

    /// Move an Active target back to Queued and forget its handle.
    ///
    /// Requeued targets go to the front so they are retried first. Calling
    /// this on a target that is already Queued leaves it untouched.
    pub fn requeue(&mut self, id: TargetId) {
        let Some(pos) = self.active.iter().position(|&a| a == id) else {
            debug!(target_id = id.0, "requeue of a target that is not active; ignoring");
            return;
        };
        self.active.remove(pos);
        self.targets[id.0].handle = None;
        self.queued.push_front(id);
        debug!(path = %self.targets[id.0].path.display(), "target requeued");
    }
}

impl<H: Clone + Eq + fmt::Debug> WatchSet<H> {
    /// Look up the Active target watched through `handle`.
    ///
    /// `None` is a normal outcome: the target may already have been requeued
    /// by an earlier record of the same batch.
    pub fn find_active(&self, handle: &H) -> Option<TargetId> {
        self.active
            .iter()
            .copied()
            .find(|id| self.targets[id.0].handle.as_ref() == Some(handle))
    }

    /// Every Active target watched through `handle`, in activation order.
    ///
    /// The kernel hands out one handle per inode, so targets naming the same
    /// file share it.
    pub fn find_all_active(&self, handle: &H) -> Vec<TargetId> {
        self.active
            .iter()
            .copied()
            .filter(|id| self.targets[id.0].handle.as_ref() == Some(handle))
            .collect()
    }

    /// Requeue every Active target, returning the distinct handles they held.
    ///
    /// Relative order is preserved at the front of the queue.
    pub fn requeue_all(&mut self) -> Vec<H> {
        let mut released: Vec<H> = Vec::new();
        let ids: Vec<TargetId> = self.active.iter().rev().copied().collect();
        for id in ids {
            if let Some(handle) = self.targets[id.0].handle.clone() {
                if !released.contains(&handle) {
                    released.push(handle);
                }
            }
            self.requeue(id);
        }
        released
    }

    /// Try to establish a watch on every Queued target.
    ///
    /// Returns how many targets became Active. Targets whose path does not
    /// exist stay Queued. Any other OS error aborts the scan and is returned;
    /// targets activated before the failure stay Active.
    pub fn activate_pending<B>(&mut self, backend: &mut B) -> Result<usize>
    where
        B: WatchBackend<Handle = H>,
    {
        let mut activated = 0;
        let mut cursor = 0;

        while cursor < self.queued.len() {
            let id = self.queued[cursor];
            let target = &mut self.targets[id.0];

            match backend.add_watch(&target.path) {
                Ok(handle) => {
                    debug!(path = %target.path.display(), ?handle, "watch established");
                    target.handle = Some(handle);
                    // Removing at `cursor` shifts the next node into place.
                    self.queued.remove(cursor);
                    self.active.push(id);
                    activated += 1;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    cursor += 1;
                }
                Err(err) => {
                    return Err(FtrapError::Watch {
                        path: target.path.clone(),
                        source: err,
                    });
                }
            }
        }

        if activated > 0 {
            info!(activated, pending = self.queued.len(), "activated watches");
        }
        Ok(activated)
    }
}
