// src/watch/source.rs

use std::io;
use std::path::Path;

use inotify::{Inotify, WatchDescriptor, Watches};
use tokio::io::unix::AsyncFd;
use tracing::{debug, trace};

use crate::errors::{FtrapError, Result};
use crate::watch::backend::WatchBackend;
use crate::watch::event::{ChangeRecord, WATCH_MASK};

/// Room for many records per read; one record needs at most
/// `sizeof(inotify_event) + NAME_MAX + 1` bytes.
const EVENT_BUFFER_SIZE: usize = 4096;

/// The inotify channel.
///
/// The descriptor is non-blocking and registered with the Tokio reactor, so
/// readiness can be awaited next to the child's exit. Both the descriptor
/// and every watch on it are released when this value is dropped.
pub struct ChangeSource {
    fd: AsyncFd<Inotify>,
    watches: Watches,
    buffer: Box<[u8; EVENT_BUFFER_SIZE]>,
}

impl std::fmt::Debug for ChangeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSource").finish_non_exhaustive()
    }
}

impl ChangeSource {
    /// Create the inotify instance. Must be called inside a Tokio runtime.
    pub fn new() -> Result<Self> {
        let inotify = Inotify::init().map_err(FtrapError::NotifyInit)?;
        let watches = inotify.watches();
        let fd = AsyncFd::new(inotify).map_err(FtrapError::NotifyInit)?;
        debug!("inotify channel created");
        Ok(Self {
            fd,
            watches,
            buffer: Box::new([0u8; EVENT_BUFFER_SIZE]),
        })
    }

    /// Wait until the channel is readable, then decode everything one read
    /// returns into a batch.
    ///
    /// Cancel safe: records are only taken out of the kernel inside the same
    /// poll that returns them.
    pub async fn read_batch(&mut self) -> Result<Vec<ChangeRecord<WatchDescriptor>>> {
        let Self { fd, buffer, .. } = self;

        loop {
            let mut guard = fd.readable_mut().await.map_err(FtrapError::ReadEvents)?;

            let read = guard.try_io(|inner| {
                let events = inner.get_mut().read_events(&mut buffer[..])?;
                Ok(events
                    .map(|event| ChangeRecord::new(event.wd, event.mask))
                    .collect::<Vec<_>>())
            });

            match read {
                Ok(Ok(records)) => {
                    trace!(count = records.len(), "decoded inotify batch");
                    return Ok(records);
                }
                Ok(Err(err)) if err.kind() == io::ErrorKind::Interrupted => continue,
                Ok(Err(err)) => return Err(FtrapError::ReadEvents(err)),
                // Spurious readiness; readiness was cleared, wait again.
                Err(_would_block) => continue,
            }
        }
    }
}

impl WatchBackend for ChangeSource {
    type Handle = WatchDescriptor;

    fn add_watch(&mut self, path: &Path) -> io::Result<WatchDescriptor> {
        self.watches.add(path, WATCH_MASK)
    }

    fn remove_watch(&mut self, handle: WatchDescriptor) -> io::Result<()> {
        self.watches.remove(handle)
    }
}

