// src/watch/backend.rs

use std::fmt::Debug;
use std::io;
use std::path::Path;

/// OS-level watch facility the [`WatchSet`](super::WatchSet) drives.
///
/// Production code uses the inotify-backed
/// [`ChangeSource`](super::ChangeSource); tests use
/// [`MockWatchBackend`](super::mock::MockWatchBackend).
pub trait WatchBackend {
    /// Opaque identifier of one established watch.
    type Handle: Clone + Eq + Debug;

    /// Start watching `path`.
    ///
    /// An error of kind [`io::ErrorKind::NotFound`] means the path does not
    /// exist right now and is retried later; any other error is permanent.
    fn add_watch(&mut self, path: &Path) -> io::Result<Self::Handle>;

    /// Stop watching. Fails if the OS has already dropped the watch.
    fn remove_watch(&mut self, handle: Self::Handle) -> io::Result<()>;
}
