// src/watch/mock.rs

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use super::WatchBackend;

/// Handle type handed out by [`MockWatchBackend`].
pub type MockHandle = u32;

/// In-memory stand-in for inotify.
///
/// Paths "exist" once [`create`](Self::create)d. Like the kernel, a path
/// has at most one live watch: adding it again returns the same handle.
/// Watches can be dropped out of band to mimic the kernel removing them,
/// and permanent errors can be injected per path.
#[derive(Debug, Clone, Default)]
pub struct MockWatchBackend {
    existing: HashSet<PathBuf>,
    failing: HashMap<PathBuf, io::ErrorKind>,
    live: BTreeMap<MockHandle, PathBuf>,
    next_handle: MockHandle,
    add_attempts: Vec<PathBuf>,
    removed: Vec<MockHandle>,
}

impl MockWatchBackend {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            ..Self::default()
        }
    }

    pub fn create(&mut self, path: impl AsRef<Path>) {
        self.existing.insert(path.as_ref().to_path_buf());
    }

    /// Remove the path and every watch on it, returning the dropped handles
    /// (the kernel would report them as `IN_IGNORED`).
    pub fn delete(&mut self, path: impl AsRef<Path>) -> Vec<MockHandle> {
        let path = path.as_ref();
        self.existing.remove(path);
        let dropped: Vec<MockHandle> = self
            .live
            .iter()
            .filter(|(_, p)| p.as_path() == path)
            .map(|(h, _)| *h)
            .collect();
        for h in &dropped {
            self.live.remove(h);
        }
        dropped
    }

    /// Make every future `add_watch` on `path` fail with `kind`.
    pub fn fail_with(&mut self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.failing.insert(path.as_ref().to_path_buf(), kind);
    }

    /// Forget a watch without going through `remove_watch`.
    pub fn drop_watch(&mut self, handle: MockHandle) {
        self.live.remove(&handle);
    }

    pub fn is_live(&self, handle: MockHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Every path passed to `add_watch`, in call order.
    pub fn add_attempts(&self) -> &[PathBuf] {
        &self.add_attempts
    }

    /// Handles successfully released through `remove_watch`.
    pub fn removed(&self) -> &[MockHandle] {
        &self.removed
    }
}

impl WatchBackend for MockWatchBackend {
    type Handle = MockHandle;

    fn add_watch(&mut self, path: &Path) -> io::Result<MockHandle> {
        self.add_attempts.push(path.to_path_buf());

        if let Some(kind) = self.failing.get(path) {
            return Err(io::Error::from(*kind));
        }
        if !self.existing.contains(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }

        // One watch per file, as with inotify: re-adding returns it.
        if let Some((&handle, _)) = self.live.iter().find(|(_, p)| p.as_path() == path) {
            return Ok(handle);
        }

        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle, path.to_path_buf());
        Ok(handle)
    }

    fn remove_watch(&mut self, handle: MockHandle) -> io::Result<()> {
        match self.live.remove(&handle) {
            Some(_) => {
                self.removed.push(handle);
                Ok(())
            }
            None => Err(io::Error::from(io::ErrorKind::InvalidInput)),
        }
    }
}
