// src/watch/event.rs

//! Change records and their policy buckets.

use inotify::{EventMask, WatchMask};

/// Events requested for every watched path.
///
/// - `CLOSE_WRITE`: the file was closed after being opened for writing.
/// - `DELETE_SELF`: the file was deleted, or clobbered by a rename onto it.
/// - `MOVE_SELF`: the file was moved somewhere else.
/// - `ATTRIB`: also fired when the file is unlinked while other hardlinks
///   remain (no `DELETE_SELF` in that case).
/// - `CREATE`: an entry was created inside a watched directory.
pub const WATCH_MASK: WatchMask = WatchMask::CLOSE_WRITE
    .union(WatchMask::DELETE_SELF)
    .union(WatchMask::MOVE_SELF)
    .union(WatchMask::ATTRIB)
    .union(WatchMask::CREATE);

/// One decoded change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord<H> {
    pub handle: H,
    pub mask: EventMask,
}

impl<H> ChangeRecord<H> {
    pub fn new(handle: H, mask: EventMask) -> Self {
        Self { handle, mask }
    }

    pub fn class(&self) -> ChangeClass {
        ChangeClass::from_mask(self.mask)
    }
}

/// Policy buckets a record falls into. A single mask may hit several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeClass {
    /// Content was written, or an entry was created: signal the command.
    pub content_changed: bool,
    /// Moved away or attribute change: release the handle and requeue.
    pub handle_invalidated: bool,
    /// The kernel dropped the watch on its own: requeue only.
    pub auto_removed: bool,
}

impl ChangeClass {
    pub fn from_mask(mask: EventMask) -> Self {
        Self {
            content_changed: mask.intersects(EventMask::CLOSE_WRITE | EventMask::CREATE),
            handle_invalidated: mask.intersects(EventMask::MOVE_SELF | EventMask::ATTRIB),
            auto_removed: mask.contains(EventMask::IGNORED),
        }
    }

    pub fn needs_requeue(self) -> bool {
        self.handle_invalidated || self.auto_removed
    }
}
