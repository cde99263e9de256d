// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Tracking which configured paths are watched by the kernel (Active) and
//!   which are still waiting to exist (Queued).
//! - Owning the inotify channel and decoding its raw event batches.
//! - Classifying each change record into a policy bucket.
//!
//! It does **not** know about the child process; deciding when to signal
//! lives in [`crate::engine`].

pub mod backend;
pub mod event;
pub mod mock;
pub mod set;
pub mod source;

pub use backend::WatchBackend;
pub use event::{ChangeClass, ChangeRecord, WATCH_MASK};
pub use set::{TargetId, WatchSet, WatchTarget};
pub use source::ChangeSource;
