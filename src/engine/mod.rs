// src/engine/mod.rs

//! Orchestration engine for ftrap.
//!
//! This module ties together:
//! - the watch set (which paths the kernel is watching, which are pending)
//! - the per-record policy for change notifications
//! - the main loop that reacts to:
//!   - inotify batches
//!   - the retry tick for paths that do not exist yet
//!   - the command's exit
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep, SignalReason};
pub use runtime::Runtime;
