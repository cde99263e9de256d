// src/exec/mod.rs

//! Process supervision layer.
//!
//! - [`child`] spawns the command with `tokio::process::Command`, delivers
//!   the configured signal with `nix`, and reaps it exactly once.
//! - [`exit`] mirrors the command's termination as `ftrap`'s own.

pub mod child;
pub mod exit;

pub use child::{ChildSupervisor, Disposition};
pub use exit::exit_with;
