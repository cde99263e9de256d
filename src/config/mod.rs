// src/config/mod.rs

//! Configuration loading and validation for ftrap.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the resolved settings (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Merge CLI flags over the file and validate the result (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, resolve_settings};
pub use model::{DEFAULT_INTERVAL_MS, RawConfigFile, TrapSettings};
pub use validate::validate_settings;
