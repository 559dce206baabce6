//! tidybot - Keeps your Downloads folder tidy
//!
//! This library provides utilities for loading a self-healing category
//! configuration, scanning a directory non-recursively, classifying files by
//! extension, moving them into category folders without ever overwriting,
//! and logging every action, with a dry-run mode that only reports.

pub mod category;
pub mod cli;
pub mod config;
pub mod filters;
pub mod mover;
pub mod report;
pub mod scanner;

pub use category::{CategoryMap, FALLBACK_CATEGORY};
pub use config::{AppPaths, Config, ConfigError, LoadStatus};
pub use filters::{CompiledIgnore, FilterError, IgnoreConfig};
pub use mover::{MoveError, MoveRecord, Mover};
pub use report::Reporter;
pub use scanner::{ScanError, ScannedFile, scan_directory};

pub use cli::{RunOptions, run};
