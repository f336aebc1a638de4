//! hashshard core: discovery, classification and shard routing.
//!
//! This crate holds all pipeline logic with no CLI dependencies. The
//! binary in the workspace root is a thin wrapper around [`pipeline::run`].
//!
//! # Modules
//!
//! - [`model`]: The fixed address schema and hash-parity classification.
//! - [`scanner`]: Recursive `.csv` discovery and progress events.
//! - [`pipeline`]: Shard sinks, per-file classification and the run driver.
//! - [`config`]: Run parameters.
//! - [`error`]: Fatal and file-local error types.
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod scanner;

pub use config::ShardConfig;
pub use error::{FileError, ShardError};
pub use pipeline::{run, run_with_progress, RunSummary};
