//! Progress reporting: lightweight events emitted by the pipeline as it
//! walks through the discovered files.
//!
//! Every event is also logged through `tracing`; these values exist so
//! that library callers (and tests) can observe a run without parsing log
//! output.
use crate::pipeline::RunSummary;
use std::path::PathBuf;

/// Progress events from a sharding run, in the order they occur.
#[derive(Debug)]
pub enum ShardProgress {
    /// Discovery finished with `total` candidate files.
    Discovered { total: usize, walk_errors: u64 },
    /// The root held no `.csv` files. Outputs are header-only.
    NoFilesFound,
    /// Starting file `index` of `total` (1-based).
    FileStarted {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    /// The file's header did not match the schema. No rows were read.
    FileSkipped { path: PathBuf, message: String },
    /// Reading the file failed part way through. Rows routed before the
    /// failure stay written.
    FileFailed {
        path: PathBuf,
        message: String,
        rows_written: u64,
    },
    /// The run finished and both shards are flushed.
    Complete(RunSummary),
}
