//! Error types for a sharding run.
//!
//! Errors are split by blast radius. [`ShardError`] aborts the whole run;
//! [`FileError`] only abandons the input file it was raised for. Row-level
//! drops are not errors at all, see [`crate::model::RowSkip`].
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Any of these stops the run.
#[derive(Debug, Error)]
pub enum ShardError {
    #[error("could not create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not open shard file {} for writing: {source}", path.display())]
    OpenShard {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write to shard file {}: {source}", path.display())]
    WriteShard {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors local to a single input file. The run continues with the next file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not open file: {0}")]
    Open(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("header does not match expected fields (found: {found})")]
    HeaderMismatch { found: String },

    #[error("record on line {line} has {count} fields, expected 11")]
    ExtraFields { line: u64, count: usize },
}

impl FileError {
    /// `true` when the file was rejected up front rather than failing mid-read.
    pub fn is_header_mismatch(&self) -> bool {
        matches!(self, Self::HeaderMismatch { .. })
    }
}
