//! Run parameters.
//!
//! There is no config file and no environment lookup: a run is fully
//! described by the input root and the output directory.
use std::path::{Path, PathBuf};

/// Output directory used when the caller does not name one.
pub const DEFAULT_OUTPUT_DIR: &str = "classified_output";

/// Parameters for a single sharding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardConfig {
    /// Directory walked recursively for `.csv` inputs.
    pub root_dir: PathBuf,
    /// Directory receiving `shard_0_data.csv` and `shard_1_data.csv`.
    pub output_dir: PathBuf,
}

impl ShardConfig {
    /// Config for `root_dir` writing into [`DEFAULT_OUTPUT_DIR`].
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Sets the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Directory walked for inputs.
    pub fn root(&self) -> &Path {
        &self.root_dir
    }
}
