//! Pipeline module: drives a full sharding run.
//!
//! A run is strictly sequential:
//! 1. Open both shard files and write headers ([`sink::ShardSinks`]).
//! 2. Discover `.csv` inputs under the root ([`crate::scanner`]).
//! 3. Stream each file's rows through [`classifier::classify_file`].
//! 4. Flush both shards and report a [`RunSummary`].
//!
//! Only step 1 and shard writes can fail the run. Problems with an
//! individual input file are logged, reported as progress, and skipped.
pub mod classifier;
pub mod sink;

use crate::config::ShardConfig;
use crate::error::ShardError;
use crate::scanner::discover_csv_files;
use crate::scanner::progress::ShardProgress;
use classifier::{classify_file, FileFailure, RowTally};
use sink::ShardSinks;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Totals for a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows routed to either shard.
    pub rows_written: u64,
    /// Rows routed per shard, indexed by [`crate::model::ShardId::index`].
    pub shard_rows: [u64; 2],
    /// Candidate `.csv` files found under the root.
    pub files_found: usize,
    /// Files read to the end.
    pub files_processed: usize,
    /// Files rejected for a header mismatch.
    pub files_skipped: usize,
    /// Files abandoned part way through.
    pub files_failed: usize,
    /// Directory entries the walker could not read.
    pub walk_errors: u64,
    pub rows_missing_hash: u64,
    pub rows_invalid_hex: u64,
    /// Absolute path of the output directory.
    pub output_dir: PathBuf,
    pub duration: Duration,
}

/// Run the pipeline, reporting progress only through `tracing`.
pub fn run(config: &ShardConfig) -> Result<RunSummary, ShardError> {
    run_with_progress(config, |_| {})
}

/// Run the pipeline, calling `on_progress` for every [`ShardProgress`] event.
pub fn run_with_progress<F>(
    config: &ShardConfig,
    mut on_progress: F,
) -> Result<RunSummary, ShardError>
where
    F: FnMut(&ShardProgress),
{
    let start = Instant::now();

    let mut sinks = ShardSinks::open(&config.output_dir)?;

    info!("Starting to process directory: {}", config.root().display());
    let discovery = discover_csv_files(config.root(), sinks.paths());
    let total = discovery.files.len();
    on_progress(&ShardProgress::Discovered {
        total,
        walk_errors: discovery.walk_errors,
    });

    if total == 0 {
        warn!(
            "No CSV files found under {}. Please check the root directory path.",
            config.root().display()
        );
        on_progress(&ShardProgress::NoFilesFound);
    }

    let mut tally = RowTally::default();
    let mut files_processed = 0;
    let mut files_skipped = 0;
    let mut files_failed = 0;

    for (i, path) in discovery.files.iter().enumerate() {
        info!("[{}/{}] Processing file: {}", i + 1, total, path.display());
        on_progress(&ShardProgress::FileStarted {
            index: i + 1,
            total,
            path: path.clone(),
        });

        let rows_before = sinks.rows_written();
        match classify_file(path, &mut sinks, &mut tally) {
            Ok(routed) => {
                files_processed += 1;
                debug!("Routed {routed} rows from {}", path.display());
            }
            Err(FileFailure::Local(err)) if err.is_header_mismatch() => {
                files_skipped += 1;
                warn!(
                    "Header in file {} does not match expected fields. Skipping.",
                    path.display()
                );
                on_progress(&ShardProgress::FileSkipped {
                    path: path.clone(),
                    message: err.to_string(),
                });
            }
            Err(FileFailure::Local(err)) => {
                files_failed += 1;
                warn!("An error occurred while processing file {}: {err}", path.display());
                on_progress(&ShardProgress::FileFailed {
                    path: path.clone(),
                    message: err.to_string(),
                    rows_written: sinks.rows_written() - rows_before,
                });
            }
            Err(FileFailure::Fatal(err)) => return Err(err),
        }
    }

    let shard_rows = sinks.finish()?;
    let output_dir =
        std::path::absolute(&config.output_dir).unwrap_or_else(|_| config.output_dir.clone());

    let summary = RunSummary {
        rows_written: shard_rows.iter().sum(),
        shard_rows,
        files_found: total,
        files_processed,
        files_skipped,
        files_failed,
        walk_errors: discovery.walk_errors,
        rows_missing_hash: tally.missing_hash,
        rows_invalid_hex: tally.invalid_hex,
        output_dir,
        duration: start.elapsed(),
    };

    debug!(
        "Run complete in {:?}: {} processed, {} skipped, {} failed, {} rows dropped",
        summary.duration,
        files_processed,
        files_skipped,
        files_failed,
        tally.total()
    );
    info!("Total rows written: {}.", summary.rows_written);
    info!("Results saved to directory: {}", summary.output_dir.display());

    on_progress(&ShardProgress::Complete(summary.clone()));
    Ok(summary)
}
