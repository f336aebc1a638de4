//! The two shard output files.
//!
//! Both files are created (or truncated) and given the schema header before
//! any input is read. Rows are appended through the `csv` writer's internal
//! buffer and flushed once in [`ShardSinks::finish`]; dropping the sinks
//! early still flushes on a best-effort basis.
use crate::error::ShardError;
use crate::model::{AddressRecord, ShardId, FIELDNAMES};
use csv::{Terminator, Writer, WriterBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Open writers for shard 0 and shard 1, indexed by [`ShardId::index`].
pub struct ShardSinks {
    writers: [Writer<File>; 2],
    paths: [PathBuf; 2],
    rows: [u64; 2],
}

impl ShardSinks {
    /// Create `output_dir` if needed, then create both shard files and
    /// write the header line to each.
    pub fn open(output_dir: &Path) -> Result<Self, ShardError> {
        if !output_dir.is_dir() {
            fs::create_dir_all(output_dir).map_err(|source| ShardError::CreateOutputDir {
                path: output_dir.to_path_buf(),
                source,
            })?;
            info!("Created output directory: {}", output_dir.display());
        }

        let paths = ShardId::ALL.map(|shard| output_dir.join(shard.file_name()));
        let [even, odd] = &paths;
        let writers = [open_writer(even)?, open_writer(odd)?];

        let mut sinks = Self {
            writers,
            paths,
            rows: [0; 2],
        };
        for shard in ShardId::ALL {
            let i = shard.index();
            sinks.writers[i]
                .write_record(FIELDNAMES)
                .map_err(|source| ShardError::WriteShard {
                    path: sinks.paths[i].clone(),
                    source,
                })?;
        }
        Ok(sinks)
    }

    /// Append `record` to the shard's file, in schema order.
    ///
    /// The caller guarantees the record has exactly the schema's field count.
    pub fn route(&mut self, shard: ShardId, record: &AddressRecord) -> Result<(), ShardError> {
        debug_assert_eq!(record.field_count(), FIELDNAMES.len());
        let i = shard.index();
        self.writers[i]
            .write_record(record.as_record())
            .map_err(|source| ShardError::WriteShard {
                path: self.paths[i].clone(),
                source,
            })?;
        self.rows[i] += 1;
        Ok(())
    }

    /// Output file paths, indexed by [`ShardId::index`].
    pub fn paths(&self) -> &[PathBuf; 2] {
        &self.paths
    }

    /// Rows routed so far, across both shards.
    pub fn rows_written(&self) -> u64 {
        self.rows.iter().sum()
    }

    /// Flush both files and close them. Returns per-shard row counts.
    pub fn finish(mut self) -> Result<[u64; 2], ShardError> {
        for (writer, path) in self.writers.iter_mut().zip(&self.paths) {
            writer.flush().map_err(|e| ShardError::WriteShard {
                path: path.clone(),
                source: e.into(),
            })?;
        }
        Ok(self.rows)
    }
}

fn open_writer(path: &Path) -> Result<Writer<File>, ShardError> {
    let file = File::create(path).map_err(|source| ShardError::OpenShard {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(file))
}
