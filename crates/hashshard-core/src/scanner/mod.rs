//! Scanner module: finds candidate input files.
//!
//! Walks the root with `jwalk` in serial mode and keeps every regular file
//! whose name ends in `.csv` (case-sensitive). Hidden files and directories
//! are not special: `.csv` and `.foo.csv` both qualify. Results are sorted
//! by their raw path string so that runs over the same tree route rows in
//! the same order.
pub mod progress;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of walking an input root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Candidate `.csv` files, sorted by raw path string.
    pub files: Vec<PathBuf>,
    /// Entries the walker could not read (permission denied, missing root).
    pub walk_errors: u64,
}

/// Recursively collect every `.csv` file under `root`.
///
/// Any path in `exclude` is left out. Paths are compared after
/// canonicalisation, so `exclude` may be given in any form that resolves
/// to an existing file. A missing or unreadable root yields an empty
/// result plus a walk error, never a hard failure.
pub fn discover_csv_files(root: &Path, exclude: &[PathBuf]) -> Discovery {
    let excluded: Vec<PathBuf> = exclude
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .collect();

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial);

    let mut discovery = Discovery::default();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                discovery.walk_errors += 1;
                let err_path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warn!("Could not read {err_path} while searching for CSV files: {err}");
                continue;
            }
        };

        let path = entry.path();
        if !has_csv_name(&path) || !is_regular_file(&path, entry.file_type()) {
            continue;
        }

        if !excluded.is_empty() {
            if let Ok(canonical) = fs::canonicalize(&path) {
                if excluded.contains(&canonical) {
                    debug!("Skipping shard output {}", path.display());
                    continue;
                }
            }
        }

        discovery.files.push(path);
    }

    discovery.files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    discovery
}

fn has_csv_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(b".csv"))
}

/// Regular files, plus symlinks that resolve to one.
fn is_regular_file(path: &Path, file_type: fs::FileType) -> bool {
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink() && fs::metadata(path).is_ok_and(|m| m.is_file())
}
