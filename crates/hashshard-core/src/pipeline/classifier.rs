//! Per-file classification: stream one input file's rows into the shards.
//!
//! Failures are split in two. A [`FileError`] abandons the current file
//! only. A [`ShardError`] comes from the output side and ends the run.
use crate::error::{FileError, ShardError};
use crate::model::{classify_hash, header_matches, AddressRecord, RowSkip, FIELDNAMES};
use crate::pipeline::sink::ShardSinks;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Why [`classify_file`] stopped early.
#[derive(Debug)]
pub enum FileFailure {
    /// This file is unusable. Move on to the next one.
    Local(FileError),
    /// The shard outputs are broken. Abort the run.
    Fatal(ShardError),
}

impl From<FileError> for FileFailure {
    fn from(e: FileError) -> Self {
        Self::Local(e)
    }
}

impl From<ShardError> for FileFailure {
    fn from(e: ShardError) -> Self {
        Self::Fatal(e)
    }
}

/// Rows dropped without being routed, by reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowTally {
    pub missing_hash: u64,
    pub invalid_hex: u64,
}

impl RowTally {
    pub fn record(&mut self, skip: RowSkip) {
        match skip {
            RowSkip::MissingHash => self.missing_hash += 1,
            RowSkip::InvalidHexDigit(_) => self.invalid_hex += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.missing_hash + self.invalid_hex
    }
}

/// Route every classifiable row of `path` into `sinks`.
///
/// Returns the number of rows routed from this file. Dropped rows are
/// added to `tally` as they are seen, so the counts stay accurate even if
/// the file later fails. Rows routed before a failure are not rolled back.
pub fn classify_file(
    path: &Path,
    sinks: &mut ShardSinks,
    tally: &mut RowTally,
) -> Result<u64, FileFailure> {
    let file = File::open(path).map_err(FileError::Open)?;
    let mut input = BufReader::new(file);
    if let Some(found) = raw_header_mismatch(input.fill_buf().map_err(FileError::Open)?) {
        return Err(FileError::HeaderMismatch { found }.into());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let header = reader.headers().map_err(FileError::Csv)?;
    if !header_matches(header) {
        let found = header.iter().collect::<Vec<_>>().join(",");
        return Err(FileError::HeaderMismatch { found }.into());
    }

    let mut routed: u64 = 0;
    for result in reader.records() {
        let row = AddressRecord::new(result.map_err(FileError::Csv)?);

        let shard = match row.hash().map_or(Err(RowSkip::MissingHash), classify_hash) {
            Ok(shard) => shard,
            Err(skip) => {
                debug!(line = row.line(), ?skip, "Dropping row from {}", path.display());
                tally.record(skip);
                continue;
            }
        };

        // A routed row must fit the output schema exactly.
        if row.field_count() > FIELDNAMES.len() {
            return Err(FileError::ExtraFields {
                line: row.line(),
                count: row.field_count(),
            }
            .into());
        }

        sinks.route(shard, &row)?;
        routed += 1;
    }

    Ok(routed)
}

/// The csv reader silently drops a UTF-8 BOM and blank lines ahead of the
/// header. Either one means the file's first line is not the schema header.
fn raw_header_mismatch(head: &[u8]) -> Option<String> {
    if !(head.starts_with(UTF8_BOM) || head.starts_with(b"\n") || head.starts_with(b"\r")) {
        return None;
    }
    let first = head.split(|&b| b == b'\n').next().unwrap_or_default();
    Some(String::from_utf8_lossy(first).trim_end_matches('\r').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "LON,LAT,NUMBER,STREET,UNIT,CITY,DISTRICT,REGION,POSTCODE,ID,HASH";

    fn row(id: &str, hash: &str) -> String {
        format!("-1.5,2.5,10,High St,,Town,,RG,AB1,{id},{hash}")
    }

    fn write_input(dir: &Path, name: &str, lines: &[String]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    }

    fn shard_lines(dir: &Path, name: &str) -> Vec<String> {
        fs::read_to_string(dir.join(name))
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn routes_rows_by_parity_and_counts_drops() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let input = write_input(
            tmp.path(),
            "in.csv",
            &[
                HEADER.to_string(),
                row("1", "00a2"),
                row("2", "00f7"),
                row("3", "00zz"),
                row("4", ""),
                row("5", "00AC"),
            ],
        );

        let mut sinks = ShardSinks::open(&out).unwrap();
        let mut tally = RowTally::default();
        let routed = classify_file(&input, &mut sinks, &mut tally).unwrap();
        assert_eq!(routed, 3);
        assert_eq!(sinks.finish().unwrap(), [2, 1]);
        assert_eq!(
            tally,
            RowTally {
                missing_hash: 1,
                invalid_hex: 1
            }
        );

        let even = shard_lines(&out, "shard_0_data.csv");
        assert_eq!(even, vec![HEADER.to_string(), row("1", "00a2"), row("5", "00AC")]);
        let odd = shard_lines(&out, "shard_1_data.csv");
        assert_eq!(odd, vec![HEADER.to_string(), row("2", "00f7")]);
    }

    #[test]
    fn header_mismatch_is_reported_without_reading_rows() {
        let tmp = TempDir::new().unwrap();
        let input = write_input(
            tmp.path(),
            "bad.csv",
            &[
                "LON,LAT,NUMBER,STREET,UNIT,CITY,DISTRICT,REGION,POSTCODE,ID".to_string(),
                "1,2,3,4,5,6,7,8,9,10".to_string(),
            ],
        );

        let mut sinks = ShardSinks::open(&tmp.path().join("out")).unwrap();
        let mut tally = RowTally::default();
        let err = classify_file(&input, &mut sinks, &mut tally).unwrap_err();
        match err {
            FileFailure::Local(e) => assert!(e.is_header_mismatch(), "unexpected: {e}"),
            FileFailure::Fatal(e) => panic!("unexpected fatal error: {e}"),
        }
        assert_eq!(sinks.rows_written(), 0);
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn empty_file_is_a_header_mismatch() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("empty.csv");
        fs::write(&input, "").unwrap();

        let mut sinks = ShardSinks::open(&tmp.path().join("out")).unwrap();
        let err = classify_file(&input, &mut sinks, &mut RowTally::default()).unwrap_err();
        assert!(matches!(err, FileFailure::Local(ref e) if e.is_header_mismatch()));
    }

    #[test]
    fn leading_bom_is_a_header_mismatch() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("bom.csv");
        fs::write(&input, format!("\u{feff}{HEADER}\n{}\n", row("1", "02"))).unwrap();

        let mut sinks = ShardSinks::open(&tmp.path().join("out")).unwrap();
        let err = classify_file(&input, &mut sinks, &mut RowTally::default()).unwrap_err();
        match err {
            FileFailure::Local(FileError::HeaderMismatch { found }) => {
                assert_eq!(found, format!("\u{feff}{HEADER}"));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
        assert_eq!(sinks.rows_written(), 0);
    }

    #[test]
    fn blank_first_line_is_a_header_mismatch() {
        let tmp = TempDir::new().unwrap();
        for (name, text) in [
            ("lf.csv", format!("\n{HEADER}\n{}\n", row("1", "03"))),
            ("crlf.csv", format!("\r\n{HEADER}\r\n{}\r\n", row("2", "05"))),
        ] {
            let input = tmp.path().join(name);
            fs::write(&input, text).unwrap();

            let mut sinks = ShardSinks::open(&tmp.path().join("out")).unwrap();
            let err = classify_file(&input, &mut sinks, &mut RowTally::default()).unwrap_err();
            match err {
                FileFailure::Local(FileError::HeaderMismatch { found }) => {
                    assert!(found.is_empty(), "{name}: found {found:?}")
                }
                other => panic!("{name}: unexpected failure: {other:?}"),
            }
            assert_eq!(sinks.rows_written(), 0, "{name}");
        }
    }

    #[test]
    fn short_rows_are_dropped_as_missing_hash() {
        let tmp = TempDir::new().unwrap();
        let input = write_input(
            tmp.path(),
            "short.csv",
            &[HEADER.to_string(), "1,2,3".to_string(), row("9", "08")],
        );

        let mut sinks = ShardSinks::open(&tmp.path().join("out")).unwrap();
        let mut tally = RowTally::default();
        let routed = classify_file(&input, &mut sinks, &mut tally).unwrap();
        assert_eq!(routed, 1);
        assert_eq!(tally.missing_hash, 1);
    }

    #[test]
    fn over_long_routed_row_aborts_rest_of_file() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let input = write_input(
            tmp.path(),
            "long.csv",
            &[
                HEADER.to_string(),
                row("1", "02"),
                row("2", "04") + ",extra",
                row("3", "06"),
            ],
        );

        let mut sinks = ShardSinks::open(&out).unwrap();
        let err = classify_file(&input, &mut sinks, &mut RowTally::default()).unwrap_err();
        match err {
            FileFailure::Local(FileError::ExtraFields { line, count }) => {
                assert_eq!(line, 3);
                assert_eq!(count, 12);
            }
            other => panic!("unexpected failure: {other:?}"),
        }
        assert_eq!(sinks.finish().unwrap(), [1, 0]);
        assert_eq!(shard_lines(&out, "shard_0_data.csv").len(), 2);
    }

    #[test]
    fn invalid_utf8_fails_the_file() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("latin1.csv");
        let mut bytes = format!("{HEADER}\n").into_bytes();
        bytes.extend_from_slice(b"1,2,3,Caf\xe9,,Town,,RG,AB1,1,02\n");
        fs::write(&input, bytes).unwrap();

        let mut sinks = ShardSinks::open(&tmp.path().join("out")).unwrap();
        let err = classify_file(&input, &mut sinks, &mut RowTally::default()).unwrap_err();
        assert!(matches!(err, FileFailure::Local(FileError::Csv(_))));
        assert_eq!(sinks.rows_written(), 0);
    }

    #[test]
    fn quoted_fields_survive_round_trip() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let quoted = "-1,2,3,\"Line one\nLine two\",,\"Town, Shire\",,RG,AB1,7,\"0\"\"1\"".to_string();
        let input = write_input(tmp.path(), "q.csv", &[HEADER.to_string(), quoted]);

        let mut sinks = ShardSinks::open(&out).unwrap();
        let routed = classify_file(&input, &mut sinks, &mut RowTally::default()).unwrap();
        assert_eq!(routed, 1);
        sinks.finish().unwrap();

        let text = fs::read_to_string(out.join("shard_1_data.csv")).unwrap();
        assert!(
            text.ends_with("-1,2,3,\"Line one\nLine two\",,\"Town, Shire\",,RG,AB1,7,\"0\"\"1\"\r\n"),
            "unexpected shard contents: {text:?}"
        );
    }

    #[test]
    fn missing_input_file_fails_locally() {
        let tmp = TempDir::new().unwrap();
        let mut sinks = ShardSinks::open(&tmp.path().join("out")).unwrap();
        let err = classify_file(
            &tmp.path().join("gone.csv"),
            &mut sinks,
            &mut RowTally::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FileFailure::Local(FileError::Open(_))));
    }
}
