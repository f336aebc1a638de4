//! Address records and the fixed column schema.
//!
//! Field values are opaque text. Nothing is parsed or coerced; the only
//! field the pipeline ever looks inside is `HASH`.
use csv::StringRecord;

/// Column names, in the order every input header and output row must use.
pub const FIELDNAMES: [&str; 11] = [
    "LON", "LAT", "NUMBER", "STREET", "UNIT", "CITY", "DISTRICT", "REGION", "POSTCODE", "ID",
    "HASH",
];

/// Position of `HASH` within [`FIELDNAMES`].
pub const HASH_INDEX: usize = 10;

/// Returns `true` if `header` is exactly the fixed schema: same names,
/// same order, same count. Names are case-sensitive.
pub fn header_matches(header: &StringRecord) -> bool {
    header.len() == FIELDNAMES.len() && header.iter().zip(FIELDNAMES).all(|(a, b)| a == b)
}

/// One data row read from an input file.
///
/// Rows are kept as read: short rows are not padded and long rows are not
/// truncated, so the classifier can decide what to do with them.
#[derive(Debug, Clone)]
pub struct AddressRecord {
    inner: StringRecord,
}

impl AddressRecord {
    pub fn new(inner: StringRecord) -> Self {
        Self { inner }
    }

    /// The `HASH` field, or `None` if the row is too short to have one.
    #[inline]
    pub fn hash(&self) -> Option<&str> {
        self.inner.get(HASH_INDEX)
    }

    /// Number of fields actually present on this row.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.inner.len()
    }

    /// 1-based line number the row started on, when known.
    pub fn line(&self) -> u64 {
        self.inner.position().map_or(0, |p| p.line())
    }

    pub fn as_record(&self) -> &StringRecord {
        &self.inner
    }
}
