//! Hash-parity classification.
//!
//! The last character of `HASH`, read as a hex digit, decides the shard:
//! even values go to shard 0, odd values to shard 1.

/// Destination shard for a classified row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardId {
    /// Last hex digit is one of `0 2 4 6 8 a c e`.
    Even,
    /// Last hex digit is one of `1 3 5 7 9 b d f`.
    Odd,
}

impl ShardId {
    /// Both shards, in index order.
    pub const ALL: [ShardId; 2] = [ShardId::Even, ShardId::Odd];

    /// Index into per-shard arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Even => 0,
            Self::Odd => 1,
        }
    }

    /// Output file name for this shard.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Even => "shard_0_data.csv",
            Self::Odd => "shard_1_data.csv",
        }
    }

    fn from_digit(value: u32) -> Self {
        if value % 2 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }
}

/// Why a row was dropped without being routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSkip {
    /// `HASH` is absent or empty.
    MissingHash,
    /// The last character of `HASH` is not a hex digit.
    InvalidHexDigit(char),
}

/// Classify a `HASH` value by the parity of its last hex digit.
///
/// The last character is lowercased first, so `A` and `a` behave the same.
/// Only ASCII `0-9` and `a-f` count as hex digits.
pub fn classify_hash(hash: &str) -> Result<ShardId, RowSkip> {
    let last = hash.chars().next_back().ok_or(RowSkip::MissingHash)?;
    last.to_ascii_lowercase()
        .to_digit(16)
        .map(ShardId::from_digit)
        .ok_or(RowSkip::InvalidHexDigit(last))
}
