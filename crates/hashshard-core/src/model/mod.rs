//! Data model for hashshard.
//!
//! Re-exports the fixed address schema and the hash-parity classifier.
pub mod record;
pub mod shard;

pub use record::{header_matches, AddressRecord, FIELDNAMES, HASH_INDEX};
pub use shard::{classify_hash, RowSkip, ShardId};
