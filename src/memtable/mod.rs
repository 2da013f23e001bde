//! MemTable Module
//!
//! In-memory overlay holding the WAL's unflushed writes.
//!
//! ## Responsibilities
//! - Replay WAL operations in LSN order (last write wins)
//! - Keep tombstones, so deletes shadow older SSTable versions
//! - Ordered iteration for merging with SSTables
//!
//! Bounded by the store's WAL, which the engine truncates on every flush.

mod table;

pub use table::MemTable;

/// Entry stored in the MemTable
#[derive(Debug, Clone, PartialEq)]
pub enum MemTableEntry {
    /// A live value
    Value(Vec<u8>),

    /// A tombstone (deleted key)
    Tombstone,
}
