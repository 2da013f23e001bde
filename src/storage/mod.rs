//! Storage Module
//!
//! Read-only access to an AtlasKV store on disk.
//!
//! ## Responsibilities
//! - Parse SSTable files (header, data block, index, footer)
//! - Open a data directory without touching it
//! - Merge the WAL overlay and all SSTables into one sorted record stream
//!
//! ## Data Directory Layout
//! ```text
//! {data_dir}/
//!   ├── wal.log                 write-ahead log (unflushed writes)
//!   └── sstables/
//!         ├── sstable_000001.sst
//!         └── sstable_000002.sst   (higher id = newer)
//! ```

mod merge;
mod sstable;
mod store;

pub use merge::Records;
pub use sstable::{SSTable, SSTableBuilder, SSTableIterator, SSTableReader};
pub use store::Store;
