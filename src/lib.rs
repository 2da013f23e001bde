//! # atlaskv-stats
//!
//! Keyspace size statistics for AtlasKV data directories:
//! - Per-namespace record counts, average and total key/value sizes
//! - Namespaces taken from the `s/k:<module>/` key convention, `misc` otherwise
//! - Single streaming pass, memory bounded by the number of namespaces
//! - Read-only: the store is never modified
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │        (read-only: SSTables + replayed WAL overlay)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ merged, sorted (key, value) stream
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Aggregator                              │
//! │          classify(key) → per-namespace counters              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │    Report     │
//!               │ (sorted rows) │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod memtable;
pub mod report;
pub mod stats;
pub mod storage;
pub mod wal;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{KeyspaceError, MalformedKeyError, Result};
pub use stats::{aggregate, classify, format_bytes, AggregationResult, NamespaceStats};
pub use storage::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of atlaskv-stats
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
