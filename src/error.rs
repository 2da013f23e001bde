//! Error types for atlaskv-stats
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KeyspaceError
pub type Result<T> = std::result::Result<T, KeyspaceError>;

/// Unified error type for keyspace inspection
#[derive(Debug, Error)]
pub enum KeyspaceError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // On-disk Format Errors
    // -------------------------------------------------------------------------
    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Fatal Inspection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to open store at {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("Failed to read native store stats: {0}")]
    NativeStats(String),

    #[error("Store iteration failed: {0}")]
    Iteration(String),
}

/// A key that carries the namespace prefix but not the `<name>/` body.
///
/// Never fatal: the classifier recovers by filing the key under `misc`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed namespace key: {reason}")]
pub struct MalformedKeyError {
    pub reason: &'static str,
}
