//! Configuration for atlaskv-stats
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for an inspection run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the AtlasKV store being inspected.
    /// Expected structure:
    ///   {data_dir}/
    ///     ├── wal.log          (write-ahead log)
    ///     └── sstables/        (SSTable files)
    pub data_dir: PathBuf,

    /// Replay `wal.log` on top of the SSTables (unflushed writes count too)
    pub replay_wal: bool,

    /// Check each SSTable's data-block CRC once it has been fully scanned
    pub verify_checksums: bool,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Border style of the rendered table
    pub table_style: TableStyle,
}

/// Table border style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Unicode box-drawing borders
    Utf8,

    /// Plain ASCII borders (for logs and dumb terminals)
    Ascii,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            replay_wal: true,
            verify_checksums: true,
            table_style: TableStyle::Utf8,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory of the store to inspect
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Enable or disable WAL replay
    pub fn replay_wal(mut self, enabled: bool) -> Self {
        self.config.replay_wal = enabled;
        self
    }

    /// Enable or disable SSTable checksum verification
    pub fn verify_checksums(mut self, enabled: bool) -> Self {
        self.config.verify_checksums = enabled;
        self
    }

    /// Set the table border style
    pub fn table_style(mut self, style: TableStyle) -> Self {
        self.config.table_style = style;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
