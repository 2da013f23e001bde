//! Store
//!
//! Read-only view of an AtlasKV data directory.
//!
//! ## Responsibilities
//! - Discover SSTables and open readers, newest → oldest
//! - Replay the WAL into an in-memory overlay
//! - Produce the engine's diagnostic summary
//! - Stream the merged live keyspace
//!
//! Nothing under the data directory is ever created, truncated or written.
//! All file handles are owned by the `Store` and closed when it is dropped.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{KeyspaceError, Result};
use crate::memtable::MemTable;
use crate::stats::format_bytes;
use crate::wal::{ReplaySummary, WalReader};

use super::merge::{Records, Source};
use super::SSTableReader;

/// What was found at `wal.log` when the store was opened
#[derive(Debug, Clone)]
struct WalState {
    path: PathBuf,
    /// `None` when replay was disabled
    replay: Option<ReplaySummary>,
}

/// Read-only handle on an AtlasKV store
pub struct Store {
    data_dir: PathBuf,

    /// Open SSTable readers, ordered newest → oldest
    sstables: Vec<SSTableReader>,

    /// Unflushed writes replayed from the WAL
    memtable: MemTable,

    wal: Option<WalState>,

    verify_checksums: bool,
}

impl Store {
    // =========================================================================
    // On-disk Layout (fixed by the engine)
    // =========================================================================
    pub const WAL_FILENAME: &'static str = "wal.log";
    pub const SSTABLE_DIR: &'static str = "sstables";

    /// Open a store for reading
    ///
    /// On open:
    /// 1. Check the data directory exists
    /// 2. Discover SSTable files and open a reader for each
    /// 3. Replay the WAL into the overlay (if enabled and present)
    ///
    /// Every failure is reported as [`KeyspaceError::Open`].
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_inner(config).map_err(|e| match e {
            KeyspaceError::Open { .. } => e,
            other => KeyspaceError::Open {
                path: config.data_dir.clone(),
                reason: other.to_string(),
            },
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(&Config::builder().data_dir(path).build())
    }

    fn open_inner(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir.clone();

        let metadata = fs::metadata(&data_dir)?;
        if !metadata.is_dir() {
            return Err(KeyspaceError::Open {
                path: data_dir,
                reason: "not a directory".to_string(),
            });
        }

        let sstables = Self::open_sstables(&data_dir.join(Self::SSTABLE_DIR))?;

        let mut memtable = MemTable::new();
        let wal_path = data_dir.join(Self::WAL_FILENAME);
        let wal = if wal_path.is_file() {
            let replay = if config.replay_wal {
                let mut reader = WalReader::open(&wal_path)?;
                while let Some(entry) = reader.next_entry()? {
                    memtable.apply(entry.operation);
                }
                Some(reader.summary().clone())
            } else {
                None
            };
            Some(WalState {
                path: wal_path,
                replay,
            })
        } else {
            None
        };

        info!(
            data_dir = %data_dir.display(),
            sstables = sstables.len(),
            overlay_keys = memtable.entry_count(),
            "store opened"
        );

        Ok(Self {
            data_dir,
            sstables,
            memtable,
            wal,
            verify_checksums: config.verify_checksums,
        })
    }

    /// Open every `sstable_<id>.sst` in `dir`, highest id first
    fn open_sstables(dir: &Path) -> Result<Vec<SSTableReader>> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no SSTable directory");
            return Ok(Vec::new());
        }

        let mut tables: Vec<(u64, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            match Self::parse_sstable_id(&file_path) {
                Some(id) => tables.push((id, file_path)),
                None => debug!(file = %file_path.display(), "ignoring non-SSTable file"),
            }
        }

        tables.sort_by(|a, b| b.0.cmp(&a.0));

        tables
            .iter()
            .map(|(id, path)| {
                debug!(id, file = %path.display(), "opening SSTable");
                SSTableReader::open(path)
            })
            .collect()
    }

    /// Parse SSTable ID from filename
    /// "sstable_000042.sst" → Some(42)
    fn parse_sstable_id(path: &Path) -> Option<u64> {
        if path.extension()? != "sst" {
            return None;
        }
        let name = path.file_stem()?.to_str()?;
        name.strip_prefix("sstable_")?.parse().ok()
    }

    /// Engine-level diagnostic summary
    ///
    /// Opaque, human-readable, not meant to be parsed. Failures are reported as
    /// [`KeyspaceError::NativeStats`].
    pub fn native_stats(&self) -> Result<String> {
        self.render_native_stats()
            .map_err(|e| KeyspaceError::NativeStats(e.to_string()))
    }

    fn render_native_stats(&self) -> Result<String> {
        let fmt_err = |_: std::fmt::Error| KeyspaceError::Storage("formatting failed".to_string());
        let mut out = String::new();

        let total_entries: u64 = self.sstables.iter().map(|t| t.entry_count()).sum();
        let total_size: u64 = self.sstables.iter().map(|t| t.file_size()).sum();

        writeln!(out, "AtlasKV store: {}", self.data_dir.display()).map_err(fmt_err)?;
        writeln!(
            out,
            "SSTables: {} files, {} entries, {}",
            self.sstables.len(),
            total_entries,
            format_bytes(total_size)
        )
        .map_err(fmt_err)?;

        for table in &self.sstables {
            let name = table
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let range = match (table.min_key(), table.max_key()) {
                (Some(min), Some(max)) => {
                    format!("[{} .. {}]", min.escape_ascii(), max.escape_ascii())
                }
                _ => "[]".to_string(),
            };
            writeln!(
                out,
                "  {}  entries={}  data={}  size={}  keys={}",
                name,
                table.entry_count(),
                format_bytes(table.data_size()),
                format_bytes(table.file_size()),
                range
            )
            .map_err(fmt_err)?;
        }

        match &self.wal {
            Some(wal) => {
                let wal_size = fs::metadata(&wal.path)?.len();
                let written = match &wal.replay {
                    Some(summary) => writeln!(
                        out,
                        "WAL: {}, {} entries replayed, {} corrupted, last_lsn={}, torn_tail={}",
                        format_bytes(wal_size),
                        summary.entries_recovered,
                        summary.entries_corrupted,
                        summary.last_lsn,
                        summary.torn_tail
                    ),
                    None => writeln!(out, "WAL: {}, not replayed", format_bytes(wal_size)),
                };
                written.map_err(fmt_err)?;
            }
            None => writeln!(out, "WAL: none").map_err(fmt_err)?,
        }

        write!(
            out,
            "MemTable: {} keys, {}",
            self.memtable.entry_count(),
            format_bytes(self.memtable.size() as u64)
        )
        .map_err(fmt_err)?;

        Ok(out)
    }

    /// Stream the live keyspace in ascending key order
    ///
    /// Each call starts a fresh pass from the first key.
    pub fn records(&mut self) -> Result<Records<'_>> {
        let verify = self.verify_checksums;
        let mut sources = Vec::with_capacity(self.sstables.len() + 1);

        if !self.memtable.is_empty() {
            sources.push(Source::Mem(Box::new(self.memtable.iter())));
        }
        for reader in self.sstables.iter_mut() {
            sources.push(Source::Table(reader.iter(verify)?));
        }

        Records::new(sources)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the number of SSTables
    pub fn sstable_count(&self) -> usize {
        self.sstables.len()
    }

    /// Keys held in the WAL overlay, tombstones included
    pub fn overlay_entry_count(&self) -> usize {
        self.memtable.entry_count()
    }

    /// Result of the WAL replay, if one happened
    pub fn wal_summary(&self) -> Option<&ReplaySummary> {
        self.wal.as_ref().and_then(|w| w.replay.as_ref())
    }
}
