//! WAL Writer
//!
//! Appends entries to a WAL file in the AtlasKV record format. The inspector
//! never writes to a store; this exists for fixtures and tests.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::Result;

use super::{Operation, WalEntry, WalReader};

/// Appends entries to the WAL file
pub struct WalWriter {
    file: File,
    current_lsn: u64,
}

impl WalWriter {
    /// Open or create a WAL file, continuing after its last valid LSN
    pub fn open(path: &Path) -> Result<Self> {
        let current_lsn = if path.exists() {
            WalReader::open(path)?.read_all()?.1.last_lsn
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file, current_lsn })
    }

    /// Append an operation, returning its LSN
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        let lsn = self.current_lsn + 1;
        let bytes = WalEntry::new(lsn, operation).serialize()?;
        self.file.write_all(&bytes)?;
        self.current_lsn = lsn;
        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// LSN of the last appended entry
    pub fn current_lsn(&self) -> u64 {
        self.current_lsn
    }
}
