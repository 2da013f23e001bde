//! WAL Reader
//!
//! Reads entries from the WAL file without modifying it.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::warn;

use crate::error::{KeyspaceError, Result};

use super::entry::RecordHeader;
use super::{WalEntry, HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// What a WAL replay found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Number of entries successfully read
    pub entries_recovered: u64,

    /// Final records discarded because their payload failed the CRC
    /// (a write that reached the disk only partly)
    pub entries_corrupted: u64,

    /// Last valid LSN (0 when no entry was read)
    pub last_lsn: u64,

    /// The log ends with a partial write; the tail is ignored
    pub torn_tail: bool,
}

/// Sequential, read-only WAL reader
pub struct WalReader {
    file: BufReader<File>,
    file_len: u64,
    position: u64,
    summary: ReplaySummary,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        Ok(Self {
            file: BufReader::new(file),
            file_len,
            position: 0,
            summary: ReplaySummary::default(),
        })
    }

    /// Read the next entry
    ///
    /// Returns `Ok(None)` at the end of the log, including when the last record
    /// was only partially written. Damage anywhere before the tail is a
    /// [`KeyspaceError::WalCorruption`]; later records are never dropped silently.
    pub fn next_entry(&mut self) -> Result<Option<WalEntry>> {
        let remaining = self.file_len - self.position;
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < HEADER_SIZE as u64 {
            self.mark_torn();
            return Ok(None);
        }

        let mut header_bytes = [0u8; HEADER_SIZE];
        self.file.read_exact(&mut header_bytes)?;
        let header = RecordHeader::parse(&header_bytes)?;

        if header.len > MAX_PAYLOAD_SIZE {
            return Err(self.corruption(format!(
                "record length {} exceeds maximum {}",
                header.len, MAX_PAYLOAD_SIZE
            )));
        }

        let record_len = HEADER_SIZE as u64 + header.len as u64;
        if record_len > remaining {
            // Bounded by one maximum-size record.
            let mut tail = header_bytes.to_vec();
            self.file.read_to_end(&mut tail)?;
            if contains_complete_record(&tail[1..]) {
                return Err(self.corruption(format!(
                    "record length {} runs past the end of the log, but complete records follow",
                    header.len
                )));
            }
            self.mark_torn();
            return Ok(None);
        }

        let mut payload = vec![0u8; header.len as usize];
        self.file.read_exact(&mut payload)?;

        match WalEntry::decode_payload(&header, &payload) {
            Ok(entry) => {
                self.position += record_len;
                self.summary.entries_recovered += 1;
                self.summary.last_lsn = entry.lsn;
                Ok(Some(entry))
            }
            Err(KeyspaceError::WalCorruption(reason))
                if self.position + record_len == self.file_len =>
            {
                warn!(
                    offset = self.position,
                    %reason,
                    "discarding damaged final WAL record"
                );
                self.summary.entries_corrupted += 1;
                self.mark_torn();
                Ok(None)
            }
            Err(KeyspaceError::WalCorruption(reason)) => Err(self.corruption(reason)),
            Err(e) => Err(e),
        }
    }

    /// Counters accumulated so far
    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    /// Read the remaining entries, returning the final summary
    pub fn read_all(mut self) -> Result<(Vec<WalEntry>, ReplaySummary)> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry()? {
            entries.push(entry);
        }
        Ok((entries, self.summary))
    }

    fn mark_torn(&mut self) {
        warn!(
            offset = self.position,
            trailing_bytes = self.file_len - self.position,
            "WAL ends with a partial record"
        );
        self.summary.torn_tail = true;
        // Park at EOF so further calls return None without re-reporting.
        self.position = self.file_len;
        let _ = self.file.seek(SeekFrom::End(0));
    }

    fn corruption(&self, reason: impl std::fmt::Display) -> KeyspaceError {
        KeyspaceError::WalCorruption(format!("record at offset {}: {}", self.position, reason))
    }
}

/// Whether a complete, checksum-valid record starts anywhere in `bytes`
fn contains_complete_record(bytes: &[u8]) -> bool {
    (0..bytes.len()).any(|start| {
        let candidate = &bytes[start..];
        let Ok(header) = RecordHeader::parse(candidate) else {
            return false;
        };
        header.len <= MAX_PAYLOAD_SIZE
            && candidate
                .get(HEADER_SIZE..HEADER_SIZE + header.len as usize)
                .is_some_and(|payload| WalEntry::decode_payload(&header, payload).is_ok())
    })
}
