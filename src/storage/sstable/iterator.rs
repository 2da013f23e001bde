//! SSTable Iterator
//!
//! Sequential iteration over all entries in an SSTable's data block.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::error::{KeyspaceError, Result};

use super::{le_u32, ENTRY_HEADER_SIZE, HEADER_SIZE, TOMBSTONE_MARKER};

/// Iterator over SSTable entries in sorted key order
///
/// Yields `(key, None)` for tombstones. After the first error the iterator is
/// exhausted.
pub struct SSTableIterator<'a> {
    file: &'a mut BufReader<File>,
    /// Start of the index block; reading stops here
    end_offset: u64,
    current_offset: u64,
    /// Footer CRC to check once the data block is consumed
    expected_crc: Option<u32>,
    hasher: crc32fast::Hasher,
    done: bool,
}

impl<'a> SSTableIterator<'a> {
    pub(super) fn new(
        file: &'a mut BufReader<File>,
        end_offset: u64,
        expected_crc: Option<u32>,
    ) -> Result<Self> {
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        Ok(Self {
            file,
            end_offset,
            current_offset: HEADER_SIZE,
            expected_crc,
            hasher: crc32fast::Hasher::new(),
            done: false,
        })
    }

    fn read_entry(&mut self) -> Result<(Vec<u8>, Option<Vec<u8>>)> {
        let remaining = self.end_offset - self.current_offset;
        if remaining < ENTRY_HEADER_SIZE {
            return Err(KeyspaceError::Corruption(format!(
                "truncated entry header at offset {}",
                self.current_offset
            )));
        }

        let mut header = [0u8; ENTRY_HEADER_SIZE as usize];
        self.file.read_exact(&mut header)?;
        let key_len = le_u32(&header, 0)? as u64;
        let val_len = le_u32(&header, 4)?;

        let body_len = if val_len == TOMBSTONE_MARKER {
            key_len
        } else {
            key_len + val_len as u64
        };
        if ENTRY_HEADER_SIZE + body_len > remaining {
            return Err(KeyspaceError::Corruption(format!(
                "entry at offset {} runs past the data block",
                self.current_offset
            )));
        }

        let mut key = vec![0u8; key_len as usize];
        self.file.read_exact(&mut key)?;

        let value = if val_len == TOMBSTONE_MARKER {
            None
        } else {
            let mut v = vec![0u8; val_len as usize];
            self.file.read_exact(&mut v)?;
            Some(v)
        };

        if self.expected_crc.is_some() {
            self.hasher.update(&header);
            self.hasher.update(&key);
            if let Some(v) = &value {
                self.hasher.update(v);
            }
        }

        self.current_offset += ENTRY_HEADER_SIZE + body_len;
        Ok((key, value))
    }

    fn verify_checksum(&mut self) -> Result<()> {
        if let Some(expected) = self.expected_crc {
            let actual = std::mem::take(&mut self.hasher).finalize();
            if actual != expected {
                return Err(KeyspaceError::Corruption(format!(
                    "SSTable data CRC mismatch: expected {:08x}, got {:08x}",
                    expected, actual
                )));
            }
        }
        Ok(())
    }
}

impl<'a> Iterator for SSTableIterator<'a> {
    /// (key, Option<value>) — None value means tombstone
    type Item = Result<(Vec<u8>, Option<Vec<u8>>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.current_offset >= self.end_offset {
            self.done = true;
            return self.verify_checksum().err().map(Err);
        }

        let entry = self.read_entry();
        if entry.is_err() {
            self.done = true;
        }
        Some(entry)
    }
}
