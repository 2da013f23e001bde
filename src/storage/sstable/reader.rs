//! SSTable Reader
//!
//! Opens SSTable files read-only, validates header and footer, and hands out
//! sequential iterators over the data block.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{KeyspaceError, Result};

use super::iterator::SSTableIterator;
use super::{le_u16, le_u32, le_u64, FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Read-only handle on one SSTable file
pub struct SSTableReader {
    path: PathBuf,
    file: BufReader<File>,
    file_size: u64,
    entry_count: u64,
    /// Start of the index block, i.e. end of the data block
    index_offset: u64,
    data_crc: u32,
    min_key: Option<Vec<u8>>,
    max_key: Option<Vec<u8>>,
}

impl SSTableReader {
    /// Open an SSTable for reading
    ///
    /// The index block is scanned once for the key range; only the first and last
    /// keys are kept, so memory does not grow with the table.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(KeyspaceError::Corruption(format!(
                "{}: file too small for an SSTable ({} bytes)",
                path.display(),
                file_size
            )));
        }

        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(KeyspaceError::Corruption(format!(
                "{}: invalid SSTable magic: expected ATKV, got {:?}",
                path.display(),
                &header[0..4]
            )));
        }

        let version = le_u16(&header, 4)?;
        if version != VERSION {
            return Err(KeyspaceError::Corruption(format!(
                "{}: unsupported SSTable version: {}",
                path.display(),
                version
            )));
        }

        let entry_count = le_u64(&header, 6)?;

        file.seek(SeekFrom::Start(file_size - FOOTER_SIZE))?;
        let mut footer = [0u8; FOOTER_SIZE as usize];
        file.read_exact(&mut footer)?;

        let index_offset = le_u64(&footer, 0)?;
        let data_crc = le_u32(&footer, 8)?;

        if index_offset < HEADER_SIZE || index_offset > file_size - FOOTER_SIZE {
            return Err(KeyspaceError::Corruption(format!(
                "{}: index offset {} outside file bounds",
                path.display(),
                index_offset
            )));
        }

        let mut file = BufReader::new(file);
        file.seek(SeekFrom::Start(index_offset))?;
        let (min_key, max_key) =
            Self::scan_key_range(&mut file, file_size - FOOTER_SIZE - index_offset)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            file_size,
            entry_count,
            index_offset,
            data_crc,
            min_key,
            max_key,
        })
    }

    /// Walk the index block keeping only its first and last keys.
    /// Index entries: [key_len(4)][offset(8)][key]
    fn scan_key_range(
        file: &mut BufReader<File>,
        block_size: u64,
    ) -> Result<(Option<Vec<u8>>, Option<Vec<u8>>)> {
        let mut min_key = None;
        let mut max_key = None;
        let mut remaining = block_size;

        while remaining > 0 {
            if remaining < 12 {
                return Err(KeyspaceError::Corruption(
                    "truncated SSTable index entry".to_string(),
                ));
            }
            let mut entry_header = [0u8; 12];
            file.read_exact(&mut entry_header)?;
            let key_len = le_u32(&entry_header, 0)? as u64;
            remaining -= 12;

            if key_len > remaining {
                return Err(KeyspaceError::Corruption(
                    "SSTable index key runs past the index block".to_string(),
                ));
            }
            let mut key = vec![0u8; key_len as usize];
            file.read_exact(&mut key)?;
            remaining -= key_len;

            if min_key.is_none() {
                min_key = Some(key.clone());
            }
            max_key = Some(key);
        }

        Ok((min_key, max_key))
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the file on disk
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Entry count recorded in the header (tombstones included)
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Size of the data block in bytes
    pub fn data_size(&self) -> u64 {
        self.index_offset - HEADER_SIZE
    }

    /// Smallest key, or `None` for an empty table
    pub fn min_key(&self) -> Option<&[u8]> {
        self.min_key.as_deref()
    }

    /// Largest key, or `None` for an empty table
    pub fn max_key(&self) -> Option<&[u8]> {
        self.max_key.as_deref()
    }

    /// Iterate over all entries in key order, tombstones included
    pub fn iter(&mut self, verify_checksum: bool) -> Result<SSTableIterator<'_>> {
        let expected_crc = verify_checksum.then_some(self.data_crc);
        SSTableIterator::new(&mut self.file, self.index_offset, expected_crc)
    }
}
