//! WAL Entry definitions
//!
//! Defines the structure and the on-disk record encoding of WAL entries.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{KeyspaceError, Result};

/// Record header: LSN (8) + CRC (4) + payload length (4)
pub const HEADER_SIZE: usize = 16;

/// Largest payload a record may carry. A header claiming more is damaged.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// The logged operation
    pub operation: Operation,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

/// Operations that can be logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

impl WalEntry {
    /// Create an entry stamped with the current time
    pub fn new(lsn: u64, operation: Operation) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            lsn,
            operation,
            timestamp,
        }
    }

    /// Encode as a full record: [lsn(8)][crc(4)][len(4)][bincode payload]
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload =
            bincode::serialize(self).map_err(|e| KeyspaceError::Serialization(e.to_string()))?;
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|&len| len <= MAX_PAYLOAD_SIZE)
            .ok_or_else(|| {
                KeyspaceError::Serialization(format!(
                    "WAL payload of {} bytes exceeds maximum {}",
                    payload.len(),
                    MAX_PAYLOAD_SIZE
                ))
            })?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&self.lsn.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode a full record produced by [`WalEntry::serialize`]
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let header = RecordHeader::parse(bytes)?;
        let payload = bytes
            .get(HEADER_SIZE..HEADER_SIZE + header.len as usize)
            .ok_or_else(|| KeyspaceError::WalCorruption("truncated WAL record".to_string()))?;
        Self::decode_payload(&header, payload)
    }

    /// Verify and decode a payload against its already-parsed header
    pub(crate) fn decode_payload(header: &RecordHeader, payload: &[u8]) -> Result<Self> {
        let actual = crc32fast::hash(payload);
        if actual != header.crc {
            return Err(KeyspaceError::WalCorruption(format!(
                "CRC mismatch at lsn {}: expected {:08x}, got {:08x}",
                header.lsn, header.crc, actual
            )));
        }

        let entry: WalEntry = bincode::deserialize(payload)
            .map_err(|e| KeyspaceError::WalCorruption(format!("undecodable payload: {}", e)))?;

        if entry.lsn != header.lsn {
            return Err(KeyspaceError::WalCorruption(format!(
                "LSN mismatch: header says {}, payload says {}",
                header.lsn, entry.lsn
            )));
        }

        Ok(entry)
    }
}

/// Fixed-size prefix of every WAL record
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecordHeader {
    pub lsn: u64,
    pub crc: u32,
    pub len: u32,
}

impl RecordHeader {
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self> {
        let field = |range: std::ops::Range<usize>| {
            bytes
                .get(range)
                .ok_or_else(|| KeyspaceError::WalCorruption("truncated WAL header".to_string()))
        };

        let mut lsn = [0u8; 8];
        lsn.copy_from_slice(field(0..8)?);
        let mut crc = [0u8; 4];
        crc.copy_from_slice(field(8..12)?);
        let mut len = [0u8; 4];
        len.copy_from_slice(field(12..16)?);

        Ok(Self {
            lsn: u64::from_le_bytes(lsn),
            crc: u32::from_le_bytes(crc),
            len: u32::from_le_bytes(len),
        })
    }
}
