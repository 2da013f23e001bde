//! MemTable implementation
//!
//! BTreeMap-based overlay. Single-threaded, so no interior locking.

use std::collections::BTreeMap;

use crate::wal::Operation;

use super::MemTableEntry;

/// In-memory table of replayed writes
#[derive(Debug, Default)]
pub struct MemTable {
    data: BTreeMap<Vec<u8>, MemTableEntry>,
    /// Approximate payload size in bytes (keys + live values)
    size: usize,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one logged operation
    pub fn apply(&mut self, operation: Operation) {
        match operation {
            Operation::Put { key, value } => self.put(key, value),
            Operation::Delete { key } => self.delete(key),
        }
    }

    /// Insert or overwrite a value
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.insert(key, MemTableEntry::Value(value));
    }

    /// Record a tombstone for the key
    pub fn delete(&mut self, key: Vec<u8>) {
        self.insert(key, MemTableEntry::Tombstone);
    }

    fn insert(&mut self, key: Vec<u8>, entry: MemTableEntry) {
        let added = key.len() + Self::entry_size(&entry);
        let key_len = key.len();
        if let Some(old) = self.data.insert(key, entry) {
            self.size -= key_len + Self::entry_size(&old);
        }
        self.size += added;
    }

    fn entry_size(entry: &MemTableEntry) -> usize {
        match entry {
            MemTableEntry::Value(v) => v.len(),
            MemTableEntry::Tombstone => 0,
        }
    }

    pub fn get(&self, key: &[u8]) -> Option<&MemTableEntry> {
        self.data.get(key)
    }

    /// Approximate size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of keys, tombstones included
    pub fn entry_count(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &MemTableEntry)> {
        self.data.iter().map(|(k, v)| (k.as_slice(), v))
    }
}
