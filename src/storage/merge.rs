//! Merged record stream
//!
//! K-way merge over the MemTable overlay and every SSTable, producing the live
//! keyspace in ascending key order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{KeyspaceError, Result};
use crate::memtable::MemTableEntry;

use super::sstable::SSTableIterator;

/// One sorted input of the merge
pub(crate) enum Source<'a> {
    /// Replayed WAL writes
    Mem(Box<dyn Iterator<Item = (&'a [u8], &'a MemTableEntry)> + 'a>),
    /// One SSTable data block
    Table(SSTableIterator<'a>),
}

impl<'a> Source<'a> {
    /// Next `(key, value)`; `None` value is a tombstone
    fn next_entry(&mut self) -> Option<Result<(Vec<u8>, Option<Vec<u8>>)>> {
        match self {
            Source::Mem(iter) => iter.next().map(|(key, entry)| {
                let value = match entry {
                    MemTableEntry::Value(v) => Some(v.clone()),
                    MemTableEntry::Tombstone => None,
                };
                Ok((key.to_vec(), value))
            }),
            Source::Table(iter) => iter.next(),
        }
    }
}

/// Head entry of one source
struct Head {
    key: Vec<u8>,
    value: Option<Vec<u8>>,
    /// Source position; lower is newer
    source: usize,
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.source == other.source
    }
}

impl Eq for Head {}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Head {
    // Reversed: BinaryHeap is a max-heap and we want the smallest key, newest
    // source first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.source.cmp(&self.source))
    }
}

/// Live records of a store in ascending key order
///
/// For a key present in several sources the newest version wins; tombstones
/// hide the key entirely. Holds one head entry per source, so memory does not
/// depend on the number of records. Fused after the first error.
pub struct Records<'a> {
    sources: Vec<Source<'a>>,
    heap: BinaryHeap<Head>,
    failed: bool,
}

impl<'a> Records<'a> {
    /// `sources` must be ordered newest first
    pub(crate) fn new(sources: Vec<Source<'a>>) -> Result<Self> {
        let mut records = Self {
            heap: BinaryHeap::with_capacity(sources.len()),
            sources,
            failed: false,
        };
        for source in 0..records.sources.len() {
            records.advance(source, None)?;
        }
        Ok(records)
    }

    /// Pull the next entry of `source` into the heap
    fn advance(&mut self, source: usize, previous: Option<&[u8]>) -> Result<()> {
        let Some(entry) = self.sources[source].next_entry() else {
            return Ok(());
        };
        let (key, value) = entry?;

        if previous.is_some_and(|prev| key.as_slice() <= prev) {
            return Err(KeyspaceError::Corruption(format!(
                "source {} yields keys out of order at {:?}",
                source,
                key.escape_ascii().to_string()
            )));
        }

        self.heap.push(Head { key, value, source });
        Ok(())
    }

    fn next_live(&mut self) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        while let Some(head) = self.heap.pop() {
            self.advance(head.source, Some(&head.key))?;

            // Older versions of the same key are shadowed.
            while self.heap.peek().is_some_and(|next| next.key == head.key) {
                if let Some(stale) = self.heap.pop() {
                    self.advance(stale.source, Some(&stale.key))?;
                }
            }

            if let Some(value) = head.value {
                return Ok(Some((head.key, value)));
            }
        }
        Ok(None)
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_live() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
