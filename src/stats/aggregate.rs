//! Streaming aggregation
//!
//! One pass over a record stream, accumulating counters per namespace. Memory
//! grows with the number of distinct namespaces, never with the number of
//! records.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::classify::{classify_checked, MISC_LABEL};

/// Running counters for one namespace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamespaceStats {
    /// Number of records
    pub count: u64,
    /// Sum of key lengths
    pub key_bytes: u64,
    /// Sum of value lengths
    pub value_bytes: u64,
}

impl NamespaceStats {
    fn add(&mut self, key_size: u64, value_size: u64) {
        self.count += 1;
        self.key_bytes += key_size;
        self.value_bytes += value_size;
    }

    /// Mean key length, truncated
    pub fn avg_key_size(&self) -> u64 {
        self.key_bytes.checked_div(self.count).unwrap_or(0)
    }

    /// Mean value length, truncated
    pub fn avg_value_size(&self) -> u64 {
        self.value_bytes.checked_div(self.count).unwrap_or(0)
    }
}

/// Per-namespace counters plus grand totals for a finished pass
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    namespaces: HashMap<String, NamespaceStats>,
    total: NamespaceStats,
    malformed_keys: u64,
}

impl AggregationResult {
    /// Counters by label, in no particular order
    pub fn namespaces(&self) -> &HashMap<String, NamespaceStats> {
        &self.namespaces
    }

    pub fn get(&self, label: &str) -> Option<&NamespaceStats> {
        self.namespaces.get(label)
    }

    /// Grand totals across every namespace
    pub fn total(&self) -> &NamespaceStats {
        &self.total
    }

    /// Records filed under `misc` because their namespace prefix was malformed
    pub fn malformed_keys(&self) -> u64 {
        self.malformed_keys
    }

    /// No record was seen
    pub fn is_empty(&self) -> bool {
        self.total.count == 0
    }
}

/// Incremental form of [`aggregate`]
#[derive(Debug, Default)]
pub struct Aggregator {
    result: AggregationResult,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one record
    pub fn record(&mut self, key: &[u8], value: &[u8]) {
        let key_size = key.len() as u64;
        let value_size = value.len() as u64;

        let (label, malformed) = classify_checked(key);
        if malformed {
            self.result.malformed_keys += 1;
        }

        let namespaces = &mut self.result.namespaces;
        match namespaces.get_mut(label) {
            Some(stats) => stats.add(key_size, value_size),
            None => {
                debug!(label, "new namespace");
                let mut stats = NamespaceStats::default();
                stats.add(key_size, value_size);
                namespaces.insert(label.to_owned(), stats);
            }
        }

        self.result.total.add(key_size, value_size);
    }

    /// Records accounted for so far
    pub fn records_seen(&self) -> u64 {
        self.result.total.count
    }

    pub fn finish(self) -> AggregationResult {
        if self.result.malformed_keys > 0 {
            warn!(
                malformed = self.result.malformed_keys,
                "keys with a malformed namespace prefix were counted as {}", MISC_LABEL
            );
        }
        self.result
    }
}

/// Aggregate a record stream in a single pass
///
/// The first error aborts the pass and is returned; nothing accumulated before
/// it is reported.
pub fn aggregate<I, K, V, E>(records: I) -> Result<AggregationResult, E>
where
    I: IntoIterator<Item = Result<(K, V), E>>,
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    let mut aggregator = Aggregator::new();
    for record in records {
        let (key, value) = record?;
        aggregator.record(key.as_ref(), value.as_ref());
    }
    Ok(aggregator.finish())
}
