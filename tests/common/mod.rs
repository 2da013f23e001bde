//! Shared fixtures: build AtlasKV data directories on disk.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use atlaskv_stats::storage::{SSTable, SSTableBuilder, Store};
use atlaskv_stats::wal::{Operation, WalWriter};
use tempfile::TempDir;

/// Empty data directory with an `sstables/` subdirectory
pub fn setup_data_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();
    fs::create_dir_all(data_dir.join(Store::SSTABLE_DIR)).unwrap();
    (temp_dir, data_dir)
}

/// Write `sstables/sstable_<id>.sst`; `None` values are tombstones.
/// Entries are sorted before writing.
pub fn write_sstable(data_dir: &Path, id: u64, entries: &[(&[u8], Option<&[u8]>)]) -> SSTable {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let path = data_dir
        .join(Store::SSTABLE_DIR)
        .join(format!("sstable_{:06}.sst", id));
    let mut builder = SSTableBuilder::new(&path).unwrap();
    for (key, value) in sorted {
        match value {
            Some(v) => builder.add(key, v).unwrap(),
            None => builder.add_tombstone(key).unwrap(),
        }
    }
    builder.finish().unwrap()
}

/// Shorthand for an SSTable of live values
pub fn write_values(data_dir: &Path, id: u64, entries: &[(&str, &str)]) -> SSTable {
    let entries: Vec<(&[u8], Option<&[u8]>)> = entries
        .iter()
        .map(|(k, v)| (k.as_bytes(), Some(v.as_bytes())))
        .collect();
    write_sstable(data_dir, id, &entries)
}

/// Append operations to `wal.log`
pub fn write_wal(data_dir: &Path, operations: Vec<Operation>) {
    let mut writer = WalWriter::open(&data_dir.join(Store::WAL_FILENAME)).unwrap();
    for operation in operations {
        writer.append(operation).unwrap();
    }
    writer.sync().unwrap();
}

pub fn put(key: &str, value: &str) -> Operation {
    Operation::Put {
        key: key.as_bytes().to_vec(),
        value: value.as_bytes().to_vec(),
    }
}

pub fn delete(key: &str) -> Operation {
    Operation::Delete {
        key: key.as_bytes().to_vec(),
    }
}

/// Collect a store's live records, panicking on error
pub fn live_records(store: &mut Store) -> Vec<(Vec<u8>, Vec<u8>)> {
    store
        .records()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}
