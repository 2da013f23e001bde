//! Tests for SSTable reading
//!
//! These tests verify:
//! - Builder output is readable (entry count, key range, sizes)
//! - Sequential iteration including tombstones
//! - Checksum verification at the end of the data block
//! - Rejection of malformed files

use std::fs;
use std::path::PathBuf;

use atlaskv_stats::storage::{SSTable, SSTableBuilder, SSTableReader};
use atlaskv_stats::KeyspaceError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_sstable() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.sst");
    (temp_dir, path)
}

/// Create an SSTable with numbered entries
fn create_sstable_with_entries(path: &PathBuf, count: usize) -> SSTable {
    let mut builder = SSTableBuilder::new(path).unwrap();
    for i in 0..count {
        let key = format!("key{:05}", i);
        let value = format!("value{}", i);
        builder.add(key.as_bytes(), value.as_bytes()).unwrap();
    }
    builder.finish().unwrap()
}

fn read_all(reader: &mut SSTableReader, verify: bool) -> Vec<(Vec<u8>, Option<Vec<u8>>)> {
    reader
        .iter(verify)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_builder_creates_file() {
    let (_temp, path) = setup_temp_sstable();

    let sstable = create_sstable_with_entries(&path, 5);

    assert!(path.exists());
    assert_eq!(sstable.entry_count(), 5);
    assert_eq!(sstable.min_key, b"key00000");
    assert_eq!(sstable.max_key, b"key00004");
    assert_eq!(sstable.file_size, fs::metadata(&path).unwrap().len());
}

#[test]
fn test_builder_rejects_unsorted_keys() {
    let (_temp, path) = setup_temp_sstable();

    let mut builder = SSTableBuilder::new(&path).unwrap();
    builder.add(b"b", b"1").unwrap();

    assert!(matches!(builder.add(b"a", b"2"), Err(KeyspaceError::Storage(_))));
    assert!(matches!(builder.add(b"b", b"3"), Err(KeyspaceError::Storage(_))));
}

// =============================================================================
// Reader Tests
// =============================================================================

#[test]
fn test_reader_metadata() {
    let (_temp, path) = setup_temp_sstable();
    let sstable = create_sstable_with_entries(&path, 10);

    let reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.entry_count(), 10);
    assert_eq!(reader.file_size(), sstable.file_size);
    assert_eq!(reader.min_key(), Some(&b"key00000"[..]));
    assert_eq!(reader.max_key(), Some(&b"key00009"[..]));
    assert!(reader.data_size() > 0);
}

#[test]
fn test_reader_empty_sstable() {
    let (_temp, path) = setup_temp_sstable();
    SSTableBuilder::new(&path).unwrap().finish().unwrap();

    let mut reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.entry_count(), 0);
    assert_eq!(reader.min_key(), None);
    assert_eq!(reader.data_size(), 0);
    assert!(read_all(&mut reader, true).is_empty());
}

#[test]
fn test_iter_in_key_order() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 100);

    let mut reader = SSTableReader::open(&path).unwrap();
    let entries = read_all(&mut reader, true);

    assert_eq!(entries.len(), 100);
    for (i, (key, value)) in entries.iter().enumerate() {
        assert_eq!(key, format!("key{:05}", i).as_bytes());
        assert_eq!(value.as_deref(), Some(format!("value{}", i).as_bytes()));
    }
}

#[test]
fn test_iter_yields_tombstones() {
    let (_temp, path) = setup_temp_sstable();
    let mut builder = SSTableBuilder::new(&path).unwrap();
    builder.add(b"key1", b"value1").unwrap();
    builder.add_tombstone(b"key2").unwrap();
    builder.add(b"key3", b"").unwrap();
    builder.finish().unwrap();

    let mut reader = SSTableReader::open(&path).unwrap();
    let entries = read_all(&mut reader, true);

    assert_eq!(
        entries,
        vec![
            (b"key1".to_vec(), Some(b"value1".to_vec())),
            (b"key2".to_vec(), None),
            (b"key3".to_vec(), Some(Vec::new())),
        ]
    );
}

#[test]
fn test_iter_restarts_from_first_entry() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 3);

    let mut reader = SSTableReader::open(&path).unwrap();
    let first = read_all(&mut reader, true);
    let second = read_all(&mut reader, true);

    assert_eq!(first, second);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_invalid_magic_rejected() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 2);

    let mut bytes = fs::read(&path).unwrap();
    bytes[0..4].copy_from_slice(b"NOPE");
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        SSTableReader::open(&path),
        Err(KeyspaceError::Corruption(_))
    ));
}

#[test]
fn test_unsupported_version_rejected() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 2);

    let mut bytes = fs::read(&path).unwrap();
    bytes[4..6].copy_from_slice(&7u16.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        SSTableReader::open(&path),
        Err(KeyspaceError::Corruption(_))
    ));
}

#[test]
fn test_too_small_file_rejected() {
    let (_temp, path) = setup_temp_sstable();
    fs::write(&path, b"ATKV").unwrap();

    assert!(matches!(
        SSTableReader::open(&path),
        Err(KeyspaceError::Corruption(_))
    ));
}

#[test]
fn test_index_offset_out_of_bounds_rejected() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 2);

    let mut bytes = fs::read(&path).unwrap();
    let footer = bytes.len() - 16;
    bytes[footer..footer + 8].copy_from_slice(&u64::MAX.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        SSTableReader::open(&path),
        Err(KeyspaceError::Corruption(_))
    ));
}

#[test]
fn test_checksum_mismatch_detected_at_end() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 3);

    // Last byte of the first value ("value0").
    let mut bytes = fs::read(&path).unwrap();
    bytes[14 + 8 + 8 + 5] ^= 0x01;
    fs::write(&path, bytes).unwrap();

    let mut reader = SSTableReader::open(&path).unwrap();
    let results: Vec<_> = reader.iter(true).unwrap().collect();

    assert_eq!(results.len(), 4);
    assert!(results[..3].iter().all(|r| r.is_ok()));
    assert!(matches!(results[3], Err(KeyspaceError::Corruption(_))));
}

#[test]
fn test_checksum_not_checked_when_disabled() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 3);

    let mut bytes = fs::read(&path).unwrap();
    bytes[14 + 8 + 8 + 5] ^= 0x01;
    fs::write(&path, bytes).unwrap();

    let mut reader = SSTableReader::open(&path).unwrap();

    assert_eq!(read_all(&mut reader, false).len(), 3);
}

#[test]
fn test_oversized_value_length_is_error_not_allocation() {
    let (_temp, path) = setup_temp_sstable();
    create_sstable_with_entries(&path, 2);

    // val_len of the first entry
    let mut bytes = fs::read(&path).unwrap();
    bytes[14 + 4..14 + 8].copy_from_slice(&(u32::MAX - 1).to_le_bytes());
    fs::write(&path, bytes).unwrap();

    let mut reader = SSTableReader::open(&path).unwrap();
    let mut iter = reader.iter(false).unwrap();

    assert!(matches!(iter.next(), Some(Err(KeyspaceError::Corruption(_)))));
    assert!(iter.next().is_none());
}
