//! Tests for the disk and in-memory file stores.

#![expect(clippy::expect_used, reason = "tests use expect for clarity")]

use camino::{Utf8Path, Utf8PathBuf};

use crate::{DEFAULT_MIN_SOURCE_LEN, DiskStore, FileStore, MemoryStore, RewriteError};

fn temp_file(content: &[u8]) -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("target.cs")).expect("utf-8 path");
    std::fs::write(&path, content).expect("seed file");
    (dir, path)
}

#[test]
fn disk_read_rejects_files_below_the_minimum_size() {
    let (_dir, path) = temp_file(b"tiny");
    let error = DiskStore::new().read(&path).expect_err("size guard");
    assert!(matches!(
        error,
        RewriteError::SourceTooSmall {
            size: 4,
            min: DEFAULT_MIN_SOURCE_LEN,
            ..
        }
    ));
}

#[test]
fn disk_read_returns_full_content_at_or_above_the_minimum() {
    let content = vec![b'x'; 50];
    let (_dir, path) = temp_file(&content);
    let bytes = DiskStore::new().read(&path).expect("read");
    assert_eq!(bytes, content);
}

#[test]
fn disk_minimum_size_is_configurable() {
    let (_dir, path) = temp_file(b"ok");
    let store = DiskStore::with_min_source_len(2);
    assert_eq!(store.min_source_len(), 2);
    assert_eq!(store.read(&path).expect("read"), b"ok");
}

#[test]
fn disk_read_of_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.cs")).expect("utf-8 path");
    let error = DiskStore::new().read(&path).expect_err("missing file");
    assert!(matches!(error, RewriteError::Io { .. }));
}

#[test]
fn disk_write_replaces_prior_content() {
    let (_dir, path) = temp_file(&[b'a'; 80]);
    DiskStore::new().write(&path, b"fresh").expect("write");
    assert_eq!(std::fs::read(&path).expect("read back"), b"fresh");
}

#[test]
fn memory_store_round_trips_content_without_disk() {
    let store = MemoryStore::new();
    let path = Utf8Path::new("tests/render.cs");
    store.insert(path, b"canned".to_vec());

    assert_eq!(store.read(path).expect("read"), b"canned");
    store.write(path, b"updated").expect("write");
    assert_eq!(store.get(path), Some(b"updated".to_vec()));
}

#[test]
fn memory_store_read_of_unseeded_path_is_an_io_error() {
    let store = MemoryStore::new();
    let error = store
        .read(Utf8Path::new("never/seeded.cs"))
        .expect_err("unseeded path");
    assert!(matches!(error, RewriteError::Io { .. }));
}
