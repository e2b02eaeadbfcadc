use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use pretty_assertions::assert_eq;
use splash_hash::md5_hex;
use splash_runtime::adapters::{BlobError, FsBlobStore, Logger};
use splash_runtime::ports::BlobStore;
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (TempDir, Utf8PathBuf, Arc<Logger>, FsBlobStore) {
    let temp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");
    let logger = Arc::new(Logger::default());
    let store = FsBlobStore::new(logger.clone());
    (temp, root, logger, store)
}

#[test]
fn write_then_read_round_trips_contents() {
    let (_temp, root, logger, store) = setup();
    let dir = root.join("nested/files");
    let body = b"hello splash";
    let raw = STANDARD.encode(body);
    let md5 = md5_hex(body);

    store.write(&dir, "hello.txt", &md5, &raw).expect("write");
    let read = store.read(&dir, "hello.txt").expect("read");

    assert_eq!(read.filename, "hello.txt");
    assert_eq!(read.raw, raw);
    assert_eq!(read.md5, md5);
    assert_eq!(read.size, body.len() as u64);
    assert_eq!(store.read_contents(&dir, "hello.txt").expect("contents"), raw);
    assert!(logger.raw().msg.iter().any(|m| m.contains("hello.txt written")));
}

#[test]
fn write_with_wrong_checksum_fails() {
    let (_temp, root, logger, store) = setup();
    let raw = STANDARD.encode(b"data");
    let err = store
        .write(&root, "data.bin", "00000000000000000000000000000000", &raw)
        .expect_err("checksum mismatch");
    assert!(matches!(err, BlobError::ChecksumMismatch(_)));
    assert_eq!(logger.raw().err.len(), 1);
}

#[test]
fn write_rejects_missing_arguments() {
    let (_temp, root, _logger, store) = setup();
    assert!(matches!(
        store.write(Utf8Path::new(""), "a", "m", "r"),
        Err(BlobError::DirMissing)
    ));
    assert!(matches!(
        store.write(&root, "", "m", "r"),
        Err(BlobError::FileMissing)
    ));
    assert!(matches!(
        store.write(&root, "a", "", "r"),
        Err(BlobError::Md5Missing)
    ));
    assert!(matches!(
        store.write(&root, "a", "m", ""),
        Err(BlobError::RawMissing)
    ));
    assert!(matches!(
        store.write(&root, "a", "m", "***"),
        Err(BlobError::Decode(_))
    ));
}

#[test]
fn missing_file_is_a_warning() {
    let (_temp, root, logger, store) = setup();
    let err = store.read(&root, "nope.txt").expect_err("missing");
    assert!(matches!(err, BlobError::NotFound(_)));
    assert_eq!(err.key(), "ErrFileNoExists");
    let raw = logger.raw();
    assert!(raw.err.is_empty());
    assert_eq!(raw.war.len(), 1);

    let err = store.read(&root.join("missing-dir"), "x").expect_err("missing dir");
    assert!(matches!(err, BlobError::DirNotFound(_)));
}

#[test]
fn stat_reports_checksum_and_size() {
    let (_temp, root, _logger, store) = setup();
    fs_err::write(root.join("a.txt"), b"abc").expect("write");
    let info = store.stat(&root, "a.txt").expect("stat");
    assert_eq!(info.md5, md5_hex(b"abc"));
    assert_eq!(info.size, 3);
    assert!(info.readable);
    assert!(info.writable);
    assert!(info.mtime > 0);
}

#[test]
fn delete_removes_file() {
    let (_temp, root, logger, store) = setup();
    fs_err::write(root.join("gone.txt"), b"x").expect("write");
    store.delete(&root, "gone.txt").expect("delete");
    assert!(!root.join("gone.txt").exists());
    assert!(matches!(
        store.delete(&root, "gone.txt"),
        Err(BlobError::NotFound(_))
    ));
    assert_eq!(logger.raw().msg.len(), 1);
}
