//! Port traits for everything the engine consumes but does not own.

use crate::adapters::BlobError;
use camino::Utf8Path;
use splash_types::file::{FileContents, FileInfo};

/// Protocol log sink.
///
/// Every method takes a translation key plus positional parameters, records
/// the translated text and never fails. `err` returns `false` so it can end a
/// failing branch; the others return `true`.
pub trait LogSink: Send + Sync {
    fn err(&self, key: &str, params: &[&str]) -> bool;
    fn war(&self, key: &str, params: &[&str]) -> bool;
    fn msg(&self, key: &str, params: &[&str]) -> bool;
    fn deb(&self, key: &str, params: &[&str]) -> bool;
}

/// Translation service.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, params: &[&str]) -> String;

    /// Translate, then cut the result to `max_len` characters.
    fn translate_max(&self, key: &str, params: &[&str], max_len: usize) -> String {
        let text = self.translate(key, params);
        match text.char_indices().nth(max_len) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text,
        }
    }
}

/// Directory-addressed blob store used by file and image fields.
pub trait BlobStore {
    fn read(&self, dir: &Utf8Path, file: &str) -> Result<FileContents, BlobError>;

    /// Base64 content only.
    fn read_contents(&self, dir: &Utf8Path, file: &str) -> Result<String, BlobError> {
        self.read(dir, file).map(|c| c.raw)
    }

    /// Write base64 `raw` and verify the stored bytes against `md5`.
    fn write(&self, dir: &Utf8Path, file: &str, md5: &str, raw: &str) -> Result<(), BlobError>;

    fn delete(&self, dir: &Utf8Path, file: &str) -> Result<(), BlobError>;

    fn stat(&self, dir: &Utf8Path, file: &str) -> Result<FileInfo, BlobError>;
}
