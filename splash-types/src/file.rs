use serde::{Deserialize, Serialize};

/// File read from a blob store, content base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    pub filename: String,
    pub raw: String,
    pub md5: String,
    pub size: u64,
}

/// Metadata of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub owner: String,
    pub readable: bool,
    pub writable: bool,
    /// Last modification, seconds since the Unix epoch.
    pub mtime: i64,
    /// Last modification, human readable.
    pub modified: String,
    pub md5: String,
    pub size: u64,
}
