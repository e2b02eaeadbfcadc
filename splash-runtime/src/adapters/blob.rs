use crate::ports::{BlobStore, LogSink};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use fs_err as fs;
use splash_hash::md5_hex;
use splash_types::file::{FileContents, FileInfo};
use splash_types::log::LogLevel;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("directory not given")]
    DirMissing,
    #[error("file name not given")]
    FileMissing,
    #[error("file checksum not given")]
    Md5Missing,
    #[error("file contents not given")]
    RawMissing,
    #[error("directory {0} does not exist")]
    DirNotFound(Utf8PathBuf),
    #[error("file {0} does not exist")]
    NotFound(Utf8PathBuf),
    #[error("file {0} is not readable")]
    NotReadable(Utf8PathBuf),
    #[error("file {0} is not writable")]
    NotWritable(Utf8PathBuf),
    #[error("contents for {0} are not valid base64")]
    Decode(Utf8PathBuf),
    #[error("checksum of {0} does not match after write")]
    ChecksumMismatch(Utf8PathBuf),
    #[error("read {path}: {source}")]
    ReadFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("delete {path}: {source}")]
    DeleteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Translation key of the diagnostic.
    pub fn key(&self) -> &'static str {
        match self {
            BlobError::DirMissing => "ErrFileDirMissing",
            BlobError::FileMissing => "ErrFileFileMissing",
            BlobError::Md5Missing => "ErrFileMd5Missing",
            BlobError::RawMissing => "ErrFileRawMissing",
            BlobError::DirNotFound(_) => "ErrFileDirNoExists",
            BlobError::NotFound(_) => "ErrFileNoExists",
            BlobError::NotReadable(_) => "ErrFileReadable",
            BlobError::NotWritable(_) => "ErrFileWriteable",
            BlobError::Decode(_) => "ErrFileRawDecode",
            BlobError::ChecksumMismatch(_) => "ErrFileMd5Mismatch",
            BlobError::ReadFailed { .. } => "ErrFileRead",
            BlobError::WriteFailed { .. } => "ErrFileWrite",
            BlobError::DeleteFailed { .. } => "ErrFileDeleted",
        }
    }

    /// Missing files and directories are warnings, everything else an error.
    pub fn level(&self) -> LogLevel {
        match self {
            BlobError::DirNotFound(_) | BlobError::NotFound(_) | BlobError::NotReadable(_) => {
                LogLevel::Warning
            }
            _ => LogLevel::Error,
        }
    }

    fn subject(&self) -> Option<&Utf8Path> {
        match self {
            BlobError::DirNotFound(p)
            | BlobError::NotFound(p)
            | BlobError::NotReadable(p)
            | BlobError::NotWritable(p)
            | BlobError::Decode(p)
            | BlobError::ChecksumMismatch(p) => Some(p),
            BlobError::ReadFailed { path, .. }
            | BlobError::WriteFailed { path, .. }
            | BlobError::DeleteFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Local filesystem blob store. Every outcome is also reported to the log sink.
pub struct FsBlobStore {
    log: Arc<dyn LogSink>,
}

impl FsBlobStore {
    pub fn new(log: Arc<dyn LogSink>) -> Self {
        Self { log }
    }

    fn fail<T>(&self, function: &str, err: BlobError) -> Result<T, BlobError> {
        let subject = err.subject().map(|p| p.to_string()).unwrap_or_default();
        let params = [function, subject.as_str()];
        match err.level() {
            LogLevel::Warning => self.log.war(err.key(), &params),
            _ => self.log.err(err.key(), &params),
        };
        Err(err)
    }

    fn check_args(dir: &Utf8Path, file: &str) -> Result<(), BlobError> {
        if dir.as_str().is_empty() {
            return Err(BlobError::DirMissing);
        }
        if file.is_empty() {
            return Err(BlobError::FileMissing);
        }
        Ok(())
    }

    /// Resolve `dir/file`, requiring an existing directory and file.
    fn existing(&self, dir: &Utf8Path, file: &str) -> Result<Utf8PathBuf, BlobError> {
        Self::check_args(dir, file)?;
        if !dir.is_dir() {
            return Err(BlobError::DirNotFound(dir.to_path_buf()));
        }
        let path = dir.join(file);
        if !path.is_file() {
            return Err(BlobError::NotFound(path));
        }
        Ok(path)
    }

    fn read_bytes(path: &Utf8Path) -> Result<Vec<u8>, BlobError> {
        fs::read(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::PermissionDenied => BlobError::NotReadable(path.to_path_buf()),
            _ => BlobError::ReadFailed {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn read_inner(&self, dir: &Utf8Path, file: &str) -> Result<FileContents, BlobError> {
        let path = self.existing(dir, file)?;
        self.log.deb("MsgFileExists", &["read", file]);
        let bytes = Self::read_bytes(&path)?;
        self.log.deb("MsgFileRead", &["read", file]);
        Ok(FileContents {
            filename: file.to_string(),
            raw: STANDARD.encode(&bytes),
            md5: md5_hex(&bytes),
            size: bytes.len() as u64,
        })
    }

    fn write_inner(&self, dir: &Utf8Path, file: &str, md5: &str, raw: &str) -> Result<(), BlobError> {
        Self::check_args(dir, file)?;
        if md5.is_empty() {
            return Err(BlobError::Md5Missing);
        }
        if raw.is_empty() {
            return Err(BlobError::RawMissing);
        }
        let path = dir.join(file);
        let bytes = STANDARD
            .decode(raw)
            .map_err(|_| BlobError::Decode(path.clone()))?;
        fs::create_dir_all(dir).map_err(|source| BlobError::WriteFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        if path.is_file() {
            self.log.deb("MsgFileExists", &["write", file]);
            let readonly = fs::metadata(&path)
                .map(|m| m.permissions().readonly())
                .unwrap_or(false);
            if readonly {
                return Err(BlobError::NotWritable(path));
            }
        }
        fs::write(&path, &bytes).map_err(|source| BlobError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        let stored = Self::read_bytes(&path)?;
        if md5_hex(&stored) != md5 {
            return Err(BlobError::ChecksumMismatch(path));
        }
        self.log.msg("MsgFileWrite", &["write", file]);
        Ok(())
    }

    fn delete_inner(&self, dir: &Utf8Path, file: &str) -> Result<(), BlobError> {
        let path = self.existing(dir, file)?;
        self.log.deb("MsgFileExists", &["delete", file]);
        fs::remove_file(&path).map_err(|source| BlobError::DeleteFailed {
            path: path.clone(),
            source,
        })?;
        self.log.msg("MsgFileDeleted", &["delete", file]);
        Ok(())
    }

    fn stat_inner(&self, dir: &Utf8Path, file: &str) -> Result<FileInfo, BlobError> {
        let path = self.existing(dir, file)?;
        let meta = fs::metadata(&path).map_err(|source| BlobError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        let bytes = Self::read_bytes(&path)?;
        let modified: DateTime<Local> = meta
            .modified()
            .map(DateTime::from)
            .unwrap_or_else(|_| Local::now());
        self.log.deb("MsgFileExists", &["stat", file]);
        Ok(FileInfo {
            owner: owner_of(&meta),
            readable: true,
            writable: !meta.permissions().readonly(),
            mtime: modified.timestamp(),
            modified: modified.format("%B %d %Y %H:%M:%S.").to_string(),
            md5: md5_hex(&bytes),
            size: meta.len(),
        })
    }
}

#[cfg(unix)]
fn owner_of(meta: &std::fs::Metadata) -> String {
    use std::os::unix::fs::MetadataExt;
    meta.uid().to_string()
}

#[cfg(not(unix))]
fn owner_of(_meta: &std::fs::Metadata) -> String {
    String::new()
}

impl BlobStore for FsBlobStore {
    fn read(&self, dir: &Utf8Path, file: &str) -> Result<FileContents, BlobError> {
        self.read_inner(dir, file).or_else(|e| self.fail("read", e))
    }

    fn write(&self, dir: &Utf8Path, file: &str, md5: &str, raw: &str) -> Result<(), BlobError> {
        self.write_inner(dir, file, md5, raw)
            .or_else(|e| self.fail("write", e))
    }

    fn delete(&self, dir: &Utf8Path, file: &str) -> Result<(), BlobError> {
        self.delete_inner(dir, file).or_else(|e| self.fail("delete", e))
    }

    fn stat(&self, dir: &Utf8Path, file: &str) -> Result<FileInfo, BlobError> {
        self.stat_inner(dir, file).or_else(|e| self.fail("stat", e))
    }
}
