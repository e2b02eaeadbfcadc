use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a protocol log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "err")]
    Error,
    #[serde(rename = "war")]
    Warning,
    #[serde(rename = "msg")]
    Message,
    #[serde(rename = "deb")]
    Debug,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Message,
        LogLevel::Debug,
    ];

    /// Wire key of the buffer holding this level.
    pub fn key(self) -> &'static str {
        match self {
            LogLevel::Error => "err",
            LogLevel::Warning => "war",
            LogLevel::Message => "msg",
            LogLevel::Debug => "deb",
        }
    }

    /// Label used in the log file.
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Message => "MESSAGE",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buffered protocol log as returned alongside every response.
///
/// Empty buffers are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub err: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub war: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub msg: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deb: Vec<String>,
}

impl RawLog {
    pub fn entries(&self, level: LogLevel) -> &[String] {
        match level {
            LogLevel::Error => &self.err,
            LogLevel::Warning => &self.war,
            LogLevel::Message => &self.msg,
            LogLevel::Debug => &self.deb,
        }
    }

    fn entries_mut(&mut self, level: LogLevel) -> &mut Vec<String> {
        match level {
            LogLevel::Error => &mut self.err,
            LogLevel::Warning => &mut self.war,
            LogLevel::Message => &mut self.msg,
            LogLevel::Debug => &mut self.deb,
        }
    }

    pub fn push(&mut self, level: LogLevel, text: impl Into<String>) {
        self.entries_mut(level).push(text.into());
    }

    /// Append all entries of `other`, level by level.
    pub fn merge(&mut self, other: RawLog) {
        self.err.extend(other.err);
        self.war.extend(other.war);
        self.msg.extend(other.msg);
        self.deb.extend(other.deb);
    }

    pub fn clear_level(&mut self, level: LogLevel) {
        self.entries_mut(level).clear();
    }

    pub fn clear(&mut self) {
        *self = RawLog::default();
    }

    pub fn is_empty(&self) -> bool {
        LogLevel::ALL.iter().all(|l| self.entries(*l).is_empty())
    }

    pub fn len(&self) -> usize {
        LogLevel::ALL.iter().map(|l| self.entries(*l).len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.err.is_empty()
    }
}
