use crate::adapters::Dictionary;
use crate::ports::{LogSink, Translator};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use fs_err as fs;
use serde::Serialize;
use splash_types::log::{LogLevel, RawLog};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

pub const DEFAULT_PREFIX: &str = "Splash Client";

/// File name of the optional append-only log inside the log directory.
pub const LOG_FILE_NAME: &str = "splash.log";

/// Buffering protocol logger.
///
/// Entries are translated, kept per level until drained with [`Logger::take`],
/// mirrored to `tracing`, and optionally appended to `splash.log`.
/// Debug entries are only kept while debug mode is on.
pub struct Logger {
    translator: Arc<dyn Translator>,
    debug: AtomicBool,
    prefix: Mutex<String>,
    log_file: Option<Utf8PathBuf>,
    buffer: Mutex<RawLog>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Arc::new(Dictionary::builtin()))
    }
}

impl Logger {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            debug: AtomicBool::new(false),
            prefix: Mutex::new(DEFAULT_PREFIX.to_string()),
            log_file: None,
            buffer: Mutex::new(RawLog::default()),
        }
    }

    pub fn with_debug(self, debug: bool) -> Self {
        self.debug.store(debug, Ordering::Relaxed);
        self
    }

    /// Append every entry to `<dir>/splash.log`.
    pub fn with_log_dir(mut self, dir: &Utf8Path) -> Self {
        self.log_file = Some(dir.join(LOG_FILE_NAME));
        self
    }

    pub fn log_file(&self) -> Option<&Utf8Path> {
        self.log_file.as_deref()
    }

    fn buffer(&self) -> MutexGuard<'_, RawLog> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Switching debug off drops buffered debug entries.
    pub fn set_debug(&self, debug: bool) {
        self.debug.store(debug, Ordering::Relaxed);
        if !debug {
            self.buffer().clear_level(LogLevel::Debug);
        }
    }

    pub fn prefix(&self) -> String {
        self.prefix
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_prefix(&self, prefix: &str) {
        *self.prefix.lock().unwrap_or_else(PoisonError::into_inner) = prefix.to_string();
    }

    fn record(&self, level: LogLevel, key: &str, params: &[&str]) {
        if level == LogLevel::Debug && !self.is_debug() {
            return;
        }
        let text = self.translator.translate(key, params);
        self.record_text(level, text);
    }

    fn record_text(&self, level: LogLevel, text: String) {
        if level == LogLevel::Debug && !self.is_debug() {
            return;
        }
        let prefix = self.prefix();
        match level {
            LogLevel::Error => error!(prefix = %prefix, "{}", text),
            LogLevel::Warning => warn!(prefix = %prefix, "{}", text),
            LogLevel::Message => info!(prefix = %prefix, "{}", text),
            LogLevel::Debug => debug!(prefix = %prefix, "{}", text),
        }
        self.append_to_file(level, &text);
        self.buffer().push(level, text);
    }

    fn append_to_file(&self, level: LogLevel, text: &str) {
        let Some(path) = &self.log_file else {
            return;
        };
        let line = format!(
            "{} {:<15}{}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.label(),
            text
        );
        let written = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = written {
            debug!("unable to append to {}: {}", path, e);
        }
    }

    /// Empty every buffer.
    pub fn clean(&self) {
        self.buffer().clear();
        self.record(LogLevel::Debug, "MsgLogCleaned", &[]);
    }

    /// Copy of the buffered entries.
    pub fn raw(&self) -> RawLog {
        self.buffer().clone()
    }

    /// Buffered entries, leaving the buffers cleaned.
    pub fn take(&self) -> RawLog {
        let raw = std::mem::take(&mut *self.buffer());
        self.clean();
        raw
    }

    /// Append entries collected elsewhere, for example by a remote call.
    pub fn merge(&self, other: RawLog) {
        for level in LogLevel::ALL {
            for text in other.entries(level) {
                self.append_to_file(level, text);
            }
        }
        self.buffer().merge(other);
    }

    pub fn trace(&self, object_type: &str, function: &str) -> bool {
        self.deb("DebTraceMsg", &[object_type, function])
    }

    /// Record `value` as pretty JSON under a warning.
    pub fn dump(&self, label: &str, value: &impl Serialize) -> bool {
        self.record_text(LogLevel::Warning, format!("{} {}", label, pretty(value)));
        true
    }

    /// Record `value` as pretty JSON under a debug entry.
    pub fn debug_dump(&self, label: &str, value: &impl Serialize) -> bool {
        self.record_text(LogLevel::Debug, format!("{} {}", label, pretty(value)));
        true
    }
}

fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

impl LogSink for Logger {
    fn err(&self, key: &str, params: &[&str]) -> bool {
        self.record(LogLevel::Error, key, params);
        false
    }

    fn war(&self, key: &str, params: &[&str]) -> bool {
        self.record(LogLevel::Warning, key, params);
        true
    }

    fn msg(&self, key: &str, params: &[&str]) -> bool {
        self.record(LogLevel::Message, key, params);
        true
    }

    fn deb(&self, key: &str, params: &[&str]) -> bool {
        self.record(LogLevel::Debug, key, params);
        true
    }
}
