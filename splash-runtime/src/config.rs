//! Configuration file loading.
//!
//! Discovers and loads `splash.toml` from a root directory. Every key is
//! optional.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::DEFAULT_PREFIX;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "splash.toml";

/// Top-level configuration from splash.toml.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Keep debug entries in the protocol log.
    pub debug: bool,

    /// Append protocol log entries to `<log_dir>/splash.log`.
    pub logging: bool,

    pub log_dir: Option<Utf8PathBuf>,

    /// Name reported alongside log entries.
    pub prefix: String,

    /// Extra translations, a TOML file with a `[messages]` table.
    pub translations: Option<Utf8PathBuf>,

    /// Root directory of the local file store.
    pub files_dir: Option<Utf8PathBuf>,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            debug: false,
            logging: false,
            log_dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            translations: None,
            files_dir: None,
        }
    }
}

impl SplashConfig {
    /// Resolve relative paths against `root`.
    pub fn rooted_at(mut self, root: &Utf8Path) -> Self {
        let rebase = |p: Option<Utf8PathBuf>| {
            p.map(|p| if p.is_relative() { root.join(p) } else { p })
        };
        self.log_dir = rebase(self.log_dir);
        self.translations = rebase(self.translations);
        self.files_dir = rebase(self.files_dir);
        self
    }
}

/// Discover the splash.toml config file.
///
/// Returns `None` if no config file is found in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a splash.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<SplashConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let config = parse_config(&contents).with_context(|| format!("parse config file {}", path))?;
    Ok(match path.parent() {
        Some(root) => config.rooted_at(root),
        None => config,
    })
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<SplashConfig> {
    let config: SplashConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `root`, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<SplashConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(SplashConfig::default()),
    }
}
