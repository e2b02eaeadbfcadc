//! Collaborators of the Splash engine: protocol log, translations, file store
//! and configuration.
//!
//! # Port traits
//!
//! - [`LogSink`](ports::LogSink): `err/war/msg/deb` protocol log
//! - [`Translator`](ports::Translator): `translate(key, params)`
//! - [`BlobStore`](ports::BlobStore): directory addressed file store
//!
//! The [`adapters`] module provides the default implementations and
//! [`Runtime`] wires a logger and its dictionary from a [`SplashConfig`](config::SplashConfig).

pub mod adapters;
pub mod config;
pub mod ports;

use adapters::{Dictionary, Logger};
use config::SplashConfig;
use ports::{LogSink, Translator};
use std::sync::Arc;
use tracing::debug;

/// Logger and translator pair shared by everything serving one request batch.
#[derive(Clone)]
pub struct Runtime {
    pub config: SplashConfig,
    pub translator: Arc<Dictionary>,
    pub logger: Arc<Logger>,
}

impl Runtime {
    pub fn from_config(config: SplashConfig) -> anyhow::Result<Self> {
        let dictionary = match &config.translations {
            Some(path) => Dictionary::load(path)?,
            None => Dictionary::builtin(),
        };
        let translator = Arc::new(dictionary);
        let mut logger = Logger::new(translator.clone()).with_debug(config.debug);
        if config.logging {
            if let Some(dir) = &config.log_dir {
                logger = logger.with_log_dir(dir);
            }
        }
        logger.set_prefix(&config.prefix);
        debug!(
            "runtime ready: debug={}, log_file={:?}",
            config.debug,
            logger.log_file()
        );
        Ok(Self {
            config,
            translator,
            logger: Arc::new(logger),
        })
    }

    pub fn log(&self) -> Arc<dyn LogSink> {
        self.logger.clone()
    }

    pub fn translator(&self) -> Arc<dyn Translator> {
        self.translator.clone()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        let translator = Arc::new(Dictionary::builtin());
        Self {
            config: SplashConfig::default(),
            logger: Arc::new(Logger::new(translator.clone())),
            translator,
        }
    }
}
