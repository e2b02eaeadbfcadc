//! Default port implementations.

mod blob;
mod dictionary;
mod logger;

pub use blob::{BlobError, FsBlobStore};
pub use dictionary::{Dictionary, MAX_PARAMS};
pub use logger::{DEFAULT_PREFIX, LOG_FILE_NAME, Logger};
