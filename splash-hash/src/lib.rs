//! Small hashing primitives used across Splash internals.
//!
//! Everything here is md5 rendered as lowercase hex, which is what the remote
//! server stores and compares.

pub mod checksum;

use splash_types::ids::ID_SPLIT;

/// Lowercase hex md5 of `bytes`.
pub fn md5_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(md5::compute(bytes.as_ref()).0)
}

/// Stable tag of a semantic-web linking pair: md5 of `itemprop::itemtype`.
pub fn field_tag(item_prop: &str, item_type: &str) -> String {
    md5_hex(format!("{item_prop}{ID_SPLIT}{item_type}"))
}
