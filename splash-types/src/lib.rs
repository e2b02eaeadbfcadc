//! Shared DTOs (schemas-as-code) for the Splash connector workspace.
//!
//! # Design constraints
//! - These types cross the transport boundary as flat key/value records.
//! - Composite identifiers stay plain strings on the wire and are typed in memory.
//! - Prefer adding optional fields over changing semantics.

pub mod field;
pub mod file;
pub mod ids;
pub mod log;
pub mod price;

/// Names of the built-in field types.
pub mod types {
    pub const VARCHAR: &str = "varchar";
    pub const TEXT: &str = "text";
    pub const INT: &str = "int";
    pub const DOUBLE: &str = "double";
    pub const BOOL: &str = "bool";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const URL: &str = "url";
    pub const LANG: &str = "lang";
    pub const COUNTRY: &str = "country";
    pub const STATE: &str = "state";
    pub const CURRENCY: &str = "currency";
    pub const PRICE: &str = "price";
    pub const IMAGE: &str = "image";
    pub const FILE: &str = "file";
    pub const OBJECT_ID: &str = "objectid";
    pub const INLINE: &str = "inline";
    pub const MVARCHAR: &str = "mvarchar";
    pub const MTEXT: &str = "mtext";
}
