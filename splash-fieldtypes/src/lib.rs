//! Field types of Splash schemas.
//!
//! Each type name used in a descriptor maps to a [`FieldKind`] that can
//! validate wire values and generate fake ones for tests. The
//! [`FieldTypeRegistry`] resolves composite type strings (`T@list`,
//! `objectid::Type`) to their base handler.

mod block;
pub mod builtin;
mod kind;
mod registry;

pub use block::{BlockError, fake_block, validate_block, validate_field_data};
pub use builtin::builtin_kinds;
pub use builtin::{DATE_FORMAT, DATETIME_FORMAT, FAKE_DOUBLE_BOUND, FAKE_MAX_LENGTH, FAKE_MAX_WORDS};
pub use kind::{FakeOptions, FieldKind, OPTION_OBJECT_TYPE};
pub use registry::{FieldTypeRegistry, TypeError};
