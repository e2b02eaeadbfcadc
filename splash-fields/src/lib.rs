//! Field schema builder.
//!
//! A host object type declares its synchronizable fields once through a
//! [`FieldsFactory`], which validates each descriptor when it is committed and
//! hands the ordered list over on [`FieldsFactory::publish`].

mod error;
mod factory;

pub use error::SchemaError;
pub use factory::{FieldsFactory, search_by_id, search_by_tag};
