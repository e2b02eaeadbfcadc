//! Get/Set dispatch engine.
//!
//! A host object type implements [`ObjectAdapter`] and registers ordered,
//! phase tagged handlers in a [`HandlerRegistry`]. [`ObjectDispatcher`] then
//! serves three requests against it:
//!
//! - `fields`: build handlers declare the schema on a
//!   [`FieldsFactory`](splash_fields::FieldsFactory), which is published
//! - `get`: getters claim requested fields and write their values
//! - `set`: setters claim submitted fields and apply them, then the adapter
//!   saves the object
//!
//! A Get or Set fails as a whole when any requested field is left unclaimed.

mod adapter;
mod context;
mod dispatcher;
mod error;
mod handlers;

pub use adapter::{FieldValues, ObjectAdapter, RequestedFields};
pub use context::{GetContext, SetContext, UpdateFlag};
pub use dispatcher::ObjectDispatcher;
pub use error::DispatchError;
pub use handlers::{BuildHandler, GetHandler, Handler, HandlerRegistry, Phase, SetHandler};
