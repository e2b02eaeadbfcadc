//! Task pipeline of a Splash connector.
//!
//! A [`Connector`] owns the [`Runtime`](splash_runtime::Runtime) and one
//! [`ObjectService`] per synchronized object type. It runs batches of
//! [`Task`]s (`objects`, `fields`, `get`, `set`) and answers with a
//! [`Response`] carrying per task results and the protocol log.
//!
//! Transport framing is left to the embedding host.

pub mod connector;
pub mod service;
pub mod task;

pub use connector::{Connector, TaskError};
pub use service::ObjectService;
pub use task::{Response, Task, TaskResult};
