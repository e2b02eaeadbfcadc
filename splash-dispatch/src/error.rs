use splash_fields::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{object_type}: object `{id}` not found")]
    ObjectNotFound { object_type: String, id: String },

    #[error("{object_type}: unable to create a new object")]
    CreateFailed { object_type: String },

    /// Requested fields no handler claimed. Each one was logged separately.
    #[error("{object_type}: unknown fields {}", fields.join(", "))]
    UnconsumedFields {
        object_type: String,
        fields: Vec<String>,
    },

    #[error("{object_type}: unable to save object changes")]
    UpdateFailed { object_type: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{object_type}: host error: {source}")]
    Host {
        object_type: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Translation key of the diagnostic.
    pub fn key(&self) -> &'static str {
        match self {
            DispatchError::ObjectNotFound { .. } => "ErrLocalObjectNotFound",
            DispatchError::CreateFailed { .. } => "ErrLocalObjectCreate",
            DispatchError::UnconsumedFields { .. } => "ErrLocalWrongField",
            DispatchError::UpdateFailed { .. } => "ErrLocalObjectUpdate",
            DispatchError::Schema(e) => e.key(),
            DispatchError::Host { .. } => "ErrLocalHost",
        }
    }

    /// Field ids left unclaimed, empty for other failures.
    pub fn unconsumed_fields(&self) -> &[String] {
        match self {
            DispatchError::UnconsumedFields { fields, .. } => fields,
            _ => &[],
        }
    }
}
