use thiserror::Error;

/// Problems found while declaring a schema.
///
/// None of them abort the builder: the offending call or descriptor is
/// dropped, the error is logged and kept for [`FieldsFactory::errors`](crate::FieldsFactory::errors).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("no field is being defined")]
    NoPendingField,
    #[error("field definition has no type")]
    MissingType,
    #[error("field type `{0}` is malformed")]
    InvalidType(String),
    #[error("field of type `{field_type}` has no identifier")]
    MissingId { field_type: String },
    #[error("field identifier `{0}` is malformed")]
    InvalidId(String),
    #[error("field `{0}` has no name")]
    MissingName(String),
    #[error("field `{0}` has no description")]
    MissingDescription(String),
    #[error("field `{0}`: option type may not be empty")]
    EmptyOptionType(String),
    #[error("no fields were declared")]
    NoFieldsDeclared,
}

impl SchemaError {
    /// Translation key of the diagnostic.
    pub fn key(&self) -> &'static str {
        match self {
            SchemaError::NoPendingField => "ErrFieldsNoNew",
            SchemaError::MissingType | SchemaError::InvalidType(_) => "ErrFieldsNoType",
            SchemaError::MissingId { .. } | SchemaError::InvalidId(_) => "ErrFieldsNoId",
            SchemaError::MissingName(_) => "ErrFieldsNoName",
            SchemaError::MissingDescription(_) => "ErrFieldsNoDesc",
            SchemaError::EmptyOptionType(_) => "ErrFieldsNoOptionType",
            SchemaError::NoFieldsDeclared => "ErrFieldsNoList",
        }
    }

    /// Positional parameter of the translated message, if any.
    pub fn subject(&self) -> Option<&str> {
        match self {
            SchemaError::InvalidType(s)
            | SchemaError::InvalidId(s)
            | SchemaError::MissingName(s)
            | SchemaError::MissingDescription(s)
            | SchemaError::EmptyOptionType(s) => Some(s),
            SchemaError::MissingId { field_type } => Some(field_type),
            _ => None,
        }
    }
}
