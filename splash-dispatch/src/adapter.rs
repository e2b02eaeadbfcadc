use crate::handlers::HandlerRegistry;
use indexmap::IndexMap;
use serde_json::Value;

/// Field id to wire value, as received by a Set request.
pub type FieldValues = IndexMap<String, Value>;

/// Host side of one synchronized object type.
///
/// The adapter owns access to the host persistence layer; field level work is
/// done by the handlers it registers in [`ObjectAdapter::handlers`].
pub trait ObjectAdapter {
    /// In-memory host object the handlers read and write.
    type Target;

    fn object_type(&self) -> &str;

    /// Phase tagged handlers, in the order they are tried.
    fn handlers() -> HandlerRegistry<Self>
    where
        Self: Sized;

    /// `Ok(None)` when no object has this id.
    fn load(&mut self, id: &str) -> anyhow::Result<Option<Self::Target>>;

    /// New host object for a Set without id. `input` holds every requested value.
    fn create(&mut self, input: &FieldValues) -> anyhow::Result<Option<Self::Target>>;

    /// Persist the object if `needed`, returning its id or `None` on failure.
    fn update(&mut self, target: Self::Target, needed: bool) -> anyhow::Result<Option<String>>;
}

/// Fields requested by a Get, as `key -> field id`.
///
/// Wire requests are either a list of ids, keyed by their position, or an
/// explicit key to id map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedFields {
    entries: IndexMap<String, String>,
}

impl RequestedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an array of ids or an object of ids. Non string ids are refused.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| v.as_str().map(|id| (i.to_string(), id.to_string())))
                .collect::<Option<IndexMap<_, _>>>()
                .map(|entries| Self { entries }),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| v.as_str().map(|id| (k.clone(), id.to_string())))
                .collect::<Option<IndexMap<_, _>>>()
                .map(|entries| Self { entries }),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, field: impl Into<String>) {
        self.entries.insert(key.into(), field.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn into_inner(self) -> IndexMap<String, String> {
        self.entries
    }
}

impl<S: Into<String>> FromIterator<S> for RequestedFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .enumerate()
                .map(|(i, id)| (i.to_string(), id.into()))
                .collect(),
        }
    }
}
