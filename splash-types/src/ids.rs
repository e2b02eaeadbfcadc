//! Composite identifier codec.
//!
//! Two conventions are folded into plain strings on the wire:
//! - list members: `field@list` (ids) and `type@list` (types)
//! - object references: `id::ObjectType` (values) and `objectid::ObjectType` (types)
//!
//! Decoding requires exactly one separator occurrence. Anything else is "not composite".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between a field (or type) name and its list name.
pub const LIST_SPLIT: &str = "@";

/// Separator between an object id (or the reference type) and an object type.
pub const ID_SPLIT: &str = "::";

/// List part of a list field type, as in `varchar@list`.
pub const LIST_TYPE: &str = "list";

/// Base type name of object reference fields.
pub const OBJECT_ID_TYPE: &str = "objectid";

/// Decoded `field@list` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListField {
    pub field_name: String,
    pub list_name: String,
}

impl ListField {
    pub fn new(field_name: impl Into<String>, list_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            list_name: list_name.into(),
        }
    }

    pub fn encode(&self) -> String {
        encode_list_field(&self.field_name, &self.list_name)
    }
}

impl fmt::Display for ListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field_name, LIST_SPLIT, self.list_name)
    }
}

/// Decoded `id::ObjectType` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    pub object_id: String,
    pub object_type: String,
}

impl ObjectReference {
    pub fn new(object_id: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            object_type: object_type.into(),
        }
    }

    pub fn encode(&self) -> String {
        encode_object_reference(&self.object_id, &self.object_type)
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.object_id, ID_SPLIT, self.object_type)
    }
}

fn split_pair<'a>(s: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let mut parts = s.split(separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Some((first, second)),
        _ => None,
    }
}

/// Decode a `field@list` string. `None` unless it splits into exactly two parts.
pub fn is_list_field(s: &str) -> Option<ListField> {
    split_pair(s, LIST_SPLIT).map(|(field, list)| ListField::new(field, list))
}

/// Decode an `id::ObjectType` string. `None` unless it splits into exactly two parts.
pub fn is_object_reference(s: &str) -> Option<ObjectReference> {
    split_pair(s, ID_SPLIT).map(|(id, object_type)| ObjectReference::new(id, object_type))
}

pub fn encode_list_field(field_name: &str, list_name: &str) -> String {
    format!("{field_name}{LIST_SPLIT}{list_name}")
}

pub fn encode_object_reference(object_id: &str, object_type: &str) -> String {
    format!("{object_id}{ID_SPLIT}{object_type}")
}

/// Extract the object id from a reference value, if it targets `object_type`.
pub fn object_id_for(value: &str, object_type: &str) -> Option<String> {
    is_object_reference(value)
        .filter(|r| r.object_type == object_type)
        .map(|r| r.object_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("empty identifier")]
    Empty,
    #[error("identifier `{0}` contains more than one `@` separator")]
    NestedList(String),
}

/// Typed field identifier. Encoded as `field` or `field@list` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FieldId {
    Plain(String),
    ListMember { field: String, list: String },
}

impl FieldId {
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        if s.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if let Some(l) = is_list_field(s) {
            return Ok(FieldId::ListMember {
                field: l.field_name,
                list: l.list_name,
            });
        }
        if s.contains(LIST_SPLIT) {
            return Err(IdentifierError::NestedList(s.to_string()));
        }
        Ok(FieldId::Plain(s.to_string()))
    }

    /// Field name without its list part.
    pub fn base(&self) -> &str {
        match self {
            FieldId::Plain(name) => name,
            FieldId::ListMember { field, .. } => field,
        }
    }

    pub fn list(&self) -> Option<&str> {
        match self {
            FieldId::Plain(_) => None,
            FieldId::ListMember { list, .. } => Some(list),
        }
    }

    /// Move this id into `list`. An existing list part is replaced.
    pub fn in_list(self, list: &str) -> Self {
        FieldId::ListMember {
            field: match self {
                FieldId::Plain(name) => name,
                FieldId::ListMember { field, .. } => field,
            },
            list: list.to_string(),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Plain(name) => f.write_str(name),
            FieldId::ListMember { field, list } => write!(f, "{field}{LIST_SPLIT}{list}"),
        }
    }
}

impl FromStr for FieldId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::parse(s)
    }
}

impl From<FieldId> for String {
    fn from(id: FieldId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for FieldId {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        FieldId::parse(&s)
    }
}

impl PartialEq<str> for FieldId {
    fn eq(&self, other: &str) -> bool {
        match self {
            FieldId::Plain(name) => name == other,
            FieldId::ListMember { .. } => self.to_string() == other,
        }
    }
}

impl PartialEq<&str> for FieldId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Typed field type. Encoded as `name`, `item@list` or `objectid::ObjectType` on the wire.
///
/// References are always encoded with the `objectid` prefix, so a non-canonical
/// prefix such as `ref::Product` is normalized on decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FieldType {
    Plain(String),
    ListMember { item: Box<FieldType>, list: String },
    ObjectRef { object_type: String },
}

impl FieldType {
    pub fn plain(name: impl Into<String>) -> Self {
        FieldType::Plain(name.into())
    }

    pub fn object_ref(object_type: impl Into<String>) -> Self {
        FieldType::ObjectRef {
            object_type: object_type.into(),
        }
    }

    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        if s.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if let Some(l) = is_list_field(s) {
            return Ok(FieldType::ListMember {
                item: Box::new(Self::parse_item(&l.field_name)),
                list: l.list_name,
            });
        }
        if s.contains(LIST_SPLIT) {
            return Err(IdentifierError::NestedList(s.to_string()));
        }
        Ok(Self::parse_item(s))
    }

    fn parse_item(s: &str) -> Self {
        match is_object_reference(s) {
            Some(r) => FieldType::ObjectRef {
                object_type: r.object_type,
            },
            None => FieldType::Plain(s.to_string()),
        }
    }

    /// Name used to look up the type handler: list wrappers are unwrapped and
    /// references resolve to `objectid`.
    pub fn base_name(&self) -> &str {
        match self {
            FieldType::Plain(name) => name,
            FieldType::ListMember { item, .. } => item.base_name(),
            FieldType::ObjectRef { .. } => OBJECT_ID_TYPE,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::ListMember { .. })
    }

    pub fn list(&self) -> Option<&str> {
        match self {
            FieldType::ListMember { list, .. } => Some(list),
            _ => None,
        }
    }

    /// Item type of a list type, or the type itself.
    pub fn item(&self) -> &FieldType {
        match self {
            FieldType::ListMember { item, .. } => item,
            other => other,
        }
    }

    /// Target object type of a reference, looking through list wrappers.
    pub fn referenced_object(&self) -> Option<&str> {
        match self.item() {
            FieldType::ObjectRef { object_type } => Some(object_type),
            _ => None,
        }
    }

    /// Wrap this type as a member of the generic `list` collection.
    pub fn in_list(self) -> Self {
        let item = match self {
            FieldType::ListMember { item, .. } => item,
            other => Box::new(other),
        };
        FieldType::ListMember {
            item,
            list: LIST_TYPE.to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Plain(name) => f.write_str(name),
            FieldType::ListMember { item, list } => write!(f, "{item}{LIST_SPLIT}{list}"),
            FieldType::ObjectRef { object_type } => {
                write!(f, "{OBJECT_ID_TYPE}{ID_SPLIT}{object_type}")
            }
        }
    }
}

impl FromStr for FieldType {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::parse(s)
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.to_string()
    }
}

impl TryFrom<String> for FieldType {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        FieldType::parse(&s)
    }
}
