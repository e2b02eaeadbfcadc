use crate::ids::{FieldId, FieldType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One `(key, label)` pair of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChoice {
    pub key: String,
    pub value: String,
}

/// Declarative metadata for one synchronizable attribute of a host object type.
///
/// Serialized with the flat key names the remote server expects
/// (`desc`, `inlist`, `itemprop`, `asso`, ...). Optional linking attributes are
/// always present on the wire, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub name: String,

    #[serde(rename = "desc")]
    pub description: String,

    #[serde(default)]
    pub group: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default = "default_true")]
    pub read: bool,

    #[serde(default = "default_true")]
    pub write: bool,

    /// Shown in object list responses.
    #[serde(default, rename = "inlist")]
    pub in_list: bool,

    /// Changes are recorded in the host's history.
    #[serde(default)]
    pub log: bool,

    #[serde(default, rename = "itemtype")]
    pub item_type: Option<String>,

    #[serde(default, rename = "itemprop")]
    pub item_prop: Option<String>,

    /// Hash of `itemprop::itemtype`, set together with the linking pair.
    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub choices: Vec<FieldChoice>,

    #[serde(default, rename = "asso")]
    pub associations: Vec<String>,

    /// Constraints for generated test data.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,

    #[serde(default)]
    pub notest: bool,
}

fn default_true() -> bool {
    true
}

impl FieldDescriptor {
    pub fn is_read_only(&self) -> bool {
        self.read && !self.write
    }

    pub fn is_write_only(&self) -> bool {
        self.write && !self.read
    }

    /// List the field belongs to, taken from its id.
    pub fn list_name(&self) -> Option<&str> {
        self.id.list()
    }

    pub fn has_choice(&self, key: &str) -> bool {
        self.choices.iter().any(|c| c.key == key)
    }
}
