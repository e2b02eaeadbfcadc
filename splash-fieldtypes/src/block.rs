//! Whole data block checks and generation, driven by a published schema.

use crate::registry::{FieldTypeRegistry, TypeError};
use rand::RngCore;
use serde_json::{Map, Value};
use splash_types::field::FieldDescriptor;
use splash_types::ids::{FieldId, LIST_TYPE, is_list_field};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("field `{0}` is not defined in the data block")]
    MissingField(String),
    #[error("list `{0}` is not defined in the data block")]
    MissingList(String),
    #[error("list `{0}` is not an array")]
    NotAList(String),
    #[error("item {index} of list `{list}` is not an object")]
    NotAnItem { list: String, index: usize },
    #[error("list field type `{0}` must match `type@list`")]
    ListTypeMismatch(String),
    #[error("field `{field}`: {source}")]
    InvalidField {
        field: String,
        #[source]
        source: TypeError,
    },
}

fn check_value(
    registry: &FieldTypeRegistry,
    field: &str,
    value: &Value,
    type_name: &str,
) -> Result<(), BlockError> {
    registry
        .validate(value, type_name)
        .map_err(|source| BlockError::InvalidField {
            field: field.to_string(),
            source,
        })
}

fn check_list(
    registry: &FieldTypeRegistry,
    data: &Map<String, Value>,
    field: &str,
    list: &str,
    type_name: &str,
) -> Result<(), BlockError> {
    let item_type = match is_list_field(type_name) {
        Some(l) if l.list_name == LIST_TYPE => l.field_name,
        _ => return Err(BlockError::ListTypeMismatch(type_name.to_string())),
    };
    if registry.resolve(&item_type).is_none() {
        return Err(BlockError::InvalidField {
            field: format!("{field}@{list}"),
            source: TypeError::Unresolved(item_type),
        });
    }
    let items = match data.get(list) {
        None => return Err(BlockError::MissingList(list.to_string())),
        Some(Value::Null) => return Ok(()),
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) if map.is_empty() => return Ok(()),
        Some(_) => return Err(BlockError::NotAList(list.to_string())),
    };
    for (index, item) in items.iter().enumerate() {
        let Value::Object(item) = item else {
            return Err(BlockError::NotAnItem {
                list: list.to_string(),
                index,
            });
        };
        let path = format!("{field}@{list}[{index}]");
        match item.get(field) {
            None => return Err(BlockError::MissingField(path)),
            Some(value) => check_value(registry, &path, value, &item_type)?,
        }
    }
    Ok(())
}

/// Check one field of a data block returned by a read.
pub fn validate_field_data(
    registry: &FieldTypeRegistry,
    data: &Map<String, Value>,
    field: &FieldDescriptor,
) -> Result<(), BlockError> {
    let type_name = field.field_type.to_string();
    match &field.id {
        FieldId::ListMember { field: name, list } => {
            check_list(registry, data, name, list, &type_name)
        }
        FieldId::Plain(id) => match data.get(id) {
            None => Err(BlockError::MissingField(id.clone())),
            Some(value) => check_value(registry, id, value, &type_name),
        },
    }
}

/// Check every readable field, collecting all failures.
pub fn validate_block(
    registry: &FieldTypeRegistry,
    fields: &[FieldDescriptor],
    data: &Map<String, Value>,
) -> Vec<BlockError> {
    fields
        .iter()
        .filter(|f| f.read)
        .filter_map(|f| validate_field_data(registry, data, f).err())
        .collect()
}

/// Generate a write request covering every writable, testable field.
///
/// List members are grouped per list into `items` objects.
pub fn fake_block(
    registry: &FieldTypeRegistry,
    fields: &[FieldDescriptor],
    items: usize,
    rng: &mut dyn RngCore,
) -> Result<Map<String, Value>, TypeError> {
    let mut out = Map::new();
    for field in fields.iter().filter(|f| f.write && !f.notest) {
        let type_name = field.field_type.to_string();
        match &field.id {
            FieldId::Plain(id) => {
                let value = registry.fake(&type_name, &field.options, rng)?;
                out.insert(id.clone(), value);
            }
            FieldId::ListMember { field: name, list } => {
                let item_type = field.field_type.item().to_string();
                let slot = out
                    .entry(list.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                let Value::Array(rows) = slot else {
                    continue;
                };
                while rows.len() < items {
                    rows.push(Value::Object(Map::new()));
                }
                for row in rows.iter_mut().take(items) {
                    if let Value::Object(row) = row {
                        let value = registry.fake(&item_type, &field.options, rng)?;
                        row.insert(name.clone(), value);
                    }
                }
            }
        }
    }
    Ok(out)
}
