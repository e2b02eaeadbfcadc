use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use serde_json::{Map, Value};
use splash_fieldtypes::{FieldTypeRegistry, validate_block};
use splash_types::field::FieldDescriptor;
use std::collections::BTreeSet;

/// Published schema stored as a JSON array of descriptors.
pub fn load_schema(path: &Utf8Path) -> anyhow::Result<Vec<FieldDescriptor>> {
    let contents = fs::read_to_string(path).with_context(|| format!("read schema {}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("parse schema {}", path))
}

pub fn load_data(path: &Utf8Path) -> anyhow::Result<Map<String, Value>> {
    let contents = fs::read_to_string(path).with_context(|| format!("read data {}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("parse data {}", path))
}

/// Problems a remote server would reject the schema for.
pub fn check_schema(registry: &FieldTypeRegistry, fields: &[FieldDescriptor]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = BTreeSet::new();
    for field in fields {
        let id = field.id.to_string();
        if !seen.insert(id.clone()) {
            problems.push(format!("{id}: duplicate field id"));
        }
        if registry.resolve_type(&field.field_type).is_none() {
            problems.push(format!("{id}: unknown type `{}`", field.field_type));
        }
        match (field.id.list(), field.field_type.is_list()) {
            (Some(_), false) => problems.push(format!(
                "{id}: list member must have a `type@list` type, found `{}`",
                field.field_type
            )),
            (None, true) => problems.push(format!(
                "{id}: type `{}` is a list type but the id names no list",
                field.field_type
            )),
            _ => {}
        }
        if !field.read && !field.write {
            problems.push(format!("{id}: neither readable nor writable"));
        }
    }
    problems
}

/// Schema problems followed by data block problems.
pub fn check_data(
    registry: &FieldTypeRegistry,
    fields: &[FieldDescriptor],
    data: &Map<String, Value>,
) -> Vec<String> {
    validate_block(registry, fields, data)
        .into_iter()
        .map(|e| e.to_string())
        .collect()
}
