//! Checksums of flat value maps.
//!
//! Only scalar values (strings, numbers, booleans) take part. Keys are sorted
//! so the digest does not depend on insertion order, and the encoding is
//! lowercased so `ABC` and `abc` hash the same.
//!
//! The hashed text is compact JSON (`{"a":1,"b":"x"}`). Digests are therefore
//! not interchangeable with checksums produced by the PHP connector, which
//! hashes PHP `serialize()` output; compare digests only with values computed
//! by this module.

use crate::md5_hex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn sorted_scalars<'a, I>(entries: I) -> Option<BTreeMap<String, &'a Value>>
where
    I: IntoIterator<Item = (String, &'a Value)>,
{
    let mut sorted = BTreeMap::new();
    for (key, value) in entries {
        if !is_scalar(value) {
            return None;
        }
        sorted.insert(key, value);
    }
    Some(sorted)
}

fn digest(sorted: &BTreeMap<String, &Value>) -> Option<String> {
    let encoded = serde_json::to_string(sorted).ok()?;
    Some(md5_hex(encoded.to_lowercase()))
}

/// Checksum of a map. `None` when any value is not a scalar.
pub fn from_map(input: &Map<String, Value>) -> Option<String> {
    digest(&sorted_scalars(input.iter().map(|(k, v)| (k.clone(), v)))?)
}

/// Checksum of positional values, keyed by their index.
pub fn from_values(values: &[Value]) -> Option<String> {
    digest(&sorted_scalars(
        values.iter().enumerate().map(|(i, v)| (format!("{i:08}"), v)),
    )?)
}

/// Readable form of what [`from_map`] hashes: `key|value|key|value`, lowercased.
pub fn debug_from_map(input: &Map<String, Value>) -> Option<String> {
    let sorted = sorted_scalars(input.iter().map(|(k, v)| (k.clone(), v)))?;
    let parts: Vec<String> = sorted
        .iter()
        .map(|(k, v)| format!("{}|{}", k, scalar_text(v)).to_lowercase())
        .collect();
    Some(parts.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!("test input is an object"),
        }
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = map(json!({"sku": "A1", "qty": 3}));
        let b = map(json!({"qty": 3, "sku": "A1"}));
        assert_eq!(from_map(&a), from_map(&b));
    }

    #[test]
    fn case_does_not_matter() {
        let a = map(json!({"sku": "ABC"}));
        let b = map(json!({"sku": "abc"}));
        assert_eq!(from_map(&a), from_map(&b));
    }

    #[test]
    fn non_scalars_are_rejected() {
        assert_eq!(from_map(&map(json!({"a": [1, 2]}))), None);
        assert_eq!(from_map(&map(json!({"a": null}))), None);
        assert_eq!(from_values(&[json!("x"), json!({})]), None);
    }

    #[test]
    fn positional_values_keep_their_order() {
        let a = from_values(&[json!("x"), json!("y")]);
        let b = from_values(&[json!("y"), json!("x")]);
        assert!(a.is_some());
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_md5_of_compact_sorted_json() {
        let m = map(json!({"b": "X", "a": 1}));
        assert_eq!(from_map(&m), Some(md5_hex(r#"{"a":1,"b":"x"}"#)));
    }

    #[test]
    fn debug_form_lists_sorted_pairs() {
        let m = map(json!({"b": "Two", "a": 1}));
        assert_eq!(debug_from_map(&m).as_deref(), Some("a|1|b|two"));
    }
}
