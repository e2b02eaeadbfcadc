use rand::RngCore;
use serde_json::Value;
use std::collections::BTreeMap;

/// Constraints for generated data, taken from a descriptor's `options`.
pub type FakeOptions = BTreeMap<String, Value>;

/// Option set by the registry on reference fields: the target object type.
pub const OPTION_OBJECT_TYPE: &str = "objectType";

/// Behaviour of one field type.
pub trait FieldKind: Send + Sync {
    /// Registered type name, as used in descriptors.
    fn name(&self) -> &'static str;

    /// Check a non-null value. `Err` carries a human readable reason.
    fn validate(&self, data: &Value) -> Result<(), String>;

    /// Generate a valid value honouring `options`.
    fn fake(&self, options: &FakeOptions, rng: &mut dyn RngCore) -> Value;

    /// Whether two valid values denote the same data.
    fn compare(&self, source: &Value, target: &Value) -> bool {
        source == target
    }
}

pub(crate) fn option_u64(options: &FakeOptions, key: &str, default: u64) -> u64 {
    options.get(key).and_then(Value::as_u64).unwrap_or(default)
}

pub(crate) fn option_i64(options: &FakeOptions, key: &str, default: i64) -> i64 {
    options.get(key).and_then(Value::as_i64).unwrap_or(default)
}

pub(crate) fn option_f64(options: &FakeOptions, key: &str, default: f64) -> f64 {
    options.get(key).and_then(Value::as_f64).unwrap_or(default)
}

pub(crate) fn option_str<'a>(options: &'a FakeOptions, key: &str, default: &'a str) -> &'a str {
    options.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Empty strings count as "no value" for string typed fields.
pub(crate) fn is_blank(data: &Value) -> bool {
    matches!(data, Value::String(s) if s.is_empty())
}

pub(crate) fn expect_str<'a>(data: &'a Value, what: &str) -> Result<&'a str, String> {
    data.as_str()
        .ok_or_else(|| format!("expected {what} as a string, got {data}"))
}
