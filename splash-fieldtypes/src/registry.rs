use crate::builtin::builtin_kinds;
use crate::kind::{FakeOptions, FieldKind, OPTION_OBJECT_TYPE};
use rand::RngCore;
use serde_json::Value;
use splash_types::ids::{FieldType, OBJECT_ID_TYPE, is_list_field, is_object_reference};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("field type `{0}` is not registered")]
    Unresolved(String),
    #[error("invalid {field_type} value: {reason}")]
    InvalidData { field_type: String, reason: String },
}

impl TypeError {
    /// Translation key of the diagnostic.
    pub fn key(&self) -> &'static str {
        match self {
            TypeError::Unresolved(_) => "ErrInvalidType",
            TypeError::InvalidData { .. } => "ErrInvalidData",
        }
    }
}

/// Type name to handler map.
///
/// Lookups accept the composite wire forms: `T@list` resolves to `T` and
/// any `x::ObjectType` resolves to the `objectid` handler.
pub struct FieldTypeRegistry {
    kinds: BTreeMap<&'static str, Box<dyn FieldKind>>,
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldTypeRegistry {
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for kind in builtin_kinds() {
            registry.register(kind);
        }
        registry
    }

    /// Add a handler, returning the one it replaces.
    pub fn register(&mut self, kind: Box<dyn FieldKind>) -> Option<Box<dyn FieldKind>> {
        let replaced = self.kinds.insert(kind.name(), kind);
        if let Some(old) = &replaced {
            debug!("field type `{}` handler replaced", old.name());
        }
        replaced
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Handler for a wire type string, `None` when nothing is registered for it.
    pub fn resolve(&self, type_name: &str) -> Option<&dyn FieldKind> {
        if type_name.is_empty() {
            return None;
        }
        let list = is_list_field(type_name);
        let base = list.as_ref().map_or(type_name, |l| l.field_name.as_str());
        let base = if is_object_reference(base).is_some() {
            OBJECT_ID_TYPE
        } else {
            base
        };
        self.kinds.get(base).map(|k| k.as_ref())
    }

    pub fn resolve_type(&self, field_type: &FieldType) -> Option<&dyn FieldKind> {
        self.kinds.get(field_type.base_name()).map(|k| k.as_ref())
    }

    fn require(&self, type_name: &str) -> Result<&dyn FieldKind, TypeError> {
        self.resolve(type_name)
            .ok_or_else(|| TypeError::Unresolved(type_name.to_string()))
    }

    /// Unknown types are invalid; `null` is valid for every known type.
    pub fn validate(&self, data: &Value, type_name: &str) -> Result<(), TypeError> {
        let kind = self.require(type_name)?;
        if data.is_null() {
            return Ok(());
        }
        kind.validate(data).map_err(|reason| TypeError::InvalidData {
            field_type: type_name.to_string(),
            reason,
        })
    }

    pub fn is_valid(&self, data: &Value, type_name: &str) -> bool {
        self.validate(data, type_name).is_ok()
    }

    /// Fake value for a type. Reference types get their target object type
    /// as the `objectType` option unless one is already set.
    pub fn fake(
        &self,
        type_name: &str,
        options: &FakeOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Value, TypeError> {
        let kind = self.require(type_name)?;
        let referenced = FieldType::parse(type_name)
            .ok()
            .and_then(|t| t.referenced_object().map(str::to_string));
        match referenced {
            Some(object_type) if !options.contains_key(OPTION_OBJECT_TYPE) => {
                let mut options = options.clone();
                options.insert(OPTION_OBJECT_TYPE.to_string(), Value::String(object_type));
                Ok(kind.fake(&options, rng))
            }
            _ => Ok(kind.fake(options, rng)),
        }
    }

    pub fn compare(&self, type_name: &str, source: &Value, target: &Value) -> Result<bool, TypeError> {
        let kind = self.require(type_name)?;
        Ok(match (source.is_null(), target.is_null()) {
            (true, true) => true,
            (false, false) => kind.compare(source, target),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    #[test]
    fn resolves_composite_forms() {
        let registry = FieldTypeRegistry::builtin();
        assert_eq!(registry.resolve("varchar").map(|k| k.name()), Some("varchar"));
        assert_eq!(registry.resolve("varchar@list").map(|k| k.name()), Some("varchar"));
        assert_eq!(
            registry.resolve("objectid::Product").map(|k| k.name()),
            Some("objectid")
        );
        assert_eq!(
            registry.resolve("objectid::Product@list").map(|k| k.name()),
            Some("objectid")
        );
        assert!(registry.resolve("nope").is_none());
        assert!(registry.resolve("").is_none());
        assert!(registry.resolve("a@b@c").is_none());
    }

    #[test]
    fn null_is_valid_only_for_known_types() {
        let registry = FieldTypeRegistry::builtin();
        assert!(registry.is_valid(&Value::Null, "int"));
        assert_eq!(
            registry.validate(&Value::Null, "nope"),
            Err(TypeError::Unresolved("nope".into()))
        );
    }

    #[test]
    fn invalid_data_reports_type_and_reason() {
        let registry = FieldTypeRegistry::builtin();
        let err = registry.validate(&json!("abc"), "int").expect_err("invalid");
        assert_eq!(err.key(), "ErrInvalidData");
        assert!(err.to_string().starts_with("invalid int value"));
    }

    #[test]
    fn fake_reference_targets_declared_object() {
        let registry = FieldTypeRegistry::builtin();
        let mut rng = StdRng::seed_from_u64(4);
        let value = registry
            .fake("objectid::Order", &FakeOptions::new(), &mut rng)
            .expect("fake");
        assert!(value.as_str().is_some_and(|s| s.ends_with("::Order")));
    }

    #[test]
    fn register_replaces_by_name() {
        struct Upper;
        impl FieldKind for Upper {
            fn name(&self) -> &'static str {
                "varchar"
            }
            fn validate(&self, data: &Value) -> Result<(), String> {
                match data.as_str() {
                    Some(s) if s.chars().all(|c| c.is_ascii_uppercase()) => Ok(()),
                    _ => Err("not uppercase".into()),
                }
            }
            fn fake(&self, _options: &FakeOptions, _rng: &mut dyn RngCore) -> Value {
                json!("ABC")
            }
        }

        let mut registry = FieldTypeRegistry::builtin();
        let count = registry.len();
        assert!(registry.register(Box::new(Upper)).is_some());
        assert_eq!(registry.len(), count);
        assert!(!registry.is_valid(&json!("abc"), "varchar"));
    }

    #[test]
    fn compare_treats_nulls_explicitly() {
        let registry = FieldTypeRegistry::builtin();
        assert_eq!(registry.compare("double", &json!(1.0), &json!("1")), Ok(true));
        assert_eq!(registry.compare("double", &Value::Null, &json!(1)), Ok(false));
        assert_eq!(registry.compare("double", &Value::Null, &Value::Null), Ok(true));
    }
}
