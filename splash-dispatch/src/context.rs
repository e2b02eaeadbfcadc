//! Per call buffers handed to field handlers.
//!
//! Claiming an entry removes it from the pending input. Whatever is left once
//! every handler has run is reported as unconsumed.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use splash_runtime::ports::LogSink;

/// Dirty flag of one Set call, passed to the adapter's `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateFlag {
    needed: bool,
}

impl UpdateFlag {
    pub fn mark(&mut self) {
        self.needed = true;
    }

    pub fn is_needed(&self) -> bool {
        self.needed
    }
}

pub struct GetContext<'c, T> {
    object: &'c T,
    input: &'c mut IndexMap<String, String>,
    output: &'c mut Map<String, Value>,
    log: &'c dyn LogSink,
}

impl<'c, T> GetContext<'c, T> {
    pub(crate) fn new(
        object: &'c T,
        input: &'c mut IndexMap<String, String>,
        output: &'c mut Map<String, Value>,
        log: &'c dyn LogSink,
    ) -> Self {
        Self {
            object,
            input,
            output,
            log,
        }
    }

    pub fn object(&self) -> &T {
        self.object
    }

    pub fn log(&self) -> &dyn LogSink {
        self.log
    }

    /// Mark the request entry `key` as handled.
    pub fn claim(&mut self, key: &str) -> bool {
        self.input.shift_remove(key).is_some()
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        !self.input.contains_key(key)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.output.insert(field.into(), value.into());
    }

    /// Write `value` under `field` and claim `key`.
    pub fn provide(&mut self, key: &str, field: &str, value: impl Into<Value>) {
        self.insert(field, value);
        self.claim(key);
    }

    /// Write `output[list][index][field]`, growing the list with empty items.
    pub fn insert_list_item(
        &mut self,
        list: &str,
        index: usize,
        field: &str,
        value: impl Into<Value>,
    ) {
        let slot = self
            .output
            .entry(list.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        let Value::Array(items) = slot else {
            return;
        };
        while items.len() <= index {
            items.push(Value::Object(Map::new()));
        }
        if let Value::Object(item) = &mut items[index] {
            item.insert(field.to_string(), value.into());
        }
    }
}

pub struct SetContext<'c, T> {
    object: &'c mut T,
    input: &'c mut IndexMap<String, Value>,
    update: &'c mut UpdateFlag,
    log: &'c dyn LogSink,
}

impl<'c, T> SetContext<'c, T> {
    pub(crate) fn new(
        object: &'c mut T,
        input: &'c mut IndexMap<String, Value>,
        update: &'c mut UpdateFlag,
        log: &'c dyn LogSink,
    ) -> Self {
        Self {
            object,
            input,
            update,
            log,
        }
    }

    pub fn object(&self) -> &T {
        &*self.object
    }

    pub fn object_mut(&mut self) -> &mut T {
        &mut *self.object
    }

    pub fn log(&self) -> &dyn LogSink {
        self.log
    }

    /// Mark the submitted `field` as handled.
    pub fn claim(&mut self, field: &str) -> bool {
        self.input.shift_remove(field).is_some()
    }

    pub fn is_claimed(&self, field: &str) -> bool {
        !self.input.contains_key(field)
    }

    pub fn mark_updated(&mut self) {
        self.update.mark();
    }

    pub fn needs_update(&self) -> bool {
        self.update.is_needed()
    }

    /// Claim `field` and store `value` into the slot `select` picks, marking
    /// the object dirty only when the stored value changes.
    pub fn assign<V: PartialEq>(
        &mut self,
        field: &str,
        value: V,
        select: impl FnOnce(&mut T) -> &mut V,
    ) {
        self.claim(field);
        let slot = select(&mut *self.object);
        if *slot != value {
            *slot = value;
            self.update.mark();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use splash_runtime::adapters::Logger;

    #[test]
    fn list_items_are_grown_in_place() {
        let log = Logger::default();
        let mut input = IndexMap::new();
        let mut output = Map::new();
        let mut ctx = GetContext::new(&(), &mut input, &mut output, &log);
        ctx.insert_list_item("lines", 1, "qty", 3);
        ctx.insert_list_item("lines", 0, "qty", 1);
        ctx.insert_list_item("lines", 1, "sku", "A");
        assert_eq!(
            Value::Object(output),
            json!({"lines": [{"qty": 1}, {"qty": 3, "sku": "A"}]})
        );
    }

    #[test]
    fn assign_marks_only_changes() {
        let log = Logger::default();
        let mut name = String::from("same");
        let mut input = IndexMap::from([("name".to_string(), json!("same"))]);
        let mut flag = UpdateFlag::default();
        let mut ctx = SetContext::new(&mut name, &mut input, &mut flag, &log);
        ctx.assign("name", "same".to_string(), |n| n);
        assert!(ctx.is_claimed("name"));
        assert!(!ctx.needs_update());
        ctx.assign("name", "other".to_string(), |n| n);
        assert!(ctx.needs_update());
        assert_eq!(ctx.object(), "other");
    }
}
