use std::fmt;

use soundcms_lib::model::Value;

use super::FieldValues;
use crate::state::State;

/// The input-binding mechanism an [`EditorForm`](super::EditorForm) drives.
///
/// A front end implements this over its widgets; [`FormStore`] keeps the
/// values in memory.
pub trait FormBinding: Send + Sync {
    /// Write `values` into their fields, leaving other fields untouched.
    fn set_fields(&self, values: &FieldValues);

    /// Write a single field.
    fn set_field(&self, key: &str, value: Value);

    /// Clear every field.
    fn reset_fields(&self);

    /// Current value of every field.
    fn values(&self) -> FieldValues;
}

/// In-memory [`FormBinding`].
#[derive(Clone, Default)]
pub struct FormStore {
    values: State<FieldValues>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.with(|values| values.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.values.with(|values| values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any field was written since the last call.
    pub fn take_changed(&self) -> bool {
        let changed = self.values.is_dirty();
        self.values.clear_dirty();
        changed
    }
}

impl FormBinding for FormStore {
    fn set_fields(&self, values: &FieldValues) {
        self.values.update(|current| {
            current.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        });
    }

    fn set_field(&self, key: &str, value: Value) {
        self.values.update(|current| {
            current.insert(key.to_string(), value);
        });
    }

    fn reset_fields(&self) {
        self.values.update(|current| current.clear());
    }

    fn values(&self) -> FieldValues {
        self.values.get()
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.values.with(|values| f.debug_map().entries(values.iter()).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_fields_merges() {
        let store = FormStore::new();
        store.set_field("name", Value::from("Rain"));
        let mut more = FieldValues::new();
        more.insert("status".into(), Value::from("DRAFT"));
        store.set_fields(&more);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("name"), Some(Value::from("Rain")));
    }

    #[test]
    fn test_reset_clears() {
        let store = FormStore::new();
        store.set_field("name", Value::from("Rain"));
        assert!(store.take_changed());
        store.reset_fields();
        assert!(store.is_empty());
        assert!(store.take_changed());
    }
}
