//! Option-set registry
//!
//! Coded values (status, usage, genre, ...) are rendered through named option
//! sets. The registry is populated once at start-up from an [`EnumSource`]
//! and injected into tables and forms.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::error::Error;
use crate::model::Value;

/// One `{value, label}` entry of an option set.
///
/// Values are kept in their textual form; numeric codes from the backend are
/// accepted and stringified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionItem {
    /// The stored code.
    #[serde(deserialize_with = "value_as_string")]
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

impl OptionItem {
    /// Creates an option entry.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

fn value_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "option value must be a string or number, got {}",
            other
        ))),
    }
}

/// A named, ordered list of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    /// Registry name (e.g. `BizSoundUsageEnums`).
    pub name: String,
    /// Options in display order.
    pub items: Vec<OptionItem>,
}

impl OptionSet {
    /// Creates an option set.
    pub fn new(name: impl Into<String>, items: Vec<OptionItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Returns the label for a value, comparing textual forms.
    pub fn label_for(&self, value: &Value) -> Option<&str> {
        let key = value.option_key()?;
        label_in(&self.items, &key)
    }
}

/// Finds the label for a textual value in a list of options.
pub fn label_in<'a>(items: &'a [OptionItem], key: &str) -> Option<&'a str> {
    items
        .iter()
        .find(|item| item.value == key)
        .map(|item| item.label.as_str())
}

/// Supplies option sets, typically from the backend enum-listing endpoint.
#[async_trait]
pub trait EnumSource: Send + Sync {
    /// Fetches every option set the source knows about.
    async fn fetch_enums(&self) -> Result<Vec<OptionSet>, Error>;
}

/// Process-wide option-set registry.
///
/// Backed by a concurrent map and cheap to clone; clones share the same
/// storage.
///
/// # Example
///
/// ```
/// use soundcms_lib::enums::{EnumRegistry, OptionItem, OptionSet};
/// use soundcms_lib::model::Value;
///
/// let registry = EnumRegistry::new();
/// registry.register(OptionSet::new(
///     "BizSoundUsageEnums",
///     vec![OptionItem::new("SLEEP", "Sleep"), OptionItem::new("FOCUS", "Focus")],
/// ));
///
/// assert_eq!(
///     registry.label_for("BizSoundUsageEnums", &Value::from("FOCUS")).as_deref(),
///     Some("Focus"),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    sets: Arc<DashMap<String, Arc<OptionSet>>>,
}

impl EnumRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an option set.
    pub fn register(&self, set: OptionSet) {
        self.sets.insert(set.name.clone(), Arc::new(set));
    }

    /// Resolves a named option set.
    pub fn resolve(&self, name: &str) -> Option<Arc<OptionSet>> {
        self.sets.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Resolves a named option set's items, empty if unknown.
    pub fn items(&self, name: &str) -> Vec<OptionItem> {
        self.resolve(name)
            .map(|set| set.items.clone())
            .unwrap_or_default()
    }

    /// Looks up the label of `value` in the named set.
    pub fn label_for(&self, name: &str, value: &Value) -> Option<String> {
        let set = self.resolve(name)?;
        set.label_for(value).map(str::to_string)
    }

    /// Registered set names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Loads every set from `source`, replacing sets with the same name.
    ///
    /// Returns the number of sets loaded.
    pub async fn load(&self, source: &dyn EnumSource) -> Result<usize, Error> {
        let sets = source.fetch_enums().await?;
        let count = sets.len();
        for set in sets {
            self.register(set);
        }
        debug!("loaded {} option sets", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(Vec<OptionSet>);

    #[async_trait]
    impl EnumSource for StaticSource {
        async fn fetch_enums(&self) -> Result<Vec<OptionSet>, Error> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl EnumSource for FailingSource {
        async fn fetch_enums(&self) -> Result<Vec<OptionSet>, Error> {
            Err(Error::other("enum endpoint unavailable"))
        }
    }

    fn status_set() -> OptionSet {
        OptionSet::new(
            "StatusEnums",
            vec![
                OptionItem::new("DRAFT", "Draft"),
                OptionItem::new("ENABLED", "Enabled"),
                OptionItem::new("DISABLED", "Disabled"),
            ],
        )
    }

    #[test]
    fn test_resolve_preserves_order() {
        let registry = EnumRegistry::new();
        registry.register(status_set());

        let set = registry.resolve("StatusEnums").unwrap();
        let values: Vec<&str> = set.items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, vec!["DRAFT", "ENABLED", "DISABLED"]);
    }

    #[test]
    fn test_label_for_numeric_value() {
        let registry = EnumRegistry::new();
        registry.register(OptionSet::new(
            "Levels",
            vec![OptionItem::new("1", "Beginner"), OptionItem::new("2", "Advanced")],
        ));

        assert_eq!(
            registry.label_for("Levels", &Value::Int(2)).as_deref(),
            Some("Advanced")
        );
        assert_eq!(registry.label_for("Levels", &Value::Int(3)), None);
        assert_eq!(registry.label_for("Unknown", &Value::Int(1)), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = EnumRegistry::new();
        let clone = registry.clone();
        clone.register(status_set());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_deserialize_numeric_option_value() {
        let item: OptionItem = serde_json::from_str(r#"{"value": 3, "label": "Three"}"#).unwrap();
        assert_eq!(item.value, "3");
    }

    #[tokio::test]
    async fn test_load_from_source() {
        let registry = EnumRegistry::new();
        let count = registry
            .load(&StaticSource(vec![status_set()]))
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(registry.names(), vec!["StatusEnums".to_string()]);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_existing_sets() {
        let registry = EnumRegistry::new();
        registry.register(status_set());

        assert!(registry.load(&FailingSource).await.is_err());
        assert_eq!(registry.len(), 1);
    }
}
