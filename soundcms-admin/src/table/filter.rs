//! Filter sections shown above a table.

use soundcms_lib::enums::{EnumRegistry, OptionItem};

use super::column::OptionSource;
use crate::selection::SelectionMode;

/// One group of filter options.
///
/// `key` is the query parameter name sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSection {
    pub key: String,
    pub title: String,
    pub mode: SelectionMode,
    pub options: OptionSource,
}

impl FilterSection {
    /// A multiple-choice section backed by a registry option set.
    pub fn named(key: impl Into<String>, title: impl Into<String>, set_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            mode: SelectionMode::Multiple,
            options: OptionSource::Named(set_name.into()),
        }
    }

    /// A multiple-choice section with options listed in place.
    pub fn inline(key: impl Into<String>, title: impl Into<String>, items: Vec<OptionItem>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            mode: SelectionMode::Multiple,
            options: OptionSource::Inline(items),
        }
    }

    pub fn single(mut self) -> Self {
        self.mode = SelectionMode::Single;
        self
    }

    /// Options offered by this section.
    pub fn resolve_options(&self, registry: &EnumRegistry) -> Vec<OptionItem> {
        match &self.options {
            OptionSource::Named(name) => registry.items(name),
            OptionSource::Inline(items) => items.clone(),
        }
    }

    /// Apply the selection mode to a chosen value list.
    ///
    /// Duplicates are dropped; single sections keep only the first value.
    pub fn normalize(&self, values: Vec<String>) -> Vec<String> {
        let mut unique: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        match self.mode {
            SelectionMode::None => Vec::new(),
            SelectionMode::Single => unique.into_iter().take(1).collect(),
            SelectionMode::Multiple => unique,
        }
    }
}

#[cfg(test)]
mod tests {
    use soundcms_lib::enums::OptionSet;

    use super::*;

    #[test]
    fn test_resolve_named_and_inline() {
        let registry = EnumRegistry::new();
        registry.register(OptionSet::new("Status", vec![OptionItem::new("DRAFT", "Draft")]));

        let named = FilterSection::named("status", "Status", "Status");
        assert_eq!(named.resolve_options(&registry)[0].label, "Draft");

        let inline = FilterSection::inline("premium", "Premium", vec![OptionItem::new("1", "Yes")]);
        assert_eq!(inline.resolve_options(&registry).len(), 1);

        let missing = FilterSection::named("genre", "Genre", "Genre");
        assert!(missing.resolve_options(&registry).is_empty());
    }

    #[test]
    fn test_normalize() {
        let multi = FilterSection::inline("usage", "Usage", vec![]);
        let values = vec!["A".to_string(), "B".to_string(), "A".to_string()];
        assert_eq!(multi.normalize(values.clone()), vec!["A", "B"]);
        assert_eq!(multi.clone().single().normalize(values), vec!["A"]);
    }
}
