//! Row selection for tables.

use serde::{Deserialize, Serialize};
use soundcms_lib::model::Record;

/// Selection mode for rows and filter sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No selection allowed.
    None,
    /// Single item selection (radio-button style).
    Single,
    /// Multiple items can be selected (checkbox style).
    #[default]
    Multiple,
}

/// Selected rows, tracked as key/row pairs.
///
/// Keys and row objects live in one vector so they can never drift apart:
/// every method that adds or removes a key does the same to its row.
/// Selection order is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSelection {
    mode: SelectionMode,
    entries: Vec<(String, Record)>,
}

impl RowSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Toggle selection for a row. Returns true if selection changed.
    pub fn toggle(&mut self, key: String, row: Record) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                let was_selected = self.is_selected(&key);
                self.entries.clear();
                if !was_selected {
                    self.entries.push((key, row));
                }
                true
            }
            SelectionMode::Multiple => {
                if let Some(pos) = self.position(&key) {
                    self.entries.remove(pos);
                } else {
                    self.entries.push((key, row));
                }
                true
            }
        }
    }

    /// Replace the selection wholesale.
    ///
    /// In single mode only the first pair is kept; in `None` mode nothing is.
    pub fn replace(&mut self, entries: Vec<(String, Record)>) {
        self.entries = match self.mode {
            SelectionMode::None => Vec::new(),
            SelectionMode::Single => entries.into_iter().take(1).collect(),
            SelectionMode::Multiple => {
                let mut unique: Vec<(String, Record)> = Vec::with_capacity(entries.len());
                for (key, row) in entries {
                    if !unique.iter().any(|(k, _)| *k == key) {
                        unique.push((key, row));
                    }
                }
                unique
            }
        };
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected keys in selection order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Selected rows, aligned index-for-index with [`keys`](Self::keys).
    pub fn rows(&self) -> Vec<Record> {
        self.entries.iter().map(|(_, row)| row.clone()).collect()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64) -> (String, Record) {
        (id.to_string(), Record::with_id(id))
    }

    #[test]
    fn test_multiple_toggle_keeps_lockstep() {
        let mut selection = RowSelection::new(SelectionMode::Multiple);
        let (k1, r1) = row(1);
        let (k2, r2) = row(2);
        selection.toggle(k1.clone(), r1.clone());
        selection.toggle(k2, r2);
        selection.toggle(k1, r1);

        assert_eq!(selection.keys(), vec!["2"]);
        assert_eq!(selection.rows()[0].id(), Some(2));
    }

    #[test]
    fn test_single_mode_replaces() {
        let mut selection = RowSelection::new(SelectionMode::Single);
        let (k1, r1) = row(1);
        let (k2, r2) = row(2);
        selection.toggle(k1.clone(), r1.clone());
        selection.toggle(k2, r2);
        assert_eq!(selection.keys(), vec!["2"]);

        selection.replace(vec![row(3), row(4)]);
        assert_eq!(selection.keys(), vec!["3"]);

        selection.toggle(k1.clone(), r1.clone());
        selection.toggle(k1, r1);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_none_mode_ignores() {
        let mut selection = RowSelection::new(SelectionMode::None);
        let (k, r) = row(1);
        assert!(!selection.toggle(k, r));
        selection.replace(vec![row(2)]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_replace_dedupes() {
        let mut selection = RowSelection::new(SelectionMode::Multiple);
        selection.replace(vec![row(1), row(2), row(1)]);
        assert_eq!(selection.keys(), vec!["1", "2"]);
        assert_eq!(selection.rows().len(), 2);
    }
}
