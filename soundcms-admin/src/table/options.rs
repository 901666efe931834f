use serde::{Deserialize, Serialize};
use soundcms_lib::api::DEFAULT_PAGE_SIZE;

use crate::selection::SelectionMode;

/// Per-table behaviour switches.
///
/// Deserializable so pages can ship them alongside column config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Initial page size.
    pub page_size: u32,
    /// Column keys rendered regardless of the user's column choice.
    pub mandatory_columns: Vec<String>,
    /// Keep the selection when a fetch replaces the rows.
    pub preserve_selection_on_fetch: bool,
    /// Row field that identifies a row for selection.
    pub row_key: String,
    pub selection_mode: SelectionMode,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            mandatory_columns: Vec::new(),
            preserve_selection_on_fetch: false,
            row_key: "id".to_string(),
            selection_mode: SelectionMode::Multiple,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_mandatory_columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory_columns = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preserve_selection(mut self, preserve: bool) -> Self {
        self.preserve_selection_on_fetch = preserve;
        self
    }

    pub fn with_row_key(mut self, field: impl Into<String>) -> Self {
        self.row_key = field.into();
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: TableOptions =
            serde_json::from_str(r#"{"mandatory_columns": ["actions"], "selection_mode": "single"}"#)
                .unwrap();
        assert_eq!(options.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(options.mandatory_columns, vec!["actions"]);
        assert_eq!(options.selection_mode, SelectionMode::Single);
        assert_eq!(options.row_key, "id");
    }
}
