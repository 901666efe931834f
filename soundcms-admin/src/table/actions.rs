//! Row actions, content status rules and drag-reorder callbacks.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use soundcms_lib::model::Record;

/// Row field holding the publication status.
pub const STATUS_FIELD: &str = "status";

/// Publication status of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentStatus {
    Draft,
    Enabled,
    Disabled,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
        }
    }

    /// Whether the named row button is offered in this status.
    ///
    /// | status   | edit | duplicate | delete | enable | disable |
    /// |----------|------|-----------|--------|--------|---------|
    /// | DRAFT    | yes  | yes       | yes    | yes    | no      |
    /// | ENABLED  | yes  | yes       | no     | no     | yes     |
    /// | DISABLED | yes  | yes       | yes    | yes    | no      |
    ///
    /// Buttons outside the table are always offered.
    pub fn allows(&self, button: &str) -> bool {
        match button {
            "edit" | "duplicate" => true,
            "delete" | "enable" => matches!(self, Self::Draft | Self::Disabled),
            "disable" => matches!(self, Self::Enabled),
            _ => true,
        }
    }
}

impl FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "ENABLED" => Ok(Self::Enabled),
            "DISABLED" => Ok(Self::Disabled),
            other => Err(format!("unknown content status '{}'", other)),
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `button` is offered for a row in `status`.
///
/// An unrecognised status offers only the status-independent buttons
/// (`edit`, `duplicate` and custom ones).
///
/// ```
/// use soundcms_admin::table::status_button_visible;
///
/// assert!(!status_button_visible("DRAFT", "disable"));
/// assert!(status_button_visible("ENABLED", "disable"));
/// ```
pub fn status_button_visible(status: &str, button: &str) -> bool {
    match status.parse::<ContentStatus>() {
        Ok(status) => status.allows(button),
        Err(_) => !matches!(button, "delete" | "enable" | "disable"),
    }
}

/// Row predicate applying [`status_button_visible`] to the row's `status` field.
///
/// Pass to [`ColumnDescriptor::show_action_when`](super::ColumnDescriptor::show_action_when).
pub fn status_predicate(row: &Record, button: &str) -> bool {
    let status = row
        .get(STATUS_FIELD)
        .and_then(|value| value.as_str())
        .unwrap_or_default();
    status_button_visible(status, button)
}

/// Receives action-button clicks.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn on_action(&self, button: &str, row: &Record);
}

/// Receives the reordered row list after a drag.
///
/// The table does not persist the new order; the handler does.
#[async_trait]
pub trait ReorderHandler: Send + Sync {
    async fn on_reorder(&self, rows: Vec<Record>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_matrix() {
        let expected = [
            ("DRAFT", [true, true, true, true, false]),
            ("ENABLED", [true, true, false, false, true]),
            ("DISABLED", [true, true, true, true, false]),
        ];
        let buttons = ["edit", "duplicate", "delete", "enable", "disable"];
        for (status, row) in expected {
            for (button, visible) in buttons.iter().zip(row) {
                assert_eq!(
                    status_button_visible(status, button),
                    visible,
                    "{} / {}",
                    status,
                    button
                );
            }
        }
    }

    #[test]
    fn test_unknown_status_and_custom_button() {
        assert!(status_button_visible("ARCHIVED", "edit"));
        assert!(!status_button_visible("ARCHIVED", "delete"));
        assert!(status_button_visible("ENABLED", "preview"));
    }

    #[test]
    fn test_status_predicate_reads_row() {
        let row = Record::with_id(1).set(STATUS_FIELD, "enabled");
        assert!(status_predicate(&row, "disable"));
        assert!(!status_predicate(&row, "delete"));
        assert!(!status_predicate(&Record::with_id(2), "enable"));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("Draft".parse::<ContentStatus>(), Ok(ContentStatus::Draft));
        assert!("gone".parse::<ContentStatus>().is_err());
        assert_eq!(ContentStatus::Disabled.to_string(), "DISABLED");
    }
}
