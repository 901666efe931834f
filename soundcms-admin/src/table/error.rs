use thiserror::Error;

/// Errors from table configuration and interaction.
///
/// Fetch failures are not here: they are reported on the messaging channel
/// and as [`FetchOutcome::Failed`](super::FetchOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate column key '{0}'")]
    DuplicateColumnKey(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not sortable")]
    NotSortable(String),

    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("no row with key '{0}' on the current page")]
    UnknownRow(String),

    #[error("row index {index} out of range for {len} rows")]
    InvalidIndex { index: usize, len: usize },

    #[error("button '{button}' is not offered for this row")]
    ActionHidden { button: String },

    #[error("no {0} handler registered")]
    NoHandler(&'static str),
}
