//! Typed access failures on [`Record`](crate::model::Record)

/// A typed accessor asked for a field the record cannot supply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("record has no field '{field}'")]
    Missing { field: String },

    /// The value is present but holds a different kind.
    #[error("field '{field}' holds {found}, not {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing { field: field.into() }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
            found,
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::WrongType { field, .. } => field,
        }
    }
}
