//! Error types

mod api;
mod field;
mod mapping;

pub use api::*;
pub use field::*;
pub use mapping::*;

/// Top-level error for operations that cross layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Typed field access failure.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Mapping table construction failure.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Failure reported by a caller-supplied collaborator (loader, handler).
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an error from a free-form message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
