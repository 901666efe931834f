//! Mapping table errors

/// Raised while building a [`FieldMapping`](crate::mapping::FieldMapping).
///
/// Lookups never fail; only construction can.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// The frontend key is already mapped.
    #[error("frontend key '{0}' is mapped twice")]
    DuplicateFrontendKey(String),

    /// The backend key is already the target of another frontend key.
    #[error("backend key '{0}' is mapped twice")]
    DuplicateBackendKey(String),
}
