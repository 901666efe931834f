//! Field-name mapping between frontend (camelCase) and backend (snake_case).
//!
//! Every module may declare an explicit [`FieldMapping`] for names that do
//! not follow the case convention. Keys absent from a table fall back to the
//! generic transform, so a lookup never fails.
//!
//! # Example
//!
//! ```
//! use soundcms_lib::mapping::{camel_to_snake, snake_to_camel, to_backend_key, FieldMapping};
//!
//! assert_eq!(camel_to_snake("femaleAudioUrl"), "female_audio_url");
//! assert_eq!(snake_to_camel("female_audio_url"), "femaleAudioUrl");
//!
//! let table = FieldMapping::from_pairs([("coverImg", "cover_image_url")]).unwrap();
//! assert_eq!(to_backend_key("coverImg", Some(&table)), "cover_image_url");
//! assert_eq!(to_backend_key("sortOrder", Some(&table)), "sort_order");
//! ```

mod module;
mod tables;

pub use module::*;
pub use tables::*;

use std::collections::HashMap;

use crate::error::MappingError;

/// Converts `camelCase` to `snake_case`.
///
/// Each upper-case letter becomes `_` followed by its lower-case form.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Converts `snake_case` to `camelCase`.
///
/// Each `_x` (x a lower-case ASCII letter) becomes `X`. Underscores not
/// followed by a lower-case letter are kept.
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '_' {
            if let Some(next) = chars.peek().copied().filter(|c| c.is_ascii_lowercase()) {
                chars.next();
                out.push(next.to_ascii_uppercase());
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Static bidirectional dictionary `frontend key <-> backend key`.
///
/// Keys are unique on both sides; construction rejects duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
    /// Frontend keys in declaration order.
    order: Vec<String>,
}

impl FieldMapping {
    /// Creates an empty mapping table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(frontend, backend)` pairs.
    pub fn from_pairs<I, F, B>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (F, B)>,
        F: Into<String>,
        B: Into<String>,
    {
        let mut table = Self::new();
        for (frontend, backend) in pairs {
            table.insert(frontend, backend)?;
        }
        Ok(table)
    }

    /// Adds one entry.
    pub fn insert(
        &mut self,
        frontend: impl Into<String>,
        backend: impl Into<String>,
    ) -> Result<(), MappingError> {
        let frontend = frontend.into();
        let backend = backend.into();

        if self.forward.contains_key(&frontend) {
            return Err(MappingError::DuplicateFrontendKey(frontend));
        }
        if self.reverse.contains_key(&backend) {
            return Err(MappingError::DuplicateBackendKey(backend));
        }

        self.forward.insert(frontend.clone(), backend.clone());
        self.reverse.insert(backend, frontend.clone());
        self.order.push(frontend);
        Ok(())
    }

    /// Looks up the backend key for a frontend key.
    pub fn backend_for(&self, frontend: &str) -> Option<&str> {
        self.forward.get(frontend).map(String::as_str)
    }

    /// Looks up the frontend key for a backend key (reverse lookup by value).
    pub fn frontend_for(&self, backend: &str) -> Option<&str> {
        self.reverse.get(backend).map(String::as_str)
    }

    /// Frontend keys in declaration order.
    pub fn frontend_keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Returns `true` if the frontend key has an explicit entry.
    pub fn contains(&self, frontend: &str) -> bool {
        self.forward.contains_key(frontend)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Translates a frontend key to its backend name.
///
/// Uses the table entry when present, otherwise [`camel_to_snake`].
pub fn to_backend_key(frontend_key: &str, table: Option<&FieldMapping>) -> String {
    table
        .and_then(|t| t.backend_for(frontend_key))
        .map(str::to_string)
        .unwrap_or_else(|| camel_to_snake(frontend_key))
}

/// Translates a backend key to its frontend name.
///
/// Uses a reverse table lookup when present, otherwise [`snake_to_camel`].
pub fn to_frontend_key(backend_key: &str, table: Option<&FieldMapping>) -> String {
    table
        .and_then(|t| t.frontend_for(backend_key))
        .map(str::to_string)
        .unwrap_or_else(|| snake_to_camel(backend_key))
}
