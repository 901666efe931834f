//! Cell content resolution.
//!
//! A cell resolves through the first strategy that applies: the column's
//! inline render function, then a named renderer from the registry, then an
//! option-set label, and finally the raw value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::warn;
use soundcms_lib::enums::{label_in, EnumRegistry};
use soundcms_lib::model::{Record, Value};

use super::column::{ActionButton, CellRenderer, ColumnDescriptor, MediaType, OptionSource, RenderStrategy};

/// Row field holding the cover image shown next to a name.
pub const COVER_FIELD: &str = "coverImg";

/// Resolved content of one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Empty,
    Text(String),
    /// A title with an optional thumbnail.
    Name { text: String, image: Option<String> },
    /// An on/off toggle.
    Switch { on: bool },
    Media { kind: MediaType, url: String },
    /// Action buttons visible for the row.
    Actions(Vec<ActionButton>),
}

impl CellContent {
    /// Plain-text form, used by exports and the CLI.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) | Self::Name { text, .. } => text.clone(),
            Self::Switch { on } => (if *on { "on" } else { "off" }).to_string(),
            Self::Media { url, .. } => url.clone(),
            Self::Actions(buttons) => buttons
                .iter()
                .map(|b| b.label.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// Everything a renderer can look at.
pub struct CellInput<'a> {
    /// Value at the column's `data_index`, `Null` when the row lacks it.
    pub value: &'a Value,
    pub row: &'a Record,
    pub column: &'a ColumnDescriptor,
}

// =============================================================================
// RendererRegistry
// =============================================================================

/// Named cell renderers.
///
/// Starts with the built-ins `name`, `switch`, `media` and `datetime`;
/// registering under an existing name replaces it.
#[derive(Clone)]
pub struct RendererRegistry {
    renderers: HashMap<String, CellRenderer>,
}

impl RendererRegistry {
    /// A registry holding only the built-in renderers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("name", render_name);
        registry.register("switch", render_switch);
        registry.register("media", render_media);
        registry.register("datetime", render_datetime);
        registry
    }

    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&CellInput<'_>) -> CellContent + Send + Sync + 'static,
    {
        self.renderers.insert(name.into(), Arc::new(f));
    }

    pub fn get(&self, name: &str) -> Option<&CellRenderer> {
        self.renderers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.renderers.keys().collect();
        names.sort();
        f.debug_struct("RendererRegistry").field("renderers", &names).finish()
    }
}

// =============================================================================
// Built-in renderers
// =============================================================================

fn render_name(input: &CellInput<'_>) -> CellContent {
    let image = input
        .row
        .get(COVER_FIELD)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    CellContent::Name {
        text: input.value.to_string(),
        image,
    }
}

fn render_switch(input: &CellInput<'_>) -> CellContent {
    let on = match input.value {
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::String(s) => {
            matches!(s.to_ascii_uppercase().as_str(), "ENABLED" | "TRUE" | "1" | "ON")
        }
        _ => false,
    };
    CellContent::Switch { on }
}

fn render_media(input: &CellInput<'_>) -> CellContent {
    let url = match input.value.as_str() {
        Some(url) if !url.is_empty() => url,
        _ => return CellContent::Empty,
    };
    let kind = input
        .column
        .media_type
        .or_else(|| MediaType::from_url(url))
        .unwrap_or(MediaType::Image);
    CellContent::Media {
        kind,
        url: url.to_string(),
    }
}

fn render_datetime(input: &CellInput<'_>) -> CellContent {
    match input.value {
        Value::DateTime(dt) => CellContent::Text(dt.format("%Y-%m-%d %H:%M").to_string()),
        Value::Null => CellContent::Empty,
        other => CellContent::Text(other.to_string()),
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve the content of `column`'s cell in `row`.
///
/// Action columns resolve to the buttons their predicate allows.
pub fn resolve_cell(
    column: &ColumnDescriptor,
    row: &Record,
    renderers: &RendererRegistry,
    registry: &EnumRegistry,
) -> CellContent {
    if column.is_action_column() {
        return CellContent::Actions(column.visible_actions(row));
    }

    let value = row.value_or_null(&column.data_index);
    let input = CellInput {
        value: &value,
        row,
        column,
    };

    match &column.render {
        Some(RenderStrategy::Inline(f)) => return f(&input),
        Some(RenderStrategy::Named(name)) => match renderers.get(name) {
            Some(f) => return f(&input),
            None => warn!("column '{}': no renderer named '{}'", column.key, name),
        },
        None => {}
    }

    if let Some(source) = &column.options {
        if let Some(label) = option_label(source, &value, registry) {
            return CellContent::Text(label);
        }
    }

    if value.is_null() {
        CellContent::Empty
    } else {
        CellContent::Text(value.to_string())
    }
}

/// Label for a coded value; multi-valued fields join their labels.
///
/// Returns `None` when nothing matched so the raw value shows instead.
pub fn option_label(source: &OptionSource, value: &Value, registry: &EnumRegistry) -> Option<String> {
    let single = |value: &Value| -> Option<String> {
        match source {
            OptionSource::Named(name) => registry.label_for(name, value),
            OptionSource::Inline(items) => {
                let key = value.option_key()?;
                label_in(items, &key).map(str::to_string)
            }
        }
    };

    match value {
        Value::List(items) => {
            let labels: Vec<String> = items
                .iter()
                .map(|item| single(item).unwrap_or_else(|| item.to_string()))
                .collect();
            let matched = items.iter().any(|item| single(item).is_some());
            matched.then(|| labels.join(", "))
        }
        other => single(other),
    }
}
