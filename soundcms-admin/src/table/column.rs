//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use soundcms_lib::enums::OptionItem;
use soundcms_lib::model::Record;

use super::render::{CellContent, CellInput};

/// Inline cell render function.
pub type CellRenderer = Arc<dyn Fn(&CellInput<'_>) -> CellContent + Send + Sync>;

/// Per-row predicate deciding whether an action button is shown.
///
/// Receives the row and the button name.
pub type RowPredicate = Arc<dyn Fn(&Record, &str) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Side a column is pinned to while the rest scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixed {
    Left,
    Right,
}

/// Visibility tier of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Always rendered; cannot be toggled off.
    Always,
    /// Optional, off until the user picks it.
    Hidden,
    /// Optional, on until the user removes it.
    #[default]
    Shown,
}

/// Kind of media a column's URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Audio,
    Video,
}

impl MediaType {
    /// Guess the media type from a URL's file extension.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" => Some(Self::Image),
            "mp3" | "wav" | "ogg" | "m4a" | "aac" | "flac" => Some(Self::Audio),
            "mp4" | "webm" | "mov" | "m3u8" => Some(Self::Video),
            _ => None,
        }
    }
}

/// How a column turns a value into cell content.
#[derive(Clone)]
pub enum RenderStrategy {
    /// A renderer registered by name (see [`RendererRegistry`](super::RendererRegistry)).
    Named(String),
    /// A function supplied with the column.
    Inline(CellRenderer),
}

impl fmt::Debug for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

/// Where a column's or filter's option labels come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// An option set looked up in the enum registry.
    Named(String),
    /// Options listed in place.
    Inline(Vec<OptionItem>),
}

/// A button rendered in an action column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionButton {
    /// Identifier passed to the action handler (`edit`, `delete`, ...).
    pub name: String,
    pub label: String,
}

impl ActionButton {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

// =============================================================================
// ColumnDescriptor
// =============================================================================

/// A table column definition.
///
/// `key` identifies the column for visibility, rendering and selection and
/// must be unique within a table. `data_index` names the row field the cell
/// reads and defaults to `key`.
///
/// # Example
///
/// ```
/// use soundcms_admin::table::{ActionButton, ColumnDescriptor, MediaType};
///
/// let columns = vec![
///     ColumnDescriptor::new("name", "Name").render_with("name").fixed_left(),
///     ColumnDescriptor::new("audio", "Audio")
///         .data_index("femaleAudioUrl")
///         .media(MediaType::Audio)
///         .hidden(),
///     ColumnDescriptor::new("usage", "Usage").options("BizSoundUsageEnums"),
///     ColumnDescriptor::new("createTime", "Created").sortable().render_with("datetime"),
///     ColumnDescriptor::new("actions", "Actions")
///         .actions(vec![ActionButton::new("edit", "Edit"), ActionButton::new("delete", "Delete")])
///         .always(),
/// ];
/// assert_eq!(columns[1].data_index, "femaleAudioUrl");
/// ```
#[derive(Clone)]
pub struct ColumnDescriptor {
    pub key: String,
    pub title: String,
    pub data_index: String,
    pub width: Option<u16>,
    pub align: Align,
    pub fixed: Option<Fixed>,
    pub sortable: bool,
    pub render: Option<RenderStrategy>,
    pub visibility: Visibility,
    pub media_type: Option<MediaType>,
    pub options: Option<OptionSource>,
    pub actions: Vec<ActionButton>,
    pub action_predicate: Option<RowPredicate>,
}

impl ColumnDescriptor {
    /// Create a new column with the given key and title.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            data_index: key.clone(),
            key,
            title: title.into(),
            width: None,
            align: Align::default(),
            fixed: None,
            sortable: false,
            render: None,
            visibility: Visibility::default(),
            media_type: None,
            options: None,
            actions: Vec::new(),
            action_predicate: None,
        }
    }

    /// Read cells from a different row field than `key`.
    pub fn data_index(mut self, field: impl Into<String>) -> Self {
        self.data_index = field.into();
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn fixed_left(mut self) -> Self {
        self.fixed = Some(Fixed::Left);
        self
    }

    pub fn fixed_right(mut self) -> Self {
        self.fixed = Some(Fixed::Right);
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Render through a named renderer.
    pub fn render_with(mut self, name: impl Into<String>) -> Self {
        self.render = Some(RenderStrategy::Named(name.into()));
        self
    }

    /// Render through an inline function; takes precedence over everything else.
    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellInput<'_>) -> CellContent + Send + Sync + 'static,
    {
        self.render = Some(RenderStrategy::Inline(Arc::new(f)));
        self
    }

    /// Make the column mandatory.
    pub fn always(mut self) -> Self {
        self.visibility = Visibility::Always;
        self
    }

    /// Make the column optional and initially hidden.
    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    /// Render the value as media of the given type.
    ///
    /// Sets the `media` renderer unless another strategy was already chosen.
    pub fn media(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        if self.render.is_none() {
            self.render = Some(RenderStrategy::Named("media".into()));
        }
        self
    }

    /// Label values through a registry option set.
    pub fn options(mut self, set_name: impl Into<String>) -> Self {
        self.options = Some(OptionSource::Named(set_name.into()));
        self
    }

    /// Label values through an inline option list.
    pub fn inline_options(mut self, items: Vec<OptionItem>) -> Self {
        self.options = Some(OptionSource::Inline(items));
        self
    }

    /// Turn the column into an action column.
    pub fn actions(mut self, buttons: Vec<ActionButton>) -> Self {
        self.actions = buttons;
        self
    }

    /// Show a button on a row only when `predicate(row, button_name)` holds.
    pub fn show_action_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record, &str) -> bool + Send + Sync + 'static,
    {
        self.action_predicate = Some(Arc::new(predicate));
        self
    }

    pub fn is_action_column(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Buttons of this column visible for `row`, in declaration order.
    pub fn visible_actions(&self, row: &Record) -> Vec<ActionButton> {
        self.actions
            .iter()
            .filter(|button| match &self.action_predicate {
                Some(predicate) => predicate(row, &button.name),
                None => true,
            })
            .cloned()
            .collect()
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("data_index", &self.data_index)
            .field("fixed", &self.fixed)
            .field("sortable", &self.sortable)
            .field("render", &self.render)
            .field("visibility", &self.visibility)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

/// Order columns for display: left-pinned, unpinned, right-pinned.
///
/// Declaration order is kept within each group.
pub fn display_order<'a>(columns: impl IntoIterator<Item = &'a ColumnDescriptor>) -> Vec<&'a ColumnDescriptor> {
    let mut ordered: Vec<&ColumnDescriptor> = columns.into_iter().collect();
    ordered.sort_by_key(|column| match column.fixed {
        Some(Fixed::Left) => 0,
        None => 1,
        Some(Fixed::Right) => 2,
    });
    ordered
}
