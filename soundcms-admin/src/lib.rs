//! Headless admin state for the SoundCMS back office.
//!
//! State containers for the list pages and editor forms: a configurable
//! table driven by a list loader, an editor form bound to an input store,
//! row selection, header buttons and the toast channel they report on.

pub mod form;
pub mod header;
pub mod selection;
pub mod state;
pub mod table;
pub mod toast;

pub mod prelude {
    pub use crate::form::{EditorForm, FormBinding, FormError, FormStore, Validator};
    pub use crate::header::{HeaderButton, HeaderButtons};
    pub use crate::selection::{RowSelection, SelectionMode};
    pub use crate::state::State;
    pub use crate::table::{
        ActionButton, CellContent, ColumnDescriptor, FetchOutcome, FilterSection, TableContext,
        TableError, TableOptions,
    };
    pub use crate::toast::{Messages, Toast, ToastLevel};
}
