//! Configurable remote-data table.
//!
//! A [`TableContext`] is built from [`ColumnDescriptor`]s, a
//! [`ListLoader`](soundcms_lib::api::ListLoader), the shared
//! [`EnumRegistry`](soundcms_lib::enums::EnumRegistry) and a
//! [`Messages`](crate::toast::Messages) channel. It keeps the current page
//! of rows and the query that produced it, and resolves cells to
//! [`CellContent`] without drawing anything.

mod actions;
mod column;
mod context;
mod error;
mod filter;
mod options;
mod render;

pub use actions::*;
pub use column::*;
pub use context::*;
pub use error::TableError;
pub use filter::FilterSection;
pub use options::TableOptions;
pub use render::*;
