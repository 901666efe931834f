//! Typed models

mod module;
mod record;
mod record_serde;
mod value;

pub use module::*;
pub use record::*;
pub use value::*;
