//! List and CRUD contract types
//!
//! These types describe the shape of the list-loading callback and the
//! response envelope of the module REST surface; they carry no transport.

mod envelope;
mod list;
mod loader;

pub use envelope::*;
pub use list::*;
pub use loader::*;
