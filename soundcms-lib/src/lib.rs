//! SoundCMS admin client library
//!
//! Data model, field-name mapping, option-set registry and the REST client
//! for the sound/music content-management backend.

pub mod api;
pub mod config;
pub mod enums;
pub mod error;
pub mod mapping;
pub mod model;

mod client;
mod loader;

pub use client::*;
pub use error::Error;
pub use loader::*;
