//! Configuration module for hqscale
//!
//! Provides types, parsing and discovery for `hqscale.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
