//! Configuration module for map renders
//!
//! Provides the TOML schema for render configs and the rules for picking
//! and validating a config source.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
