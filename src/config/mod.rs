//! Configuration model for proclock.
//!
//! This module defines the Config struct that represents the optional
//! `proclock.yaml` file. It supports forward-compatible YAML parsing (unknown
//! fields are ignored), defaults for every field, and validation of values.

mod model;
mod operations;


// Re-export public API
pub use model::{Config, DEFAULT_CONFIG_FILE};
