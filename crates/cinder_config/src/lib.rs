//! Parsing and validation of `cinder.toml` device-model configuration files.
//!
//! The configuration selects the target device (a named part or a synthetic
//! grid), toggles debug logging, and carries the per-I/O attribute side table
//! that the device model applies to I/O bels.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME, MAX_GRID_DIM};
pub use types::*;
