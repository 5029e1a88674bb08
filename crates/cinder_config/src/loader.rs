//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CinderConfig;
use std::path::Path;

/// The file name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "cinder.toml";

/// Largest grid dimension: tile coordinates occupy 7 bits of a routing-node id.
pub const MAX_GRID_DIM: u32 = 128;

/// Loads and validates the `cinder.toml` in a directory.
pub fn load_config(dir: &Path) -> Result<CinderConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<CinderConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `cinder.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<CinderConfig, ConfigError> {
    let config: CinderConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &CinderConfig) -> Result<(), ConfigError> {
    match (&config.device.part, config.device.grid) {
        (None, None) => return Err(ConfigError::NoDevice),
        (Some(_), Some(_)) => return Err(ConfigError::ConflictingDevice),
        (Some(part), None) if part.is_empty() => return Err(ConfigError::NoDevice),
        (None, Some([sx, sy])) if sx < 3 || sy < 2 || sx > MAX_GRID_DIM || sy > MAX_GRID_DIM => {
            return Err(ConfigError::GridOutOfRange {
                sx,
                sy,
                max: MAX_GRID_DIM,
            })
        }
        _ => {}
    }
    if config.io.keys().any(|name| name.is_empty()) {
        return Err(ConfigError::EmptyPortName);
    }
    Ok(())
}
