//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Why a `cinder.toml` could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid TOML or does not match the schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Neither `device.part` nor `device.grid` is set.
    #[error("no device selected: set device.part or device.grid")]
    NoDevice,

    /// Both `device.part` and `device.grid` are set.
    #[error("device.part and device.grid are mutually exclusive")]
    ConflictingDevice,

    /// The synthetic grid does not fit the routing-node coordinate space.
    #[error("grid {sx}x{sy} is outside 3x2..{max}x{max}")]
    GridOutOfRange {
        /// Requested width.
        sx: u32,
        /// Requested height.
        sy: u32,
        /// Largest allowed dimension.
        max: u32,
    },

    /// An `[io]` entry has an empty port name.
    #[error("io attribute table has an empty port name")]
    EmptyPortName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_grid_out_of_range() {
        let err = ConfigError::GridOutOfRange {
            sx: 200,
            sy: 10,
            max: 128,
        };
        assert_eq!(format!("{err}"), "grid 200x10 is outside 3x2..128x128");
    }

    #[test]
    fn display_read_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("/boards/de10/cinder.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(
            format!("{err}"),
            "cannot read /boards/de10/cinder.toml: file not found"
        );
    }
}
