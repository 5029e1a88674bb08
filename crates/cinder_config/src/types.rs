//! Configuration types deserialized from `cinder.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// The top-level configuration parsed from `cinder.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CinderConfig {
    /// Target device selection.
    #[serde(default)]
    pub device: DeviceConfig,
    /// Tool options.
    #[serde(default)]
    pub options: OptionsConfig,
    /// I/O attribute side table, keyed by port name.
    #[serde(default)]
    pub io: BTreeMap<String, BTreeMap<String, AttrValue>>,
}

/// Selects the device to model.
///
/// Exactly one of `part` and `grid` must be given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceConfig {
    /// A named part, e.g. `5CSEMA5F31C6`.
    #[serde(default)]
    pub part: Option<String>,
    /// A synthetic device of `[width, height]` tiles.
    #[serde(default)]
    pub grid: Option<[u32; 2]>,
}

/// Tool options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsConfig {
    /// Keep debug-severity log records.
    #[serde(default)]
    pub debug: bool,
}

/// A single attribute value in the I/O side table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// An integer attribute.
    Int(i64),
    /// A boolean attribute.
    Bool(bool),
    /// A string attribute.
    Str(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Str(v) => write!(f, "{v}"),
        }
    }
}
