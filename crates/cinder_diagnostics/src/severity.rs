//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic record.
///
/// Declaration order is severity order, so `Debug < Info < Warning < Error`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Detailed tracing, only kept when the sink is verbose.
    Debug,
    /// Progress information.
    Info,
    /// A recoverable problem that should be reviewed.
    Warning,
    /// A definite problem.
    Error,
}

impl Severity {
    /// Whether a record of this severity is printed under the given output
    /// flags. Errors always are; `quiet` wins over `verbose`.
    pub fn is_shown(self, quiet: bool, verbose: bool) -> bool {
        match self {
            Severity::Error => true,
            Severity::Warning => !quiet,
            Severity::Info | Severity::Debug => verbose && !quiet,
        }
    }

    /// SGR colour parameter used by the terminal renderer.
    pub fn ansi_color(self) -> &'static str {
        match self {
            Severity::Debug => "2",
            Severity::Info => "36",
            Severity::Warning => "33",
            Severity::Error => "31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}
