//! The result type for broken internal invariants.

use std::panic::Location;

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a broken internal invariant (a bug in the caller or in the
/// device model), not a legitimate negative outcome. Lookups that may miss
/// return `Option`, and legality checks return `bool`.
pub type CinderResult<T> = Result<T, InternalError>;

/// A broken invariant, with the source location that detected it.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
    /// Where the error was raised.
    pub location: &'static Location<'static>,
}

impl InternalError {
    /// Creates an internal error located at the caller.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
        }
    }
}
