//! Shared foundational types used across the Cinder device model.
//!
//! This crate provides interned identifiers and hierarchical identifier lists
//! used for every resource name, plus the internal-error result type.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, IdentList, Interner};
pub use result::{CinderResult, InternalError};
