//! Structured log records for the Cinder device model.
//!
//! Device construction and packing report progress and problems as
//! [`Diagnostic`] records with a severity and a category code. The
//! thread-safe [`DiagnosticSink`] accumulates them, and
//! [`TerminalRenderer`] formats them for a terminal.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
