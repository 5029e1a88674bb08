//! Thread-safe diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

const SEVERITIES: usize = 4;

/// Collects the records a device model logs while it is built and packed.
///
/// Debug records are dropped unless the sink is verbose. Counts are kept per
/// severity and survive [`take_all`](Self::take_all).
pub struct DiagnosticSink {
    records: Mutex<Vec<Diagnostic>>,
    counts: [AtomicUsize; SEVERITIES],
    verbose: AtomicBool,
}

impl DiagnosticSink {
    /// Creates an empty sink that drops debug records.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            counts: Default::default(),
            verbose: AtomicBool::new(false),
        }
    }

    /// Creates a sink that keeps debug records.
    pub fn verbose() -> Self {
        let sink = Self::new();
        sink.set_verbose(true);
        sink
    }

    /// Enables or disables retention of debug records.
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.store(verbose, Ordering::Relaxed);
    }

    /// Returns `true` if debug records are kept. Callers check this before
    /// formatting expensive debug messages.
    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity == Severity::Debug && !self.is_verbose() {
            return;
        }
        self.counts[diag.severity as usize].fetch_add(1, Ordering::Relaxed);
        self.lock().push(diag);
    }

    /// Number of records of `severity` emitted so far.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity as usize].load(Ordering::Relaxed)
    }

    /// Returns `true` if an error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// A one-line tally such as `1 error, 2 warnings`, or `None` when neither
    /// errors nor warnings were emitted.
    pub fn summary(&self) -> Option<String> {
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("1 {word}")
            } else {
                format!("{n} {word}s")
            }
        };
        let parts: Vec<String> = [(Severity::Error, "error"), (Severity::Warning, "warning")]
            .into_iter()
            .map(|(severity, word)| (self.count(severity), word))
            .filter(|&(n, _)| n > 0)
            .map(|(n, word)| plural(n, word))
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }

    /// Removes and returns the stored records.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// A copy of the stored records.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("errors", &self.count(Severity::Error))
            .field("warnings", &self.count(Severity::Warning))
            .field("verbose", &self.is_verbose())
            .finish()
    }
}
