//! Diagnostic rendering for terminal output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[P101]: LAB needs a fourth clock
///   --> 3.4.ALM2_FF1
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_label(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        format!("\x1b[1;{}m{severity}\x1b[0m", severity.ansi_color())
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!(
            "{}[{}]: {}\n",
            self.severity_label(diag.severity),
            diag.code,
            diag.message
        );
        if let Some(subject) = &diag.subject {
            out.push_str(&format!("  --> {subject}\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_error_with_subject() {
        let code = DiagnosticCode::new(Category::Packing, 101);
        let diag = Diagnostic::error(code, "LAB needs a fourth clock").with_subject("3.4.ALM2_FF1");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("error[P101]: LAB needs a fourth clock"));
        assert!(output.contains("--> 3.4.ALM2_FF1"));
    }

    #[test]
    fn render_notes_and_help() {
        let code = DiagnosticCode::new(Category::Config, 2);
        let diag = Diagnostic::warning(code, "unknown IO attribute")
            .with_note("attribute 'slew' is not recognised")
            .with_help("remove it from cinder.toml");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("warning[C002]: unknown IO attribute"));
        assert!(output.contains("= note: attribute 'slew' is not recognised"));
        assert!(output.contains("= help: remove it from cinder.toml"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn color_wraps_severity() {
        let code = DiagnosticCode::new(Category::Device, 1);
        let diag = Diagnostic::info(code, "ready");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;36minfo\x1b[0m[D001]"));
    }
}
