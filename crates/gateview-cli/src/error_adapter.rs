//! Error adapter for converting gateview errors and parser diagnostics to
//! miette diagnostics.
//!
//! The library crates stay free of miette; this module gives the CLI rich
//! reports with source snippets where a source is available.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity as MietteSeverity,
    SourceSpan,
};

use gateview::GateviewError;
use gateview_parser::{
    Span,
    error::{Diagnostic, Severity},
};

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Parsed text, when it is worth showing in the report
    src: Option<&'a str>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create an adapter that reports only the message, code and help.
    pub fn new(diag: &'a Diagnostic) -> Self {
        Self { diag, src: None }
    }

    /// Show labelled snippets of `src`.
    pub fn with_source(mut self, src: &'a str) -> Self {
        self.src = Some(src);
        self
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Warning => MietteSeverity::Warning,
            Severity::Error => MietteSeverity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = self
            .diag
            .help()
            .or_else(|| self.diag.code().map(|c| c.description()))?;
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.src.as_ref().map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if self.src.is_none() || labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            LabeledSpan::new_with_span(
                Some(label.message().to_string()),
                span_to_miette(label.span()),
            )
        })))
    }
}

/// Adapter for [`GateviewError`].
pub struct ErrorAdapter<'a>(pub &'a GateviewError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            GateviewError::Io(_) => "gateview::io",
            GateviewError::MissingReport { .. } => "gateview::missing_report",
            GateviewError::UnknownOutput(_) => "gateview::unknown_output",
            GateviewError::Config(_) => "gateview::config",
            GateviewError::Export(_) => "gateview::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            GateviewError::MissingReport { .. } => {
                "check the --highlight-path or --extract-path argument"
            }
            GateviewError::UnknownOutput(_) => "--path takes a signal declared with OUTPUT(...)",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// Convert a parser [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Render a diagnostic the way miette prints it on a terminal.
pub fn render(diagnostic: &dyn MietteDiagnostic) -> String {
    let mut writer = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut writer, diagnostic)
        .expect("Writing to String buffer is infallible");
    writer
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use gateview_parser::error::ErrorCode;

    use super::*;

    #[test]
    fn test_diagnostic_with_source() {
        let diag = Diagnostic::warning("skipped line 2")
            .with_code(ErrorCode::W001)
            .with_label(Span::new(9..21), "not a declaration")
            .with_help("expected `INPUT(x)`");
        let adapter = DiagnosticAdapter::new(&diag).with_source("INPUT(a)\ngarbage here\n");

        assert_eq!(adapter.to_string(), "skipped line 2");
        assert_eq!(adapter.code().unwrap().to_string(), "W001");
        assert_eq!(adapter.severity(), Some(MietteSeverity::Warning));

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label(), Some("not a declaration"));
        assert_eq!(labels[0].offset(), 9);
        assert_eq!(labels[0].len(), 12);
    }

    #[test]
    fn test_code_description_is_fallback_help() {
        let diag = Diagnostic::warning("skipped line 4").with_code(ErrorCode::W001);
        let adapter = DiagnosticAdapter::new(&diag);

        assert_eq!(
            adapter.help().unwrap().to_string(),
            "malformed netlist line"
        );

        let diag = diag.with_help("expected `OUTPUT(x)`");
        let adapter = DiagnosticAdapter::new(&diag);
        assert_eq!(adapter.help().unwrap().to_string(), "expected `OUTPUT(x)`");
    }

    #[test]
    fn test_diagnostic_without_source_has_no_labels() {
        let diag = Diagnostic::warning("no critical path found")
            .with_label(Span::new(0..10), "report");
        let adapter = DiagnosticAdapter::new(&diag);

        assert!(adapter.source_code().is_none());
        assert!(adapter.labels().is_none());
        assert!(render(&adapter).contains("no critical path found"));
    }

    #[test]
    fn test_error_codes_and_help() {
        let err = GateviewError::UnknownOutput("G11".to_string());
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "gateview::unknown_output");
        assert!(adapter.help().is_some());

        let err = GateviewError::MissingReport {
            path: PathBuf::from("report.txt"),
        };
        let rendered = render(&ErrorAdapter(&err));
        assert!(rendered.contains("report.txt"));
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = GateviewError::Config("bad".to_string());

        assert!(ErrorAdapter(&err).help().is_none());
        assert_eq!(ErrorAdapter(&err).to_string(), "Configuration error: bad");
    }
}
