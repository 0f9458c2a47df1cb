use crate::features::document_symbols::line_width;
use lsp_types::{Diagnostic, Position, Range};
use texinfo::TextDocument;
use texinfo_analysis::diagnostics::{parse_makeinfo_log, LogDiagnostic};

pub const DIAGNOSTIC_SOURCE: &str = "makeinfo";

/// Diagnostics for the messages of `log` that point into `file_path`, each covering its whole
/// line of `document`.
pub fn makeinfo_diagnostics(log: &str, file_path: &str, document: &TextDocument) -> Vec<Diagnostic> {
    parse_makeinfo_log(log, file_path)
        .into_iter()
        .map(|entry| to_diagnostic(entry, document))
        .collect()
}

fn to_diagnostic(entry: LogDiagnostic, document: &TextDocument) -> Diagnostic {
    let range = Range::new(
        Position::new(entry.line, 0),
        Position::new(entry.line, line_width(document, entry.line as usize)),
    );
    Diagnostic {
        range,
        severity: Some(entry.severity),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: entry.message,
        ..Diagnostic::default()
    }
}
