//! Diagnostics extracted from makeinfo's error log
//!
//! makeinfo reports problems as `PATH:LINE: message`, with warnings spelled
//! `PATH:LINE: warning: message`. Lines about other files (for example `@include`d ones) and
//! lines without a location are dropped.

use lsp_types::DiagnosticSeverity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDiagnostic {
    /// 0-based line in the document.
    pub line: u32,
    pub message: String,
    pub severity: DiagnosticSeverity,
}

impl LogDiagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::ERROR
    }
}

pub fn parse_makeinfo_log(log: &str, file_path: &str) -> Vec<LogDiagnostic> {
    log.lines()
        .filter_map(|line| line.strip_prefix(file_path)?.strip_prefix(':'))
        .filter_map(parse_located_message)
        .collect()
}

fn parse_located_message(text: &str) -> Option<LogDiagnostic> {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let line_number: u32 = text[..digits].parse().ok()?;
    let message = text[digits..].strip_prefix(':')?.trim_start();
    let severity = if message.starts_with("warning:") {
        DiagnosticSeverity::WARNING
    } else {
        DiagnosticSeverity::ERROR
    };
    Some(LogDiagnostic {
        line: line_number.saturating_sub(1),
        message: message.to_string(),
        severity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/home/user/manual.texi";

    #[test]
    fn parses_errors_and_warnings() {
        let log = "\
/home/user/manual.texi:12: @end table without matching @table
/home/user/manual.texi:3: warning: node `Top' unreferenced
";
        let diagnostics = parse_makeinfo_log(log, PATH);
        assert_eq!(
            diagnostics,
            vec![
                LogDiagnostic {
                    line: 11,
                    message: "@end table without matching @table".to_string(),
                    severity: DiagnosticSeverity::ERROR,
                },
                LogDiagnostic {
                    line: 2,
                    message: "warning: node `Top' unreferenced".to_string(),
                    severity: DiagnosticSeverity::WARNING,
                },
            ]
        );
    }

    #[test]
    fn ignores_other_files_and_unlocated_lines() {
        let log = "\
/home/user/chapter.texi:4: misplaced {
/home/user/manual.texi: no @setfilename
makeinfo: Removing output file `manual.html' due to errors; use --force to preserve.
/home/user/manual.texi:7: unknown command `foo'
";
        let diagnostics = parse_makeinfo_log(log, PATH);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 6);
    }

    #[test]
    fn multi_digit_line_numbers_keep_full_message() {
        let diagnostics = parse_makeinfo_log("/home/user/manual.texi:100: bad", PATH);
        assert_eq!(diagnostics[0].line, 99);
        assert!(diagnostics[0].is_error());
        assert_eq!(diagnostics[0].message, "bad");
    }

    #[test]
    fn handles_crlf_logs() {
        let diagnostics = parse_makeinfo_log("/home/user/manual.texi:1: oops\r\n", PATH);
        assert_eq!(diagnostics[0].message, "oops");
        assert_eq!(diagnostics[0].line, 0);
    }
}
