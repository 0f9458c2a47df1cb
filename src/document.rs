//! Line access and text edits
//!
//!     The scanner never owns text. It reads rows through [`LineSource`], which the host (or
//!     [`TextDocument`], the owned implementation used by the server and the CLI) provides.
//!
//!     Edits arrive in host coordinates: 0-based lines and UTF-16 columns, the way LSP clients
//!     report them. [`TextDocument::apply_edit`] maps those onto byte offsets and splices the
//!     replacement in place; positions past the end of a line or of the document are clamped.

use serde::Serialize;

/// Line-ending convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EndOfLine {
    #[default]
    Lf,
    CrLf,
}

impl EndOfLine {
    pub fn as_str(self) -> &'static str {
        match self {
            EndOfLine::Lf => "\n",
            EndOfLine::CrLf => "\r\n",
        }
    }

    /// Guess the convention from the first line break in `text`.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => EndOfLine::CrLf,
            _ => EndOfLine::Lf,
        }
    }
}

/// Read-only, row-oriented view of a document.
pub trait LineSource {
    fn line_count(&self) -> usize;

    /// Text of row `index` without its line terminator.
    ///
    /// Callers only pass indices below [`LineSource::line_count`].
    fn line_at(&self, index: usize) -> &str;

    fn eol(&self) -> EndOfLine {
        EndOfLine::Lf
    }
}

impl LineSource for [&str] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        self[index]
    }
}

impl LineSource for Vec<&str> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, index: usize) -> &str {
        self[index]
    }
}

/// A host position: 0-based line and UTF-16 column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EditRange {
    pub start: Position,
    pub end: Position,
}

impl EditRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// One content change: replace `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: EditRange,
    pub text: String,
}

impl TextEdit {
    pub fn new(range: EditRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Number of lines `text` spans under the given convention.
    pub fn line_count(&self, eol: EndOfLine) -> usize {
        self.text.split(eol.as_str()).count()
    }
}

/// Owned document text with a line index.
#[derive(Debug, Clone)]
pub struct TextDocument {
    text: String,
    eol: EndOfLine,
    /// Byte offset of the start of each line.
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let eol = EndOfLine::detect(&text);
        Self::with_eol(text, eol)
    }

    pub fn with_eol(text: impl Into<String>, eol: EndOfLine) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            text,
            eol,
            line_starts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole text. The line-ending convention is detected again unless the new
    /// text has no line break.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if self.text.contains('\n') {
            self.eol = EndOfLine::detect(&self.text);
        }
        self.line_starts = compute_line_starts(&self.text);
    }

    /// Range covering the whole document, used when a host sends full-text replacements.
    pub fn full_range(&self) -> EditRange {
        let last = self.line_starts.len() - 1;
        let last_line = self.line_at(last);
        let width = last_line.encode_utf16().count();
        EditRange::new(Position::new(0, 0), Position::new(last, width))
    }

    /// Splice one edit into the text.
    pub fn apply_edit(&mut self, edit: &TextEdit) {
        let start = self.offset_at(edit.range.start);
        let end = self.offset_at(edit.range.end).max(start);
        self.text.replace_range(start..end, &edit.text);
        self.line_starts = compute_line_starts(&self.text);
    }

    /// Byte offset for a host position, clamped to the document.
    pub fn offset_at(&self, position: Position) -> usize {
        if position.line >= self.line_starts.len() {
            return self.text.len();
        }
        let line_start = self.line_starts[position.line];
        let line = self.line_at(position.line);
        let mut units = 0;
        for (idx, ch) in line.char_indices() {
            if units >= position.character {
                return line_start + idx;
            }
            units += ch.len_utf16();
        }
        line_start + line.len()
    }
}

impl LineSource for TextDocument {
    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_at(&self, index: usize) -> &str {
        let start = self.line_starts[index];
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let line = &self.text[start..end];
        line.strip_suffix('\r').unwrap_or(line)
    }

    fn eol(&self) -> EndOfLine {
        self.eol
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(idx + 1);
        }
    }
    starts
}
