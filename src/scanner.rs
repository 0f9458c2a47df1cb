//! Range scanner
//!
//!     One backward pass over a document that rebuilds its block structure from line prefixes
//!     alone. Walking bottom-up means a block's `@end NAME` is always seen before its opener, so
//!     pending closers live on a plain stack, and a heading always knows where its span ends:
//!     the line just before the next heading of the same or a higher level, which was visited
//!     earlier in the pass.
//!
//!     Per line, in order:
//!
//!         1. Lines not starting with `@` (after indentation) are skipped.
//!         2. Outside verbatim: `@bye` discards everything collected so far and restarts the
//!            pass with the end of the document moved to that line. Comment lines then feed
//!            the header-region toggle or the current comment run.
//!         3. `@end NAME` pushes a pending closer (ignored inside verbatim).
//!         4. Outside verbatim: `@node` is recorded; sectioning lines close a Section range at
//!            their level's cursor and move the cursors up.
//!         5. Anything else is tried as the opener of the innermost pending block.
//!
//!     All mutable state of a pass lives in [`ScanState`]. Malformed input never fails: stray
//!     `@end` lines are dropped and headings without context extend to the document edge.

use crate::classify::{self, CommentKind, HeadingLevel};
use crate::document::LineSource;
use crate::range::{FoldRange, NodeMarker, ScanResult};

/// Lines examined above a heading when looking for the end of the previous span.
///
/// Arbitrary, but range boundaries downstream depend on it.
pub const LAST_TEXT_LINE_LOOKBACK: usize = 3;

/// An `@end NAME` line still waiting for its opener.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingBlock {
    name: String,
    line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineRun {
    start: usize,
    end: usize,
}

/// Where the next heading of each level closes its span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ClosingCursors {
    subsection: Option<usize>,
    section: Option<usize>,
    chapter: Option<usize>,
}

impl ClosingCursors {
    fn get(&self, level: HeadingLevel) -> Option<usize> {
        match level {
            HeadingLevel::Subsection => self.subsection,
            HeadingLevel::Section => self.section,
            HeadingLevel::Chapter => self.chapter,
            HeadingLevel::Node => None,
        }
    }

    /// Move the cursor of `level` and of every more specific level.
    fn reset_from(&mut self, level: HeadingLevel, line: usize) {
        self.subsection = Some(line);
        if level >= HeadingLevel::Section {
            self.section = Some(line);
        }
        if level >= HeadingLevel::Chapter {
            self.chapter = Some(line);
        }
    }
}

/// Mutable state of one backward pass.
#[derive(Debug)]
struct ScanState {
    ranges: Vec<FoldRange>,
    nodes: Vec<NodeMarker>,
    pending: Vec<PendingBlock>,
    comment_run: Option<LineRun>,
    /// Logical end of a header region whose opening delimiter is not yet seen.
    header_end: Option<usize>,
    cursors: ClosingCursors,
    verbatim: bool,
    last_line: usize,
}

impl ScanState {
    fn new(last_line: usize) -> Self {
        Self {
            ranges: Vec::new(),
            nodes: Vec::new(),
            pending: Vec::new(),
            comment_run: None,
            header_end: None,
            cursors: ClosingCursors::default(),
            verbatim: false,
            last_line,
        }
    }

    /// Forget everything at and below a `@bye` line.
    fn terminate_at(&mut self, line: usize) {
        *self = ScanState::new(line);
    }

    fn process_comment(&mut self, text: &str, line: usize) -> bool {
        match classify::comment_kind(text) {
            Some(CommentKind::HeaderDelimiter) => {
                match self.header_end.take() {
                    Some(end) => self.ranges.push(FoldRange::header(line, end)),
                    None => self.header_end = Some(line),
                }
                true
            }
            Some(CommentKind::Line) => {
                self.comment_run = match self.comment_run {
                    None => Some(LineRun {
                        start: line,
                        end: line,
                    }),
                    Some(run) if run.start == line + 1 => Some(LineRun {
                        start: line,
                        end: run.end,
                    }),
                    Some(run) => {
                        self.ranges.push(FoldRange::comment(run.start, run.end));
                        Some(LineRun {
                            start: line,
                            end: line,
                        })
                    }
                };
                true
            }
            None => false,
        }
    }

    fn process_block_end(&mut self, text: &str, line: usize) -> bool {
        let Some(name) = classify::block_end(text) else {
            return false;
        };
        if self.verbatim {
            return true;
        }
        if name == classify::VERBATIM {
            self.verbatim = true;
        }
        self.pending.push(PendingBlock {
            name: name.to_string(),
            line,
        });
        true
    }

    fn process_heading<S>(&mut self, source: &S, text: &str, line: usize) -> bool
    where
        S: LineSource + ?Sized,
    {
        let Some(heading) = classify::match_heading(text) else {
            return false;
        };
        if heading.level == HeadingLevel::Node {
            self.nodes.push(NodeMarker {
                line,
                name: heading.title.to_string(),
            });
            return true;
        }
        let end = self
            .cursors
            .get(heading.level)
            .unwrap_or(self.last_line)
            .max(line);
        self.ranges
            .push(FoldRange::section(line, end, heading.keyword, heading.title));
        self.cursors
            .reset_from(heading.level, last_text_line(source, line));
        true
    }

    fn process_opener(&mut self, text: &str, line: usize) {
        let Some(pending) = self.pending.pop() else {
            return;
        };
        if classify::opens_block(text, &pending.name) {
            // Inside verbatim the only pending closer is `@end verbatim`, so this is its opener.
            self.verbatim = false;
            self.ranges
                .push(FoldRange::block(line, pending.line, pending.name));
        } else {
            self.pending.push(pending);
        }
    }

    fn finish(mut self) -> ScanResult {
        if let Some(run) = self.comment_run.take() {
            self.ranges.push(FoldRange::comment(run.start, run.end));
        }
        ScanResult {
            ranges: self.ranges,
            nodes: self.nodes,
        }
    }
}

/// Last line of the span that ends right above the heading on `heading_line`.
///
/// Looks at most [`LAST_TEXT_LINE_LOOKBACK`] lines up: a `@node` line ends the span just above
/// itself, a blank line ends it on the blank line. Otherwise the line above the heading.
fn last_text_line<S>(source: &S, heading_line: usize) -> usize
where
    S: LineSource + ?Sized,
{
    let Some(above) = heading_line.checked_sub(1) else {
        return 0;
    };
    let floor = (above + 1).saturating_sub(LAST_TEXT_LINE_LOOKBACK);
    for idx in (floor..=above).rev() {
        let text = source.line_at(idx);
        if text.starts_with("@node ") {
            return idx.saturating_sub(1);
        }
        if text.is_empty() {
            return idx;
        }
    }
    above
}

/// Compute every folding range and node marker of a document.
pub fn scan<S>(source: &S) -> ScanResult
where
    S: LineSource + ?Sized,
{
    let line_count = source.line_count();
    let Some(last_line) = line_count.checked_sub(1) else {
        return ScanResult::default();
    };
    let mut state = ScanState::new(last_line);

    for idx in (0..=last_line).rev() {
        let text = source.line_at(idx).trim_start();
        if !text.starts_with('@') {
            continue;
        }
        if !state.verbatim {
            if classify::is_terminator(text) {
                state.terminate_at(idx);
                continue;
            }
            if state.process_comment(text, idx) {
                continue;
            }
        }
        if state.process_block_end(text, idx) {
            continue;
        }
        if !state.verbatim && state.process_heading(source, text, idx) {
            continue;
        }
        state.process_opener(text, idx);
    }

    let result = state.finish();
    tracing::debug!(
        lines = line_count,
        ranges = result.ranges.len(),
        nodes = result.nodes.len(),
        "scanned document"
    );
    result
}

/// Convenience wrapper returning only the ranges.
pub fn folding_ranges<S>(source: &S) -> Vec<FoldRange>
where
    S: LineSource + ?Sized,
{
    scan(source).ranges
}
