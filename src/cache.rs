//! Incremental cache
//!
//!     Holds the last [`ScanResult`] of a document and decides, per batch of edits, whether it
//!     can be kept. Only the *shape* of an edit is inspected: an edit that stays on one line and
//!     inserts no line break is assumed not to change structure. That is an approximation;
//!     renaming `@end table` to `@end tabl` keeps a stale result until the next save or
//!     multi-line edit.
//!
//!     The outline is derived from the ranges, so it is dropped together with them.

use crate::document::{EndOfLine, LineSource, TextEdit};
use crate::outline::{build_outline, OutlineNode};
use crate::range::{FoldRange, NodeMarker, ScanResult};
use crate::scanner;

#[derive(Debug, Default)]
pub struct RangeCache {
    scan: Option<ScanResult>,
    outline: Option<Vec<OutlineNode>>,
    /// Content changed since the cached scan was computed.
    dirty: bool,
}

impl RangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cached(&self) -> bool {
        self.scan.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply the edit-shape policy to a batch of edits.
    ///
    /// Returns whether a cached result was discarded.
    pub fn invalidate_on_edit(&mut self, edits: &[TextEdit], eol: EndOfLine) -> bool {
        if edits.is_empty() {
            return false;
        }
        self.dirty = true;
        if self.scan.is_none() {
            return false;
        }
        let reshaped = edits
            .iter()
            .any(|edit| edit.line_count(eol) != 1 || !edit.range.is_single_line());
        if reshaped {
            tracing::debug!(edits = edits.len(), "line structure changed, dropping ranges");
            self.invalidate();
        }
        reshaped
    }

    /// Drop the cached scan when the document changed since it was computed.
    ///
    /// Called on save, where a full rescan picks up edits the shape policy let through.
    pub fn on_save(&mut self) -> bool {
        if !self.dirty || self.scan.is_none() {
            return false;
        }
        self.invalidate();
        true
    }

    /// Unconditionally drop everything.
    pub fn invalidate(&mut self) {
        self.scan = None;
        self.outline = None;
    }

    /// Cached scan, or a fresh one.
    pub fn get_or_scan<S>(&mut self, source: &S) -> &ScanResult
    where
        S: LineSource + ?Sized,
    {
        if self.scan.is_none() {
            self.dirty = false;
        }
        self.scan.get_or_insert_with(|| scanner::scan(source))
    }

    pub fn ranges<S>(&mut self, source: &S) -> &[FoldRange]
    where
        S: LineSource + ?Sized,
    {
        &self.get_or_scan(source).ranges
    }

    pub fn nodes<S>(&mut self, source: &S) -> &[NodeMarker]
    where
        S: LineSource + ?Sized,
    {
        &self.get_or_scan(source).nodes
    }

    pub fn outline<S>(&mut self, source: &S) -> &[OutlineNode]
    where
        S: LineSource + ?Sized,
    {
        if self.outline.is_none() {
            let line_count = source.line_count();
            let outline = build_outline(&self.get_or_scan(source).ranges, line_count);
            self.outline = Some(outline);
        }
        self.outline.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{EditRange, Position, TextDocument};

    fn edit(start: (usize, usize), end: (usize, usize), text: &str) -> TextEdit {
        TextEdit::new(
            EditRange::new(Position::new(start.0, start.1), Position::new(end.0, end.1)),
            text,
        )
    }

    fn primed(text: &str) -> (RangeCache, TextDocument) {
        let doc = TextDocument::new(text);
        let mut cache = RangeCache::new();
        cache.get_or_scan(&doc);
        (cache, doc)
    }

    #[test]
    fn nothing_cached_means_nothing_to_invalidate() {
        let mut cache = RangeCache::new();
        assert!(!cache.invalidate_on_edit(&[edit((0, 0), (3, 0), "a\nb")], EndOfLine::Lf));
        assert!(!cache.is_cached());
    }

    #[test]
    fn single_line_edit_keeps_cache() {
        let (mut cache, _) = primed("@table x\nitem\n@end table");
        assert!(!cache.invalidate_on_edit(&[edit((1, 0), (1, 4), "entry")], EndOfLine::Lf));
        assert!(cache.is_cached());
    }

    #[test]
    fn inserted_line_break_invalidates() {
        let (mut cache, _) = primed("@table x\nitem\n@end table");
        assert!(cache.invalidate_on_edit(&[edit((1, 0), (1, 0), "new\n")], EndOfLine::Lf));
        assert!(!cache.is_cached());
    }

    #[test]
    fn removed_line_break_invalidates() {
        let (mut cache, _) = primed("@table x\nitem\n@end table");
        assert!(cache.invalidate_on_edit(&[edit((0, 8), (1, 0), "")], EndOfLine::Lf));
    }

    #[test]
    fn any_reshaping_edit_in_batch_invalidates() {
        let (mut cache, _) = primed("@c a\n@c b");
        let edits = [edit((0, 0), (0, 1), "x"), edit((1, 0), (1, 0), "y\nz")];
        assert!(cache.invalidate_on_edit(&edits, EndOfLine::Lf));
    }

    #[test]
    fn line_count_uses_document_convention() {
        let (mut cache, _) = primed("@c a\r\n@c b");
        // A bare LF is not a line break for a CRLF document.
        assert!(!cache.invalidate_on_edit(&[edit((0, 0), (0, 0), "x\ny")], EndOfLine::CrLf));
        assert!(cache.invalidate_on_edit(&[edit((0, 0), (0, 0), "x\r\ny")], EndOfLine::CrLf));
    }

    #[test]
    fn structural_single_line_edit_is_missed_until_save() {
        let mut doc = TextDocument::new("@table x\nitem\n@end table");
        let mut cache = RangeCache::new();
        assert_eq!(cache.ranges(&doc).len(), 1);

        let change = edit((2, 5), (2, 10), "tabl");
        doc.apply_edit(&change);
        assert!(!cache.invalidate_on_edit(&[change], EndOfLine::Lf));
        assert_eq!(cache.ranges(&doc).len(), 1);

        assert!(cache.on_save());
        assert!(cache.ranges(&doc).is_empty());
        assert!(!cache.on_save());
    }

    #[test]
    fn invalidation_drops_outline() {
        let (mut cache, doc) = primed("@chapter A\ntext");
        assert_eq!(cache.outline(&doc).len(), 1);
        assert!(cache.invalidate_on_edit(&[edit((0, 0), (1, 0), "")], EndOfLine::Lf));
        let doc = TextDocument::new("text");
        assert!(cache.outline(&doc).is_empty());
    }

    #[test]
    fn rescans_are_idempotent() {
        let doc = TextDocument::new("@c a\n@example\nx\n@end example\n@chapter C");
        let mut cache = RangeCache::new();
        let first = cache.get_or_scan(&doc).clone();
        cache.invalidate();
        cache.invalidate();
        assert_eq!(cache.get_or_scan(&doc), &first);
    }
}
