//! Output types of a scan

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeKind {
    /// `@NAME` ... `@end NAME`.
    Block,
    /// A chapter, section or subsection span.
    Section,
    /// A run of contiguous comment lines.
    Comment,
    /// The document header between two `@c %**` lines.
    HeaderRegion,
}

impl RangeKind {
    /// Whether ranges of this kind take part in the document outline.
    pub fn is_structural(self) -> bool {
        matches!(self, RangeKind::Block | RangeKind::Section)
    }
}

/// A foldable line span. `start <= end`, both 0-based line indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoldRange {
    pub start: usize,
    pub end: usize,
    pub kind: RangeKind,
    /// Block or sectioning keyword; empty for comments and header regions.
    pub name: String,
    /// Captured title of a section; empty otherwise.
    pub detail: String,
}

impl FoldRange {
    pub fn block(start: usize, end: usize, name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind: RangeKind::Block,
            name: name.into(),
            detail: String::new(),
        }
    }

    pub fn section(
        start: usize,
        end: usize,
        name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            kind: RangeKind::Section,
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn comment(start: usize, end: usize) -> Self {
        Self::unnamed(start, end, RangeKind::Comment)
    }

    pub fn header(start: usize, end: usize) -> Self {
        Self::unnamed(start, end, RangeKind::HeaderRegion)
    }

    fn unnamed(start: usize, end: usize, kind: RangeKind) -> Self {
        Self {
            start,
            end,
            kind,
            name: String::new(),
            detail: String::new(),
        }
    }

    pub fn contains(&self, other: &FoldRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn line_span(&self) -> usize {
        self.end - self.start + 1
    }
}

/// A `@node NAME` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeMarker {
    pub line: usize,
    pub name: String,
}

/// Everything a single pass over a document produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// Ranges in the order the scanner emitted them.
    pub ranges: Vec<FoldRange>,
    /// Node lines, bottom of the document first.
    pub nodes: Vec<NodeMarker>,
}

impl ScanResult {
    /// Ranges ordered by start line, outer ranges first.
    pub fn sorted_ranges(&self) -> Vec<FoldRange> {
        let mut ranges = self.ranges.clone();
        ranges.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        ranges
    }

    /// Node markers in document order.
    pub fn sorted_nodes(&self) -> Vec<NodeMarker> {
        let mut nodes = self.nodes.clone();
        nodes.sort_by_key(|node| node.line);
        nodes
    }
}
