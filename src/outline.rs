//! Outline projector
//!
//!     Rebuilds the nesting of Block and Section ranges into a tree. Ranges never share a start
//!     line and never partially overlap, so indexing them by start line and walking the lines
//!     in order recovers the tree directly: a range at line `idx` owns every range starting in
//!     `idx + 1 .. end`, and the walk then resumes after `end`. Nesting is trusted, not checked.

use crate::range::{FoldRange, RangeKind};
use serde::Serialize;

/// One entry of the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    /// `@` followed by the block or sectioning keyword.
    pub label: String,
    /// Section title; empty for blocks.
    pub detail: String,
    pub kind: RangeKind,
    pub start: usize,
    pub end: usize,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn from_range(range: &FoldRange, children: Vec<OutlineNode>) -> Self {
        Self {
            label: format!("@{}", range.name),
            detail: range.detail.clone(),
            kind: range.kind,
            start: range.start,
            end: range.end,
            children,
        }
    }

    /// Depth-first iterator over this node and its descendants, with their depth.
    pub fn walk(&self) -> impl Iterator<Item = (usize, &OutlineNode)> {
        let mut stack = vec![(0, self)];
        std::iter::from_fn(move || {
            let (depth, node) = stack.pop()?;
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, node))
        })
    }
}

/// Build the outline of a document with `line_count` lines from its ranges.
///
/// Comment and header ranges are ignored.
pub fn build_outline(ranges: &[FoldRange], line_count: usize) -> Vec<OutlineNode> {
    let mut slots: Vec<Option<&FoldRange>> = vec![None; line_count];
    for range in ranges.iter().filter(|range| range.kind.is_structural()) {
        if let Some(slot) = slots.get_mut(range.start) {
            *slot = Some(range);
        }
    }
    build(&slots, 0, line_count)
}

fn build(slots: &[Option<&FoldRange>], from: usize, to: usize) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut idx = from;
    while idx < to {
        if let Some(range) = slots.get(idx).copied().flatten() {
            let children = build(slots, idx + 1, range.end);
            nodes.push(OutlineNode::from_range(range, children));
            idx = range.end;
        }
        idx += 1;
    }
    nodes
}

/// Indented text rendering, one node per line.
pub fn render_tree(nodes: &[OutlineNode]) -> String {
    let mut lines = Vec::new();
    for root in nodes {
        for (depth, node) in root.walk() {
            let mut line = format!("{}{}", "  ".repeat(depth), node.label);
            if !node.detail.is_empty() {
                line.push(' ');
                line.push_str(&node.detail);
            }
            line.push_str(&format!(" [{}-{}]", node.start, node.end));
            lines.push(line);
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ranges_give_empty_outline() {
        assert!(build_outline(&[], 10).is_empty());
    }

    #[test]
    fn comments_and_headers_are_left_out() {
        let ranges = vec![
            FoldRange::comment(0, 1),
            FoldRange::header(2, 4),
            FoldRange::block(5, 6, "example"),
        ];
        let outline = build_outline(&ranges, 7);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].label, "@example");
        assert!(outline[0].detail.is_empty());
    }

    #[test]
    fn nests_by_containment() {
        let ranges = vec![
            FoldRange::section(4, 6, "section", "Two"),
            FoldRange::block(2, 3, "table"),
            FoldRange::section(1, 3, "section", "One"),
            FoldRange::section(0, 6, "chapter", "Top"),
        ];
        let outline = build_outline(&ranges, 7);
        assert_eq!(outline.len(), 1);
        let chapter = &outline[0];
        assert_eq!((chapter.label.as_str(), chapter.detail.as_str()), ("@chapter", "Top"));
        let children: Vec<&str> = chapter.children.iter().map(|c| c.detail.as_str()).collect();
        assert_eq!(children, vec!["One", "Two"]);
        assert_eq!(chapter.children[0].children[0].label, "@table");
    }

    #[test]
    fn ranges_past_the_document_are_ignored() {
        let ranges = vec![FoldRange::block(8, 9, "example")];
        assert!(build_outline(&ranges, 4).is_empty());
    }

    #[test]
    fn walk_is_depth_first() {
        let ranges = vec![
            FoldRange::section(3, 4, "section", "B"),
            FoldRange::section(1, 2, "section", "A"),
            FoldRange::section(0, 4, "chapter", "C"),
        ];
        let outline = build_outline(&ranges, 5);
        let visited: Vec<(usize, &str)> = outline[0]
            .walk()
            .map(|(depth, node)| (depth, node.detail.as_str()))
            .collect();
        assert_eq!(visited, vec![(0, "C"), (1, "A"), (1, "B")]);
    }
}
