//! Outline rendering over a small but complete manual

use texinfo::{render_tree, DocumentContext, OutlineNode, RangeKind};

const MANUAL: &str = "\\input texinfo
@c %**start of header
@setfilename demo.info
@c %**end of header

@node Intro
@chapter Introduction
Some text.

@node Details
@section Details
@table @asis
@item x
@end table

@subsection Deep
text

@node Next
@chapter Next
tail
@bye";

fn assert_strictly_nested(node: &OutlineNode) {
    for child in &node.children {
        assert!(
            node.start < child.start && child.end <= node.end,
            "{} [{}-{}] does not contain {} [{}-{}]",
            node.label,
            node.start,
            node.end,
            child.label,
            child.start,
            child.end
        );
        assert_strictly_nested(child);
    }
}

#[test]
fn renders_manual_outline() {
    let mut context = DocumentContext::new(MANUAL);
    insta::assert_snapshot!(render_tree(context.outline()), @r"
    @chapter Introduction [6-17]
      @section Details [10-17]
        @table [11-13]
        @subsection Deep [15-17]
    @chapter Next [19-21]
    ");
}

#[test]
fn children_lie_inside_their_parent() {
    let mut context = DocumentContext::new(MANUAL);
    for root in context.outline() {
        assert_strictly_nested(root);
    }
}

#[test]
fn outline_has_no_comment_or_header_entries() {
    let mut context = DocumentContext::new(MANUAL);
    let kinds: Vec<RangeKind> = context
        .outline()
        .iter()
        .flat_map(|root| root.walk().map(|(_, node)| node.kind))
        .collect();
    assert_eq!(kinds.len(), 5);
    assert!(kinds.iter().all(|kind| kind.is_structural()));
}

#[test]
fn siblings_are_in_document_order() {
    let mut context = DocumentContext::new(MANUAL);
    let starts: Vec<usize> = context.outline().iter().map(|node| node.start).collect();
    assert_eq!(starts, vec![6, 19]);
}
