use lsp_types::{DocumentSymbol, Position, Range, SymbolKind};
use texinfo::{LineSource, OutlineNode, TextDocument};

/// Nested symbols for the document outline.
///
/// A symbol spans from the start of its first line to the end of its last line; the selection
/// is the heading or block-opening line itself.
pub fn document_symbols(outline: &[OutlineNode], document: &TextDocument) -> Vec<DocumentSymbol> {
    outline
        .iter()
        .map(|node| to_document_symbol(node, document))
        .collect()
}

#[allow(deprecated)]
fn to_document_symbol(node: &OutlineNode, document: &TextDocument) -> DocumentSymbol {
    let children: Vec<DocumentSymbol> = node
        .children
        .iter()
        .map(|child| to_document_symbol(child, document))
        .collect();
    DocumentSymbol {
        name: node.label.clone(),
        detail: Some(node.detail.clone()).filter(|detail| !detail.is_empty()),
        kind: SymbolKind::STRING,
        tags: None,
        deprecated: None,
        range: line_span(document, node.start, node.end),
        selection_range: line_span(document, node.start, node.start),
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
    }
}

fn line_span(document: &TextDocument, start: usize, end: usize) -> Range {
    Range {
        start: Position::new(start as u32, 0),
        end: Position::new(end as u32, line_width(document, end)),
    }
}

/// Width of a line in UTF-16 code units; zero past the end of the document.
pub(crate) fn line_width(document: &TextDocument, line: usize) -> u32 {
    if line >= document.line_count() {
        return 0;
    }
    document.line_at(line).encode_utf16().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::sample_document;
    use texinfo::{build_outline, scan};

    fn sample_symbols() -> Vec<DocumentSymbol> {
        let document = sample_document();
        let outline = build_outline(&scan(&document).ranges, document.line_count());
        document_symbols(&outline, &document)
    }

    #[test]
    fn chapter_contains_block_and_section() {
        let symbols = sample_symbols();
        assert_eq!(symbols.len(), 1);
        let chapter = &symbols[0];
        assert_eq!(chapter.name, "@chapter");
        assert_eq!(chapter.detail.as_deref(), Some("Overview"));
        assert_eq!(chapter.kind, SymbolKind::STRING);
        assert_eq!(chapter.range.start, Position::new(13, 0));
        assert_eq!(chapter.range.end, Position::new(20, 4));
        assert_eq!(chapter.selection_range.end, Position::new(13, 17));

        let children = chapter.children.as_ref().expect("children");
        let names: Vec<&str> = children.iter().map(|child| child.name.as_str()).collect();
        assert_eq!(names, vec!["@example", "@section"]);
        assert_eq!(children[0].detail, None);
        assert!(children[0].children.is_none());
        assert_eq!(children[1].detail.as_deref(), Some("Details"));
    }

    #[test]
    fn width_past_the_end_is_zero() {
        let document = TextDocument::new("@bye");
        assert_eq!(line_width(&document, 0), 4);
        assert_eq!(line_width(&document, 3), 0);
    }
}
