use lsp_types::{CompletionItem, Documentation, InsertTextFormat, MarkupContent, MarkupKind};
use texinfo_analysis::completion::CompletionCandidate;

pub fn to_completion_item(candidate: &CompletionCandidate) -> CompletionItem {
    let insert_text_format = if candidate.is_snippet() {
        InsertTextFormat::SNIPPET
    } else {
        InsertTextFormat::PLAIN_TEXT
    };
    CompletionItem {
        label: candidate.label.clone(),
        kind: Some(candidate.kind),
        detail: Some(candidate.detail.clone()),
        documentation: candidate.documentation.as_ref().map(|value| {
            Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: value.clone(),
            })
        }),
        sort_text: Some(candidate.sort_text.clone()),
        filter_text: Some(candidate.filter_text.clone()),
        insert_text: Some(candidate.insert_text.clone()),
        insert_text_format: Some(insert_text_format),
        ..CompletionItem::default()
    }
}
