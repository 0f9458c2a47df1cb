//! Per-document state and the registry that owns it
//!
//!     A [`DocumentContext`] pairs a document's text with its [`RangeCache`]. Contexts live in a
//!     [`DocumentRegistry`] keyed by [`DocumentId`]; the adapter layer (language server, CLI)
//!     creates one when a document opens and destroys it when the document closes. Nothing in
//!     the core creates or destroys contexts on its own.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::cache::RangeCache;
use crate::document::{EndOfLine, LineSource, TextDocument, TextEdit};
use crate::outline::OutlineNode;
use crate::range::{FoldRange, NodeMarker};

/// Stable identity of an open document, e.g. its URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug)]
pub struct DocumentContext {
    document: TextDocument,
    cache: RangeCache,
}

impl DocumentContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_document(TextDocument::new(text))
    }

    pub fn with_eol(text: impl Into<String>, eol: EndOfLine) -> Self {
        Self::from_document(TextDocument::with_eol(text, eol))
    }

    pub fn from_document(document: TextDocument) -> Self {
        Self {
            document,
            cache: RangeCache::new(),
        }
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn line_count(&self) -> usize {
        self.document.line_count()
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_cached()
    }

    pub fn ranges(&mut self) -> &[FoldRange] {
        self.cache.ranges(&self.document)
    }

    pub fn nodes(&mut self) -> &[NodeMarker] {
        self.cache.nodes(&self.document)
    }

    pub fn outline(&mut self) -> &[OutlineNode] {
        self.cache.outline(&self.document)
    }

    /// Apply a batch of edits to the text, then run the cache policy over them.
    ///
    /// Returns whether the cached ranges (and the outline) were dropped.
    pub fn apply_edits(&mut self, edits: &[TextEdit]) -> bool {
        for edit in edits {
            self.document.apply_edit(edit);
        }
        self.cache.invalidate_on_edit(edits, self.document.eol())
    }

    /// Replace the whole text. Always forces a rescan.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.document.set_text(text);
        self.cache.invalidate();
    }

    pub fn on_save(&mut self) -> bool {
        self.cache.on_save()
    }
}

/// Open documents, keyed by id.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: HashMap<DocumentId, DocumentContext>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document, replacing any previous context under the same id.
    pub fn create(&mut self, id: DocumentId, text: impl Into<String>) -> &mut DocumentContext {
        tracing::debug!(document = %id, "opening document context");
        let context = DocumentContext::new(text);
        match self.documents.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(context);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(context),
        }
    }

    pub fn get(&self, id: &DocumentId) -> Option<&DocumentContext> {
        self.documents.get(id)
    }

    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut DocumentContext> {
        self.documents.get_mut(id)
    }

    /// Drop a document's context. Returns whether one existed.
    pub fn destroy(&mut self, id: &DocumentId) -> bool {
        tracing::debug!(document = %id, "closing document context");
        self.documents.remove(id).is_some()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.documents.keys()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}
