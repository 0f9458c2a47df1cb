//! Editor features derived from the structural scan of a Texinfo document.
//!
//! Everything here is protocol-agnostic apart from reusing `lsp-types` enums for item kinds
//! and severities; the language server maps the results onto LSP payloads.

pub mod code_lens;
pub mod completion;
pub mod diagnostics;
pub mod node_anchor;
