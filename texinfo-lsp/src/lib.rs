//! Language Server Protocol (LSP) implementation for Texinfo
//!
//!     Editor support for Texinfo manuals: folding, an outline, `@command` completion, node
//!     lenses and makeinfo diagnostics, served over stdin/stdout by the `texinfo-lsp` binary.
//!
//! Feature Set
//!
//!     1. Folding Ranges (textDocument/foldingRange):
//!         - Blocks (`@example` … `@end example`), chapters, sections and subsections
//!         - Runs of `@c` comments (kind `comment`)
//!         - The `@c %**start of header` region (kind `region`)
//!
//!     2. Document Symbols (textDocument/documentSymbol):
//!         - Sectioning commands and blocks as a nested outline
//!
//!     3. Code Lens (textDocument/codeLens):
//!         - "Goto node in preview" on every `@node` line
//!
//!     4. Completion (textDocument/completion):
//!         - `@command` names and snippets, triggered by `@`
//!
//!     5. Diagnostics (textDocument/publishDiagnostics):
//!         - makeinfo errors and warnings, refreshed on save
//!
//!     6. Commands (workspace/executeCommand):
//!         - `texinfo.preview.goto`: HTML anchor of a node
//!         - `texinfo.preview.render`: HTML rendering of a document
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC transport, capability negotiation, request routing
//!
//!     Server Layer (this crate):
//!         - Implements the LanguageServer trait
//!         - Owns the document registry and the configuration
//!         - Keeps the folding cache in step with incremental edits
//!         - Thin tests asserting the feature layer is called with the right input
//!
//!     Feature Layer (`features`, `texinfo-analysis`):
//!         - Stateless mapping of scan results onto protocol types
//!         - All logic and dense unit tests
//!
//! Caching
//!
//!     Every open document keeps its last scan. Edits that span lines or insert line breaks drop
//!     it; edits within a single line keep it until the next save. Folding, symbols and lenses
//!     all read from the same scan.
//!
//! Configuration
//!
//!     Settings follow `texinfo-config`'s layout and may arrive as initialization options or
//!     through workspace/didChangeConfiguration, optionally nested under a `texinfo` key.
//!     Invalid payloads are logged and ignored.
//!
//! Usage
//!
//!     Library:
//!         ```rust
//!         use texinfo_lsp::TexinfoLanguageServer;
//!         use tower_lsp::{LspService, Server};
//!
//!         #[tokio::main]
//!         async fn main() {
//!             let config = texinfo_config::load_defaults().unwrap();
//!             let stdin = tokio::io::stdin();
//!             let stdout = tokio::io::stdout();
//!
//!             let (service, socket) =
//!                 LspService::new(|client| TexinfoLanguageServer::new(client, config));
//!             Server::new(stdin, stdout, socket).serve(service).await;
//!         }
//!         ```
//!
//!     Binary:
//!         $ texinfo-lsp
//!         Starts the language server on stdin/stdout. Set RUST_LOG=debug for verbose logs
//!         on stderr.

pub mod features;
pub mod server;

pub use server::{DefaultFeatureProvider, FeatureProvider, LspClient, TexinfoLanguageServer};
