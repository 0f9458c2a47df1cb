//! # texinfo
//!
//! Structural view of Texinfo documents for editors: foldable ranges, a nested outline and the
//! `@node` lines of a document, recovered from line prefixes alone.
//!
//! The crate is not a Texinfo parser. It never expands macros, parses arguments or validates
//! nesting; malformed documents still yield a best-effort result.
//!
//! ## Layout
//!
//!     - [`classify`]: pure predicates over a single line.
//!     - [`scanner`]: one backward pass producing [`FoldRange`]s and [`NodeMarker`]s.
//!     - [`cache`]: keeps the last scan across edits that cannot change structure.
//!     - [`outline`]: rebuilds the range tree for document symbols.
//!     - [`context`]: per-document state and the [`DocumentRegistry`] that owns it.
//!     - [`document`]: line access, host positions and text edits.
//!
//! ## Example
//!
//! ```rust,ignore
//! use texinfo::{DocumentContext, render_tree};
//!
//! let mut doc = DocumentContext::new("@chapter One\ntext\n@chapter Two\n");
//! for range in doc.ranges() {
//!     println!("{:?} {}-{}", range.kind, range.start, range.end);
//! }
//! println!("{}", render_tree(doc.outline()));
//! ```

pub mod cache;
pub mod classify;
pub mod context;
pub mod document;
pub mod outline;
pub mod range;
pub mod scanner;

pub use cache::RangeCache;
pub use context::{DocumentContext, DocumentId, DocumentRegistry};
pub use document::{EditRange, EndOfLine, LineSource, Position, TextDocument, TextEdit};
pub use outline::{build_outline, render_tree, OutlineNode};
pub use range::{FoldRange, NodeMarker, RangeKind, ScanResult};
pub use scanner::{folding_ranges, scan};
