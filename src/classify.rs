//! Line classifier
//!
//!     Stateless prefix tests over the text of a single line. Every function expects the line
//!     to already start with the `@` sigil (after leading whitespace is removed); the scanner
//!     checks that before calling in here.
//!
//!     Recognised shapes:
//!
//!         @c ...            / @comment ...        comment line
//!         @c %**...         / @comment %**...     header delimiter
//!         @end NAME                               block end
//!         @node NAME                              node marker
//!         @chapter TITLE (and friends)            sectioning heading
//!         @bye                                    end of document
//!
//!     Nothing here expands macros or joins continuation lines. Matching is purely on the
//!     literal text of the row.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Keyword of the block whose contents suppress nested block detection.
pub const VERBATIM: &str = "verbatim";

/// Marker that follows the comment command on both lines bracketing the document header.
pub const HEADER_MARKER: &str = "%**";

const END_PREFIX: &str = "@end ";
const TERMINATOR: &str = "@bye";

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^@(?:(node)",
        r"|(subsection|unnumberedsubsec|appendixsubsec|subheading)",
        r"|(section|unnumberedsec|appendixsec|heading)",
        r"|(chapter|unnumbered|appendix|majorheading|chapheading)) (.*)$",
    ))
    .expect("heading pattern is valid")
});

/// What a comment line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// An ordinary `@c` / `@comment` line.
    Line,
    /// A `@c %**` line opening or closing the header region.
    HeaderDelimiter,
}

/// Which family a sectioning keyword belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    Node,
    Subsection,
    Section,
    Chapter,
}

/// A matched `@node` or sectioning line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: HeadingLevel,
    pub keyword: &'a str,
    pub title: &'a str,
}

/// Classify a comment line, accepting both the abbreviated and the full spelling.
pub fn comment_kind(text: &str) -> Option<CommentKind> {
    let rest = text
        .strip_prefix("@c ")
        .or_else(|| text.strip_prefix("@comment "))?;
    if rest.starts_with(HEADER_MARKER) {
        Some(CommentKind::HeaderDelimiter)
    } else {
        Some(CommentKind::Line)
    }
}

pub fn is_comment_opener(text: &str) -> bool {
    comment_kind(text).is_some()
}

pub fn is_header_delimiter(text: &str) -> bool {
    comment_kind(text) == Some(CommentKind::HeaderDelimiter)
}

/// Name of the block closed by an `@end NAME` line.
pub fn block_end(text: &str) -> Option<&str> {
    text.strip_prefix(END_PREFIX).map(str::trim_end)
}

/// Match a `@node` or sectioning line and capture its title.
pub fn match_heading(text: &str) -> Option<Heading<'_>> {
    let captures = HEADING.captures(text)?;
    let (level, keyword) = [
        HeadingLevel::Node,
        HeadingLevel::Subsection,
        HeadingLevel::Section,
        HeadingLevel::Chapter,
    ]
    .into_iter()
    .enumerate()
    .find_map(|(idx, level)| captures.get(idx + 1).map(|m| (level, m.as_str())))?;
    let title = captures.get(5).map_or("", |m| m.as_str());
    Some(Heading {
        level,
        keyword,
        title,
    })
}

/// Whether `text` is the opening line of a block named `name`.
///
/// The command after the sigil, cut to one character longer than `name` and trimmed, has to
/// equal `name`: `@table @asis` opens `table`, `@tablex` does not.
pub fn opens_block(text: &str, name: &str) -> bool {
    let width = name.chars().count() + 1;
    let head: String = text.chars().skip(1).take(width).collect();
    head.trim() == name
}

/// Whether the line ends the document.
pub fn is_terminator(text: &str) -> bool {
    text == TERMINATOR
}
