use texinfo::TextDocument;

pub(crate) const SAMPLE: &str = r"\input texinfo
@c %**start of header
@setfilename sample.info
@settitle Sample Manual
@c %**end of header

@node Top
@top Sample Manual

@c A comment run
@c spanning two lines

@node Overview
@chapter Overview
@example
code
@end example

@section Details
Text.
@bye";

pub(crate) fn sample_document() -> TextDocument {
    TextDocument::new(SAMPLE)
}
