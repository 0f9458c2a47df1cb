pub mod code_lens;
pub mod commands;
pub mod completion;
pub mod diagnostics;
pub mod document_symbols;
pub mod folding_ranges;

#[cfg(test)]
pub(crate) mod test_support;
