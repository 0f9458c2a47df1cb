use crate::error::ConvertError;
use crate::makeinfo::Converter;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum PublishArtifact {
    InMemory(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub artifact: PublishArtifact,
    /// makeinfo's messages, warnings included.
    pub log: String,
}

/// Render `input` to HTML, writing it to `output` when given.
pub fn publish_html(
    converter: &Converter,
    input: &Path,
    output: Option<&Path>,
) -> Result<PublishResult, ConvertError> {
    let conversion = converter.to_html(input)?;
    let Some(html) = conversion.html else {
        return Err(ConvertError::Rejected {
            log: conversion.log,
        });
    };
    let artifact = match output {
        Some(path) => {
            fs::write(path, html)?;
            PublishArtifact::File(path.to_path_buf())
        }
        None => PublishArtifact::InMemory(html),
    };
    Ok(PublishResult {
        artifact,
        log: conversion.log,
    })
}
