//! Shared configuration loader for the Texinfo toolchain.
//!
//! `defaults/texinfo.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files (or, for the
//! language server, the client's settings payload) on top of those defaults via [`Loader`]
//! before deserializing into [`TexinfoConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/texinfo.default.toml");

/// File name looked up in the working directory by the CLI.
pub const PROJECT_CONFIG_FILE: &str = "texinfo.toml";

/// Top-level configuration consumed by Texinfo applications.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TexinfoConfig {
    pub makeinfo: MakeinfoConfig,
    pub preview: PreviewConfig,
    pub completion: CompletionConfig,
    pub code_lens: CodeLensConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MakeinfoConfig {
    /// Program name or path of `makeinfo`.
    pub path: String,
}

/// Knobs forwarded to makeinfo when rendering HTML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreviewConfig {
    pub no_headers: bool,
    pub max_size_mib: u64,
    pub error_limit: u32,
    pub no_validation: bool,
    pub no_warnings: bool,
    pub no_number_sections: bool,
    pub include_paths: Vec<String>,
    pub variables: Vec<String>,
    /// Stylesheet path or URL, embedded or referenced depending on its scheme.
    #[serde(default)]
    pub custom_css: Option<String>,
    #[serde(default)]
    pub init_file: Option<String>,
}

impl PreviewConfig {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mib.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CompletionConfig {
    pub enable_snippets: bool,
    pub hide_snippet_commands: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CodeLensConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DiagnosticsConfig {
    pub on_save: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a JSON document with the same shape as the TOML files.
    ///
    /// Used for settings pushed by an editor client.
    pub fn with_json_str(mut self, json: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(json, FileFormat::Json));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TexinfoConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TexinfoConfig, ConfigError> {
    Loader::new().build()
}
