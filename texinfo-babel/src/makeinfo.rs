//! HTML conversion through the external `makeinfo` program
//!
//!     makeinfo writes the HTML to standard output (`-o-`) and its messages to standard error.
//!     Messages are forced to English (`LC_MESSAGES=en_US`) so the diagnostics parser can rely
//!     on their wording.

use crate::error::ConvertError;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use texinfo_config::TexinfoConfig;
use url::Url;

#[cfg(windows)]
const INCLUDE_PATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const INCLUDE_PATH_SEPARATOR: &str = ":";

/// Everything that shapes a makeinfo invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeinfoOptions {
    pub program: String,
    pub no_headers: bool,
    pub max_size_bytes: u64,
    pub error_limit: u32,
    pub no_validation: bool,
    pub no_warnings: bool,
    pub no_number_sections: bool,
    pub include_paths: Vec<String>,
    pub variables: Vec<String>,
    pub custom_css: Option<String>,
    pub init_file: Option<String>,
}

impl MakeinfoOptions {
    pub fn from_config(config: &TexinfoConfig) -> Self {
        let preview = &config.preview;
        Self {
            program: config.makeinfo.path.clone(),
            no_headers: preview.no_headers,
            max_size_bytes: preview.max_size_bytes(),
            error_limit: preview.error_limit,
            no_validation: preview.no_validation,
            no_warnings: preview.no_warnings,
            no_number_sections: preview.no_number_sections,
            include_paths: preview.include_paths.clone(),
            variables: preview.variables.clone(),
            custom_css: preview.custom_css.clone(),
            init_file: preview.init_file.clone(),
        }
    }
}

/// Outcome of a conversion that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Rendered document; `None` when makeinfo exited unsuccessfully.
    pub html: Option<String>,
    /// Everything makeinfo reported on standard error.
    pub log: String,
}

#[derive(Debug, Clone)]
pub struct Converter {
    options: MakeinfoOptions,
}

impl Converter {
    pub fn new(options: MakeinfoOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &TexinfoConfig) -> Self {
        Self::new(MakeinfoOptions::from_config(config))
    }

    pub fn options(&self) -> &MakeinfoOptions {
        &self.options
    }

    /// Command-line options for an HTML conversion, without the input file.
    pub fn html_options(&self) -> Vec<String> {
        let options = &self.options;
        let mut args = vec![
            "-o-".to_string(),
            "--no-split".to_string(),
            "--html".to_string(),
            format!("--error-limit={}", options.error_limit),
        ];
        if let Some(init_file) = options.init_file.as_deref().filter(|f| !f.is_empty()) {
            args.push(format!("--init-file={init_file}"));
        }
        if options.no_headers {
            args.push("--no-headers".to_string());
        }
        if options.no_number_sections {
            args.push("--no-number-sections".to_string());
        }
        if options.no_validation {
            args.push("--no-validate".to_string());
        }
        if options.no_warnings {
            args.push("--no-warn".to_string());
        }
        if !options.include_paths.is_empty() {
            args.push("-I".to_string());
            args.push(options.include_paths.join(INCLUDE_PATH_SEPARATOR));
        }
        for variable in &options.variables {
            args.push("-D".to_string());
            args.push(variable.clone());
        }
        if let Some(css) = options.custom_css.as_deref().filter(|css| !css.is_empty()) {
            args.extend(css_option(css));
        }
        args
    }

    /// Run makeinfo on `input` and collect its HTML output.
    pub fn to_html(&self, input: &Path) -> Result<Conversion, ConvertError> {
        let program =
            which::which(&self.options.program).map_err(|source| ConvertError::ProgramNotFound {
                program: self.options.program.clone(),
                source,
            })?;
        tracing::debug!(program = %program.display(), input = %input.display(), "running makeinfo");

        let mut child = Command::new(&program)
            .args(self.html_options())
            .arg(input)
            .env("LC_MESSAGES", "en_US")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ConvertError::Spawn)?;

        let stderr = child.stderr.take();
        let log_reader = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_end(&mut buf);
            }
            buf
        });

        // One byte past the limit is enough to know it was exceeded.
        let limit = self.options.max_size_bytes;
        let mut stdout = Vec::new();
        if let Some(out) = child.stdout.take() {
            if let Err(err) = out.take(limit.saturating_add(1)).read_to_end(&mut stdout) {
                stop(&mut child);
                return Err(ConvertError::Spawn(err));
            }
        }
        if stdout.len() as u64 > limit {
            tracing::warn!(limit, "makeinfo output too large");
            stop(&mut child);
            return Err(ConvertError::OutputTooLarge { limit });
        }

        let status = child.wait().map_err(ConvertError::Spawn)?;
        let stderr = log_reader.join().unwrap_or_default();
        let log = String::from_utf8_lossy(&stderr).into_owned();
        if !status.success() {
            tracing::debug!(%status, "makeinfo failed");
            let log = if log.trim().is_empty() {
                format!("makeinfo {}", status)
            } else {
                log
            };
            return Ok(Conversion { html: None, log });
        }
        Ok(Conversion {
            html: Some(String::from_utf8_lossy(&stdout).into_owned()),
            log,
        })
    }
}

fn stop(child: &mut Child) {
    if let Err(err) = child.kill() {
        tracing::debug!(error = %err, "makeinfo already exited");
    }
    let _ = child.wait();
}

/// `--css-include` for local stylesheets, `--css-ref` for remote ones.
fn css_option(css: &str) -> Option<String> {
    match Url::parse(css) {
        // A drive letter, not a scheme.
        Ok(url) if url.scheme().len() == 1 => Some(format!("--css-include={css}")),
        Ok(url) => match url.scheme() {
            "file" => match url.to_file_path() {
                Ok(path) => Some(format!("--css-include={}", path.display())),
                Err(()) => {
                    tracing::warn!(css, "cannot load custom CSS, invalid file URI");
                    None
                }
            },
            "http" | "https" => Some(format!("--css-ref={url}")),
            scheme => {
                tracing::warn!(css, scheme, "cannot load custom CSS, unsupported URI scheme");
                None
            }
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => Some(format!("--css-include={css}")),
        Err(err) => {
            tracing::warn!(css, error = %err, "cannot load custom CSS, invalid URI");
            None
        }
    }
}
