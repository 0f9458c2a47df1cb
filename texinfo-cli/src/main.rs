//! Command-line interface for Texinfo manuals
//!
//! Usage:
//!   texi folding `<path>` [--format text|json|yaml]   - Folding ranges
//!   texi outline `<path>` [--format text|json|yaml]   - Section and block outline
//!   texi nodes `<path>` [--format text|json|yaml]     - Nodes and their HTML anchors
//!   texi preview `<path>` [-o `<file>`]                 - HTML rendering through makeinfo
//!   texi lint `<path>`                                - makeinfo diagnostics
//!
//! Every subcommand accepts `--config <file>` and `-v`. Line numbers in structural output are
//! 0-based; lint messages use makeinfo's 1-based `path:line:` form.

mod cli;

use clap::ArgMatches;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use texinfo::{build_outline, scan, FoldRange, LineSource, RangeKind, TextDocument};
use texinfo_analysis::code_lens::node_lenses;
use texinfo_analysis::diagnostics::parse_makeinfo_log;
use texinfo_babel::{publish_html, ConvertError, Converter, PublishArtifact};
use texinfo_config::{ConfigError, Loader, TexinfoConfig, PROJECT_CONFIG_FILE};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as log_fmt, EnvFilter, Layer};

#[derive(Debug)]
enum CliError {
    Read { path: PathBuf, source: std::io::Error },
    Config(ConfigError),
    Convert(ConvertError),
    Serialize(String),
    LintFailed { errors: usize },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Read { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            CliError::Config(err) => write!(f, "invalid configuration: {err}"),
            CliError::Convert(err) => write!(f, "{err}"),
            CliError::Serialize(msg) => write!(f, "cannot format output: {msg}"),
            CliError::LintFailed { errors } => write!(f, "makeinfo reported {errors} error(s)"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Read { source, .. } => Some(source),
            CliError::Config(err) => Some(err),
            CliError::Convert(err) => Some(err),
            CliError::Serialize(_) | CliError::LintFailed { .. } => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}

impl From<ConvertError> for CliError {
    fn from(err: ConvertError) -> Self {
        CliError::Convert(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    fn from_matches(matches: &ArgMatches) -> Self {
        match matches.get_one::<String>("format").map(String::as_str) {
            Some("json") => OutputFormat::Json,
            Some("yaml") => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        }
    }
}

#[derive(Debug, Serialize)]
struct NodeEntry {
    line: usize,
    name: String,
    anchor: String,
}

fn main() {
    let matches = cli::build_cli().get_matches();
    let Some((command, sub_matches)) = matches.subcommand() else {
        return;
    };
    init_tracing(sub_matches.get_count("verbose"));

    if let Err(err) = run(command, sub_matches) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Log to stderr, at `warn` unless raised by `-v` or overridden by `RUST_LOG`.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let layer = log_fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).init();
}

fn run(command: &str, matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches.get_one::<String>("config").map(String::as_str))?;
    let path = matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_default();

    match command {
        "folding" => handle_folding(&path, OutputFormat::from_matches(matches)),
        "outline" => handle_outline(&path, OutputFormat::from_matches(matches)),
        "nodes" => handle_nodes(&path, OutputFormat::from_matches(matches)),
        "preview" => {
            let output = matches.get_one::<String>("output").map(PathBuf::from);
            handle_preview(&config, &path, output.as_deref())
        }
        "lint" => handle_lint(&config, &path),
        other => unreachable!("unknown subcommand {other}"),
    }
}

/// Defaults, then `./texinfo.toml` when present, then `--config`.
fn load_config(explicit: Option<&str>) -> Result<TexinfoConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }
    Ok(loader.build()?)
}

fn read_document(path: &Path) -> Result<TextDocument, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TextDocument::new(text))
}

fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce() -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|err| CliError::Serialize(err.to_string()))
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|err| CliError::Serialize(err.to_string()))
        }
    }
}

fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}

fn kind_label(kind: RangeKind) -> &'static str {
    match kind {
        RangeKind::Block => "block",
        RangeKind::Section => "section",
        RangeKind::Comment => "comment",
        RangeKind::HeaderRegion => "header",
    }
}

fn describe_range(range: &FoldRange) -> String {
    let mut line = format!("{}-{} {}", range.start, range.end, kind_label(range.kind));
    if !range.name.is_empty() {
        line.push_str(&format!(" @{}", range.name));
    }
    if !range.detail.is_empty() {
        line.push(' ');
        line.push_str(&range.detail);
    }
    line
}

fn handle_folding(path: &Path, format: OutputFormat) -> Result<(), CliError> {
    let document = read_document(path)?;
    let ranges = scan(&document).sorted_ranges();
    let output = render(ranges.as_slice(), format, || {
        ranges
            .iter()
            .map(describe_range)
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    print_output(&output);
    Ok(())
}

fn handle_outline(path: &Path, format: OutputFormat) -> Result<(), CliError> {
    let document = read_document(path)?;
    let outline = build_outline(&scan(&document).ranges, document.line_count());
    let output = render(outline.as_slice(), format, || texinfo::render_tree(&outline))?;
    print_output(&output);
    Ok(())
}

fn handle_nodes(path: &Path, format: OutputFormat) -> Result<(), CliError> {
    let document = read_document(path)?;
    let entries: Vec<NodeEntry> = node_lenses(&scan(&document).nodes)
        .into_iter()
        .map(|lens| NodeEntry {
            line: lens.line,
            name: lens.node_name,
            anchor: lens.anchor,
        })
        .collect();
    let output = render(entries.as_slice(), format, || {
        entries
            .iter()
            .map(|entry| format!("{} {} #{}", entry.line, entry.name, entry.anchor))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    print_output(&output);
    Ok(())
}

fn handle_preview(
    config: &TexinfoConfig,
    path: &Path,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let converter = Converter::from_config(config);
    let result = publish_html(&converter, path, output)?;
    if !result.log.is_empty() {
        eprint!("{}", result.log);
    }
    match result.artifact {
        PublishArtifact::InMemory(html) => print_output(&html),
        PublishArtifact::File(file) => tracing::info!(path = %file.display(), "wrote preview"),
    }
    Ok(())
}

fn handle_lint(config: &TexinfoConfig, path: &Path) -> Result<(), CliError> {
    let converter = Converter::from_config(config);
    let conversion = converter.to_html(path)?;
    let file_path = path.to_string_lossy();
    let diagnostics = parse_makeinfo_log(&conversion.log, &file_path);

    let mut errors = 0;
    for diagnostic in &diagnostics {
        if diagnostic.is_error() {
            errors += 1;
        }
        println!("{}:{}: {}", file_path, diagnostic.line + 1, diagnostic.message);
    }
    if conversion.html.is_none() && errors == 0 {
        // makeinfo failed without a message about this file.
        eprint!("{}", conversion.log);
        errors = 1;
    }
    if errors > 0 {
        return Err(CliError::LintFailed { errors });
    }
    Ok(())
}
