// Shared with build.rs, which generates shell completions from the same definition.

use clap::{Arg, ArgAction, Command, ValueHint};

pub const OUTPUT_FORMATS: [&str; 3] = ["text", "json", "yaml"];

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the Texinfo file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(OUTPUT_FORMATS)
        .default_value("text")
}

pub fn build_cli() -> Command {
    Command::new("texi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect the structure of Texinfo manuals and preview them through makeinfo")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults and ./texinfo.toml")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log more (-v info, -vv debug); RUST_LOG takes precedence")
                .action(ArgAction::Count),
        )
        .subcommand(
            Command::new("folding")
                .about("Print the folding ranges (0-based lines)")
                .arg(path_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("outline")
                .about("Print the nesting of sections and blocks")
                .arg(path_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("nodes")
                .about("Print every @node with its HTML anchor")
                .arg(path_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("preview")
                .about("Render the manual to a single HTML page with makeinfo")
                .arg(path_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the HTML to this file instead of stdout")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("lint")
                .about("Report makeinfo errors and warnings; fails when there are errors")
                .arg(path_arg()),
        )
}
