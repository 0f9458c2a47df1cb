//! `@command` completion
//!
//! The catalog pairs most commands with a snippet form. Plain entries insert the bare command
//! name (plus `{}` for glyph commands); snippet entries insert a template with tab stops for
//! the arguments and, for blocks, the matching `@end` line. Which of the two forms are offered
//! is decided by [`CompletionConfig`].

use lsp_types::CompletionItemKind;
use once_cell::sync::Lazy;
use texinfo_config::CompletionConfig;

/// Describes a completion candidate that can be translated into protocol specific items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CompletionItemKind,
    pub detail: String,
    /// Markdown shown next to snippet entries.
    pub documentation: Option<String>,
    pub sort_text: String,
    pub filter_text: String,
    pub insert_text: String,
    /// A plain command that also has a snippet entry.
    pub has_snippet: bool,
}

impl CompletionCandidate {
    pub fn is_snippet(&self) -> bool {
        self.kind == CompletionItemKind::SNIPPET
    }
}

/// How completion was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTrigger {
    /// The user typed `@`.
    Character,
    /// Explicit invocation, possibly in the middle of a word.
    Invoked,
}

/// Candidates for a cursor on `line_text` at UTF-16 column `character`.
pub fn completion_items(
    line_text: &str,
    character: usize,
    trigger: CompletionTrigger,
    config: &CompletionConfig,
) -> Vec<CompletionCandidate> {
    if line_text.starts_with("@c ") || line_text.starts_with("@comment ") {
        return Vec::new();
    }
    let chars: Vec<char> = line_text.chars().collect();
    let mut column = char_column(&chars, character);

    if trigger == CompletionTrigger::Invoked {
        let Some(word_start) = word_start_at(&chars, column) else {
            return Vec::new();
        };
        column = word_start;
        if column == 0 || chars[column - 1] != '@' {
            return Vec::new();
        }
    }

    match column {
        0 => Vec::new(),
        1 => filtered_catalog(config),
        // `@@` is an escaped sigil, not a command.
        _ if chars.get(column - 2) == Some(&'@') => Vec::new(),
        _ => filtered_catalog(config),
    }
}

/// The catalog as configured, without any cursor context.
pub fn filtered_catalog(config: &CompletionConfig) -> Vec<CompletionCandidate> {
    CATALOG
        .iter()
        .filter(|candidate| {
            if !config.enable_snippets {
                return candidate.kind == CompletionItemKind::FUNCTION;
            }
            !config.hide_snippet_commands || !candidate.has_snippet
        })
        .cloned()
        .collect()
}

/// Convert a UTF-16 column into an index into `chars`, clamped to the line.
fn char_column(chars: &[char], character: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in chars.iter().enumerate() {
        if units >= character {
            return idx;
        }
        units += ch.len_utf16();
    }
    chars.len()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Start of the word touching `column`, if any.
fn word_start_at(chars: &[char], column: usize) -> Option<usize> {
    let inside = chars.get(column).copied().is_some_and(is_word_char);
    let after = column > 0 && is_word_char(chars[column - 1]);
    if !inside && !after {
        return None;
    }
    let mut start = column;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    Some(start)
}

static CATALOG: Lazy<Vec<CompletionCandidate>> = Lazy::new(build_catalog);

fn build_catalog() -> Vec<CompletionCandidate> {
    let mut items = vec![
        command("ampchar", "Insert an ampersand, \"&\"", BRACED),
        command("atchar", "Insert an at sign, \"@\"", BRACED),
        command("backslashchar", "Insert a blackslash, \"\\\"", BRACED),
        command("lbracechar", "Insert a left brace, \"{\"", BRACED),
        command("rbracechar", "Insert a right brace, \"}\"", BRACED),
        snippet(
            "alias",
            "alias",
            "Defines a new command to be just like an existing one",
            0,
            "@alias new=existing",
            "alias ${1:new}=${2:existing}",
        ),
        command(
            "alias",
            "Defines a new command to be just like an existing one",
            WITH_SNIPPET,
        ),
        command("arrow", "Generate a right arrow glyph, \"→\"", BRACED),
        command("asis", "Print the table's first column without highlighting", PLAIN),
        command("bullet", "Generate a large round dot, \"•\"", BRACED),
        command("bye", "Stop formatting", PLAIN),
        snippet(
            "header",
            "c",
            "Declare header block",
            2,
            "@c %**start of header\n\n@c %**end of header",
            "c %**${1:start of header}\n$3\n@c %**${2:end of header}",
        ),
        command("contents", "Print a complete table of contents.", PLAIN),
        command("copyright", "The copyright symbol, \"©\"", BRACED),
        command("dots", "Generate an ellipsis, \"…\"", BRACED),
        command("equiv", "Insert a glyph indicating exact equivalence, \"≡\"", BRACED),
        command("euro", "Generate the Euro currency sign, \"€\"", BRACED),
        command("headitem", "Begin a heading row in a multitable", PLAIN),
        command("indent", "Insert paragraph indentation", PLAIN),
        command("insertcopying", "Insert previously defined @copying text", PLAIN),
        command(
            "item",
            "Indicate the beginning of a marked paragraph, or the beginning of the text of a \
             first column entry for a table",
            PLAIN,
        ),
        command(
            "itemx",
            "Like @item but do not generate extra vertical space above the item text",
            PLAIN,
        ),
        command(
            "noindent",
            "Prevent text from being indented as if it were a new paragraph",
            PLAIN,
        ),
        command("novalidate", "Suppress validation of node references", PLAIN),
        command("page", "Start a new page in a printed manual", PLAIN),
        command("result", "Indicate the result of an expression with \"⇒\"", BRACED),
        command("tab", "Separate columns in a row of a multitable", PLAIN),
        command("TeX", "Generate the TeX logo", BRACED),
        command("today", "Insert the current date", BRACED),
    ];

    items.extend(line_command_enum(
        "allowcodebreaks",
        "Control breaking at \"-\" and \"_\" in TeX",
        &["true", "false"],
    ));
    items.extend(line_command_enum(
        "codequoteundirected",
        "Control output of \"'\" in code examples",
        &["on", "off"],
    ));
    items.extend(line_command_enum(
        "footnotestyle",
        "Specify an Info file's footnote style",
        &["end", "separate"],
    ));
    items.extend(line_command_enum(
        "setchapternewpage",
        "Specify whether chapters start on new pages",
        &["on", "off", "odd"],
    ));
    items.extend(line_command_enum(
        "headings",
        "Turn page headings on or off, and/or specify single or double-sided page headings \
         for printing",
        &["on", "single", "double", "singleafter", "doubleafter", "off"],
    ));

    items.extend(brace_command(
        "abbr",
        "Indicate a general abbreviation",
        1,
        &["abbreviation", "meaning"],
    ));
    items.extend(brace_command(
        "acronym",
        "Indicate an acronym in all capital letters",
        1,
        &["acronym", "meaning"],
    ));
    items.extend(brace_command(
        "anchor",
        "Define current location for use as a cross-reference target",
        1,
        &["name"],
    ));
    items.extend(brace_command("b", "Set text in a bold font", 1, &["text"]));
    items.extend(brace_command("cite", "Highlight the name of a reference", 1, &["reference"]));
    items.extend(brace_command(
        "code",
        "Indicate text which is a piece of code",
        1,
        &["sample-code"],
    ));
    items.extend(brace_command("command", "Indicate a command name", 1, &["command-name"]));
    items.extend(brace_command(
        "dfn",
        "Indicate the introductory or defining use of a term",
        1,
        &["term"],
    ));
    items.extend(brace_command(
        "email",
        "Indicate an electronic mail address",
        1,
        &["address", "displayed-text"],
    ));
    items.extend(brace_command("emph", "Emphasize text", 1, &["text"]));
    items.extend(brace_command(
        "env",
        "Indicate an environment variable name",
        1,
        &["environment-variable"],
    ));
    items.extend(brace_command("file", "Highlight the name of a file", 1, &["filename"]));
    items.extend(brace_command("footnote", "Enter a footnote", 1, &["footnote-text"]));
    items.extend(brace_command("i", "Set text in an italic font", 1, &["text"]));
    items.extend(brace_command(
        "image",
        "Insert an image",
        1,
        &["filename", "width", "height", "alt", "ext"],
    ));
    items.extend(brace_command(
        "inforef",
        "Make a cross-reference to an Info file",
        3,
        &["node-name", "entry-name", "info-file-name"],
    ));
    items.extend(brace_command(
        "kbd",
        "Indicate characters of input to be typed by users",
        1,
        &["keyboard-characters"],
    ));
    items.extend(brace_command(
        "key",
        "Indicate the name of a key on a keyboard",
        1,
        &["key-name"],
    ));
    items.extend(brace_command(
        "math",
        "Format a mathematical expression",
        1,
        &["math-expression"],
    ));
    items.extend(brace_command("option", "Indicate a command-line option", 1, &["option-name"]));
    items.extend(brace_command(
        "pxref",
        "Make a reference that starts with a lowercase \"see\" in a printed manual",
        1,
        &["node", "entry", "node-title", "info-file", "manual"],
    ));
    items.extend(brace_command(
        "ref",
        "Make a plain reference that does not start with any special text",
        1,
        &["node", "entry", "node-title", "info-node", "manual"],
    ));
    items.extend(brace_command(
        "samp",
        "Indicate a literal example of a sequence of characters",
        1,
        &["text"],
    ));
    items.extend(brace_command(
        "strong",
        "Emphasize text by using boldface where possible",
        1,
        &["text"],
    ));
    items.extend(brace_command(
        "uref",
        "Define a cross-reference to an external URL",
        1,
        &["url", "displayed-text", "replacement"],
    ));
    items.extend(brace_command(
        "url",
        "Define a cross-reference to an external URL",
        1,
        &["url", "displayed-text", "replacement"],
    ));
    items.extend(brace_command(
        "value",
        "Insert the value of the Texinfo variable",
        1,
        &["txivar"],
    ));
    items.extend(brace_command(
        "var",
        "Highlight a metasyntactic variable",
        1,
        &["metasyntactic-variable"],
    ));
    items.extend(brace_command("w", "Disallow line breaks within text", 1, &["text"]));
    items.extend(brace_command(
        "xref",
        "Make a reference that starts with \"See\" in a printed manual",
        1,
        &["node", "entry", "node-title", "info-file", "manual"],
    ));

    items.extend(line_command("appendix", "Begin an appendix", &["title"]));
    items.extend(line_command(
        "appendixsec",
        "Begin an appendix section within an appendix",
        &["title"],
    ));
    items.extend(line_command("appendixsubsec", "Begin an appendix subsection", &["title"]));
    items.extend(line_command("author", "Set the names of the author(s)", &["author-name"]));
    items.extend(line_command("c", "Begin a line comment", &["comment"]));
    items.extend(line_command(
        "center",
        "Center the line of text following the command",
        &["text-line"],
    ));
    items.extend(line_command(
        "chapheading",
        "Print an unnumbered chapter-like heading",
        &["title"],
    ));
    items.extend(line_command("chapter", "Begin a numbered chapter", &["title"]));
    items.extend(line_command("cindex", "Add entry to the index of concepts", &["entry"]));
    items.extend(line_command("clear", "Unset flag", &["flag"]));
    items.extend(line_command("comment", "Begin a line comment", &["comment"]));
    items.extend(line_command("documentencoding", "Declare the input encoding", &["enc"]));
    items.extend(line_command(
        "documentlanguage",
        "Declares the current document locale",
        &["ll_CC"],
    ));
    items.extend(line_command("end", "Ends a block command environment", &["environment"]));
    items.extend(line_command("findex", "Add entry to the index of functions", &["entry"]));
    items.extend(line_command("heading", "Print an unnumbered section-like heading", &["title"]));
    items.extend(line_command(
        "include",
        "Read the contents of Texinfo source file",
        &["filename"],
    ));
    items.extend(line_command("kindex", "Add entry to the index of keys", &["entry"]));
    items.extend(line_command(
        "majorheading",
        "Print an unnumbered chapter-like heading",
        &["title"],
    ));
    items.extend(line_command("node", "Begin a new node", &["name"]));
    items.extend(line_command(
        "printindex",
        "Generate the alphabetized index for index name",
        &["index-name"],
    ));
    items.extend(line_command("section", "Begin a section within a chapter", &["title"]));
    items.extend(line_command("set", "Define a Texinfo variable", &["txivar", "value"]));
    items.extend(line_command(
        "setfilename",
        "Provide a name for the output files",
        &["info-file-name"],
    ));
    items.extend(line_command("settitle", "Specify the title for page headers", &["title"]));
    items.extend(line_command(
        "subheading",
        "Print an unnumbered subsection-like heading",
        &["title"],
    ));
    items.extend(line_command("subsection", "Begin a subsection within a section", &["title"]));
    items.extend(line_command(
        "subtitle",
        "Set a subtitle in a normal sized font flush to the right-hand side of the page",
        &["title"],
    ));
    items.extend(line_command(
        "title",
        "Set a title flush to the left-hand side of the page",
        &["title"],
    ));
    items.extend(line_command("top", "Mark the topmost @node in the file", &["title"]));
    items.extend(line_command(
        "unnumbered",
        "Begin a chapter that appears without chapter numbers",
        &["title"],
    ));
    items.extend(line_command(
        "unnumberedsec",
        "Begin a section that appears without section numbers",
        &["title"],
    ));
    items.extend(line_command("unnumberedsubsec", "Begin an unnumbered subsection", &["title"]));
    items.extend(line_command(
        "verbatiminclude",
        "Output the contents of file as is",
        &["filename"],
    ));
    items.extend(line_command("vindex", "Add entry to the index of variables", &["entry"]));

    items.extend(line_command_x(
        "defcv",
        "Format a description for a variable associated with a class",
        &["category", "class", "name"],
    ));
    items.extend(line_command_x(
        "deffn",
        "Format a description for a function",
        &["category", "name", "arguments"],
    ));
    items.extend(line_command_x(
        "defmac",
        "Format a description for a macro",
        &["macroname", "arguments"],
    ));
    items.extend(line_command_x(
        "defopt",
        "Format a description for a user option",
        &["option-name"],
    ));
    items.extend(line_command_x(
        "deftp",
        "Format a description for a data type",
        &["category", "name-of-type", "attributes"],
    ));
    items.extend(line_command_x(
        "deftypefn",
        "Format a description for a function or similar entity that may take arguments and that \
         is typed",
        &["category", "data-type", "name", "arguments"],
    ));
    items.extend(line_command_x(
        "defun",
        "Format a description for a function",
        &["function-name", "arguments"],
    ));
    items.extend(line_command_x(
        "defvar",
        "Format a description for a variable",
        &["variable-name"],
    ));
    items.extend(line_command_x(
        "defvr",
        "Format a description for any kind of variable",
        &["category", "name"],
    ));

    items.extend(block_command(
        "cartouche",
        "Highlight by drawing a box with rounded corners around it",
        &[],
    ));
    items.extend(block_command("copying", "Specify copyright holders and copying conditions", &[]));
    items.extend(block_command(
        "detailmenu",
        "Mark the (optional) detailed node listing in a master menu",
        &[],
    ));
    items.extend(block_command(
        "direntry",
        "Begin the Info directory menu entry for this file",
        &[],
    ));
    items.extend(block_command("display", "Begin a kind of example", &[]));
    items.extend(block_command(
        "enumerate",
        "Begin a numbered list, using @item for each entry",
        &[],
    ));
    items.extend(block_command("example", "Indicate an example", &[]));
    items.extend(block_command("float", "Environment to define floating material", &[]));
    items.extend(block_command("format", "Begin a kind of example, but do not indent", &[]));
    items.extend(block_command(
        "ftable",
        "Begin a two-column table, using @item for each entry",
        &["formatting-command"],
    ));
    items.extend(block_command("group", "Disallow page breaks within following text", &[]));
    items.extend(block_command("html", "Enter HTML completely", &[]));
    items.extend(block_command(
        "ifclear",
        "If the Texinfo variable is not set, format the following text",
        &["txivar"],
    ));
    items.extend(block_command("ifhtml", "Begin text that will appear only in HTML format", &[]));
    items.extend(block_command("ifinfo", "Begin text that will appear only in Info format", &[]));
    items.extend(block_command("ifnottex", "Begin text to be ignored in TeX format", &[]));
    items.extend(block_command(
        "ifset",
        "If the Texinfo variable is set, format the following text",
        &["txivar"],
    ));
    items.extend(block_command("iftex", "Begin text that will appear only in TeX format", &[]));
    items.extend(block_command("ignore", "Begin text that will not appear in any output", &[]));
    items.extend(block_command(
        "itemize",
        "Begin an unordered list",
        &["mark-generating-character-or-command"],
    ));
    items.extend(block_command("lisp", "Begin an example of Lisp code", &[]));
    items.extend(block_command("macro", "Define a new Texinfo command", &["macroname", "params"]));
    items.extend(block_command("menu", "Mark the beginning of a menu of nodes", &[]));
    items.extend(block_command("multitable", "Begin a multi-column table", &["column-width-spec"]));
    items.extend(block_command(
        "quotation",
        "Narrow the margins to indicate text that is quoted from another work",
        &[],
    ));
    items.extend(block_command("smallexample", "Like @example, but use a smaller font size", &[]));
    items.extend(block_command("table", "Begin a two-column table", &["formatting-command"]));
    items.extend(block_command("tex", "Enter TeX completely", &[]));
    items.extend(block_command("titlepage", "Begin the title page", &[]));
    items.extend(block_command(
        "verbatim",
        "Output the text of the environment exactly as is",
        &[],
    ));
    items.extend(block_command("vtable", "Begin a two-column table", &["formatting-command"]));

    items.extend(heading_footing_command(
        "evenfooting",
        "Generate page footers that are the same for even-numbered pages",
    ));
    items.extend(heading_footing_command(
        "evenheading",
        "Generate page headers that are the same for even-numbered pages",
    ));
    items.extend(heading_footing_command(
        "everyfooting",
        "Generate page footers that are the same for every pages",
    ));
    items.extend(heading_footing_command(
        "everyheading",
        "Generate page headers that are the same for every pages",
    ));
    items.extend(heading_footing_command(
        "oddfooting",
        "Generate page footers that are the same for odd-numbered pages",
    ));
    items.extend(heading_footing_command(
        "oddheading",
        "Generate page headers that are the same for odd-numbered pages",
    ));

    items
}

#[derive(Debug, Clone, Copy)]
struct CommandFlags {
    has_snippet: bool,
    empty_brace: bool,
}

const PLAIN: CommandFlags = CommandFlags {
    has_snippet: false,
    empty_brace: false,
};
const BRACED: CommandFlags = CommandFlags {
    has_snippet: false,
    empty_brace: true,
};
const WITH_SNIPPET: CommandFlags = CommandFlags {
    has_snippet: true,
    empty_brace: false,
};

fn command(name: &str, detail: &str, flags: CommandFlags) -> CompletionCandidate {
    let sort_suffix = if flags.has_snippet { "1" } else { "" };
    let braces = if flags.empty_brace { "{}" } else { "" };
    CompletionCandidate {
        label: format!("@{name}"),
        kind: CompletionItemKind::FUNCTION,
        detail: detail.to_string(),
        documentation: None,
        sort_text: format!("{name}{sort_suffix}"),
        filter_text: name.to_string(),
        insert_text: format!("{name}{braces}"),
        has_snippet: flags.has_snippet,
    }
}

fn snippet(
    label: &str,
    keyword: &str,
    detail: &str,
    sort_order: u32,
    documentation: &str,
    insert_text: &str,
) -> CompletionCandidate {
    CompletionCandidate {
        label: label.to_string(),
        kind: CompletionItemKind::SNIPPET,
        detail: detail.to_string(),
        documentation: Some(format!("```texinfo\n{documentation}\n```")),
        sort_text: format!("{keyword}{sort_order}"),
        filter_text: keyword.to_string(),
        insert_text: insert_text.to_string(),
        has_snippet: false,
    }
}

/// `${N:arg}` placeholders numbered from `first`.
fn tab_stops(args: &[&str], first: usize) -> Vec<String> {
    args.iter()
        .enumerate()
        .map(|(idx, arg)| format!("${{{}:{}}}", first + idx, arg))
        .collect()
}

fn block_command(name: &str, detail: &str, args: &[&str]) -> [CompletionCandidate; 2] {
    let header = std::iter::once(name)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    let documentation = format!("@{header}\n\n@end {name}");

    let mut opener = name.to_string();
    if !args.is_empty() {
        opener.push(' ');
        opener.push_str(&tab_stops(args, 1).join(" "));
    }
    let insert_text = format!("{opener}\n${}\n@end {name}", args.len() + 1);
    [
        snippet(name, name, detail, 0, &documentation, &insert_text),
        command(name, detail, WITH_SNIPPET),
    ]
}

/// A `@name{...}` command; arguments past `required` are wrapped in one optional tab stop.
fn brace_command(
    name: &str,
    detail: &str,
    required: usize,
    args: &[&str],
) -> [CompletionCandidate; 2] {
    let required = required.min(args.len());
    let documented: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(idx, arg)| {
            if idx < required {
                arg.to_string()
            } else {
                format!("?{arg}")
            }
        })
        .collect();
    let documentation = format!("@{name}{{{}}}", documented.join(", "));

    let (required_args, optional_args) = args.split_at(required);
    let required_text = tab_stops(required_args, 1).join(", ");
    let optional_text = if optional_args.is_empty() {
        String::new()
    } else {
        format!(
            "${{{}:, {}}}",
            required + 1,
            tab_stops(optional_args, required + 2).join(", ")
        )
    };
    let insert_text = format!("{name}{{{required_text}{optional_text}}}");
    [
        snippet(name, name, detail, 0, &documentation, &insert_text),
        command(name, detail, WITH_SNIPPET),
    ]
}

fn line_command(name: &str, detail: &str, args: &[&str]) -> [CompletionCandidate; 2] {
    let documentation = format!("@{name} {}", args.join(" "));
    let insert_text = format!("{name} {}", tab_stops(args, 1).join(" "));
    [
        snippet(name, name, detail, 0, &documentation, &insert_text),
        command(name, detail, WITH_SNIPPET),
    ]
}

/// A definition command together with its `x` continuation form.
fn line_command_x(name: &str, detail: &str, args: &[&str]) -> Vec<CompletionCandidate> {
    let mut items = line_command(name, detail, args).to_vec();
    items.extend(line_command(&format!("{name}x"), detail, args));
    items
}

fn line_command_enum(name: &str, detail: &str, choices: &[&str]) -> [CompletionCandidate; 2] {
    let documentation = format!("@{name} {}", choices.join("/"));
    let insert_text = format!("{name} ${{1|{}|}}", choices.join(","));
    [
        snippet(name, name, detail, 0, &documentation, &insert_text),
        command(name, detail, WITH_SNIPPET),
    ]
}

fn heading_footing_command(name: &str, detail: &str) -> [CompletionCandidate; 2] {
    let documentation = format!("@{name} left @| center @| right");
    let insert_text = format!("{name} ${{1:left}} @| ${{2:center}} @| ${{3:right}}");
    [
        snippet(name, name, detail, 0, &documentation, &insert_text),
        command(name, detail, WITH_SNIPPET),
    ]
}
