use serde_json::{json, Value};
use texinfo_analysis::code_lens::GOTO_NODE_COMMAND;
use texinfo_analysis::node_anchor::node_anchor;
use texinfo_babel::Conversion;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::Url;

pub const COMMAND_GOTO_NODE: &str = GOTO_NODE_COMMAND;
pub const COMMAND_RENDER_PREVIEW: &str = "texinfo.preview.render";

/// Commands advertised in the server capabilities.
pub fn commands() -> Vec<String> {
    vec![
        COMMAND_GOTO_NODE.to_string(),
        COMMAND_RENDER_PREVIEW.to_string(),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewCommand {
    /// Scroll the preview to the node with this name.
    GotoNode(String),
    /// Render the document at this URI to HTML.
    Render(Url),
}

pub fn parse_command(command: &str, arguments: &[Value]) -> Result<PreviewCommand> {
    match command {
        COMMAND_GOTO_NODE => {
            let name = string_argument(arguments, "node name")?;
            Ok(PreviewCommand::GotoNode(name.to_string()))
        }
        COMMAND_RENDER_PREVIEW => {
            let uri = string_argument(arguments, "document URI")?;
            let uri = Url::parse(uri)
                .map_err(|err| Error::invalid_params(format!("invalid document URI: {err}")))?;
            Ok(PreviewCommand::Render(uri))
        }
        _ => Err(Error::invalid_request()),
    }
}

fn string_argument<'a>(arguments: &'a [Value], what: &str) -> Result<&'a str> {
    arguments
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_params(format!("expected a {what} argument")))
}

/// Payload for [`PreviewCommand::GotoNode`]: the node and its HTML anchor.
pub fn goto_node(name: &str) -> Value {
    json!({
        "node": name,
        "anchor": node_anchor(name),
    })
}

/// Payload for [`PreviewCommand::Render`].
pub fn rendered(conversion: Conversion) -> Value {
    json!({
        "html": conversion.html,
        "log": conversion.log,
    })
}
