use crate::node_anchor::node_anchor;
use texinfo::NodeMarker;

/// Command the client runs to scroll the HTML preview to a node.
pub const GOTO_NODE_COMMAND: &str = "texinfo.preview.goto";
pub const GOTO_NODE_TITLE: &str = "Goto node in preview";

/// A "goto node" lens attached to a `@node` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLens {
    pub line: usize,
    pub node_name: String,
    /// HTML id of the node in makeinfo output.
    pub anchor: String,
}

impl NodeLens {
    pub fn title(&self) -> &'static str {
        GOTO_NODE_TITLE
    }

    pub fn command(&self) -> &'static str {
        GOTO_NODE_COMMAND
    }
}

/// Lenses for every node line, in document order.
pub fn node_lenses(nodes: &[NodeMarker]) -> Vec<NodeLens> {
    let mut lenses: Vec<NodeLens> = nodes
        .iter()
        .map(|node| NodeLens {
            line: node.line,
            node_name: node.name.clone(),
            anchor: node_anchor(&node.name),
        })
        .collect();
    lenses.sort_by_key(|lens| lens.line);
    lenses
}
