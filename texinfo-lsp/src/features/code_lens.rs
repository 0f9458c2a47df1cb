use lsp_types::{CodeLens, Command, Position, Range};
use serde_json::Value;
use texinfo::NodeMarker;
use texinfo_analysis::code_lens::{node_lenses, NodeLens};

/// A "goto node" lens on every `@node` line.
pub fn code_lenses(nodes: &[NodeMarker]) -> Vec<CodeLens> {
    node_lenses(nodes).iter().map(to_code_lens).collect()
}

fn to_code_lens(lens: &NodeLens) -> CodeLens {
    let position = Position::new(lens.line as u32, 0);
    CodeLens {
        range: Range::new(position, position),
        command: Some(Command {
            title: lens.title().to_string(),
            command: lens.command().to_string(),
            arguments: Some(vec![Value::String(lens.node_name.clone())]),
        }),
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::sample_document;
    use texinfo::scan;
    use texinfo_analysis::code_lens::GOTO_NODE_COMMAND;

    #[test]
    fn lenses_carry_node_names() {
        let lenses = code_lenses(&scan(&sample_document()).nodes);
        assert_eq!(lenses.len(), 2);
        assert_eq!(lenses[0].range.start.line, 6);
        assert_eq!(lenses[1].range.start.line, 12);
        let command = lenses[1].command.as_ref().unwrap();
        assert_eq!(command.command, GOTO_NODE_COMMAND);
        assert_eq!(
            command.arguments,
            Some(vec![Value::String("Overview".to_string())])
        );
    }
}
