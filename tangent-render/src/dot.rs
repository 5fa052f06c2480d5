//! Graphviz dumps of expression trees.
//!
//! The emitted graph names nodes after their arena ids, so two dumps of the same tree are
//! directly comparable. Turning the output into an image is the caller's business (`dot -Tpng`);
//! this module only writes the text.

use std::io::{self, Write};
use tangent_parser::tree::{ExprTree, NodeId, NodeKind};

const BACKGROUND: &str = "#DDA0DD";
const OPERATOR_FILL: &str = "#F8C4B7";
const VARIABLE_FILL: &str = "#B7F8CA";
const NUMBER_FILL: &str = "#ADD8E6";

/// Write the subtree rooted at `root` as a Graphviz digraph.
pub fn write_dot(tree: &ExprTree, root: NodeId, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "digraph G {{")?;
    writeln!(writer, "    rankdir=TB;")?;
    writeln!(writer, "    bgcolor=\"{BACKGROUND}\";")?;
    writeln!(writer, "    node [shape=box, style=filled];")?;
    write_nodes(tree, root, writer)?;
    write_links(tree, root, writer)?;
    writeln!(writer, "}}")
}

fn write_nodes(tree: &ExprTree, id: NodeId, writer: &mut impl Write) -> io::Result<()> {
    let node = tree.node(id);
    let (label, fill) = match node.kind {
        NodeKind::Num(value) => (value.to_string(), NUMBER_FILL),
        NodeKind::Var(index) => (
            tree.vars().name(index).unwrap_or("?").to_owned(),
            VARIABLE_FILL,
        ),
        NodeKind::Op(op) => (op.name().to_owned(), OPERATOR_FILL),
    };
    writeln!(
        writer,
        "    node{id} [label=\"{}\", fillcolor=\"{fill}\"];",
        label.replace('\\', "\\\\").replace('"', "\\\"")
    )?;

    if let Some(left) = node.left {
        write_nodes(tree, left, writer)?;
    }
    if let Some(right) = node.right {
        write_nodes(tree, right, writer)?;
    }
    Ok(())
}

fn write_links(tree: &ExprTree, id: NodeId, writer: &mut impl Write) -> io::Result<()> {
    let node = tree.node(id);
    if let Some(left) = node.left {
        writeln!(writer, "    node{id} -> node{left};")?;
        write_links(tree, left, writer)?;
    }
    if let Some(right) = node.right {
        writeln!(writer, "    node{id} -> node{right};")?;
        write_links(tree, right, writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangent_parser::parser::Parser;

    #[test]
    fn dumps_every_node_and_edge() {
        let tree = Parser::new("x + 2").unwrap().parse().unwrap();
        let mut out = Vec::new();
        write_dot(&tree, tree.root().unwrap(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("digraph G {"));
        assert!(text.trim_end().ends_with('}'));
        assert!(text.contains("[label=\"+\""));
        assert!(text.contains("[label=\"x\""));
        assert!(text.contains("[label=\"2\""));
        // one edge per child link
        assert_eq!(text.matches(" -> ").count(), 2);
    }
}
