//! Rendering collaborators for expression trees.
//!
//! Nothing in this crate knows how trees are built or rewritten; everything is derived from the
//! inorder traversal the tree itself provides. [`render_expression`] and
//! [`render_derivative_annotation`] are the plain-text forms, [`latex`] assembles LaTeX
//! documents, and [`dot`] dumps a tree as a Graphviz graph.

pub mod dot;
pub mod latex;

use tangent_parser::tree::{ExprTree, NodeId};

/// Renders the subtree rooted at `id` as a plain-text expression with precedence-aware
/// parenthesization.
pub fn render_expression(tree: &ExprTree, id: NodeId) -> String {
    tree.display(id).to_string()
}

/// Renders the subtree as the left-hand side of a derivative statement: `(expr)' = `.
pub fn render_derivative_annotation(tree: &ExprTree, id: NodeId) -> String {
    format!("({})' = ", tree.display(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangent_parser::parser::Parser;

    #[test]
    fn annotation_frames_the_expression() {
        let tree = Parser::new("x ^ 2").unwrap().parse().unwrap();
        let root = tree.root().unwrap();
        assert_eq!(render_expression(&tree, root), "x^2");
        assert_eq!(render_derivative_annotation(&tree, root), "(x^2)' = ");
    }
}
