//! One-shot structural checking of an expression tree.
//!
//! The verifier is a diagnostic utility, not a gate: the differentiation pipeline assumes the
//! invariants below hold and callers choose whether to check them. The checks run in order —
//! root validity, acyclicity, then per-kind arity — and stop at the first violation.

use super::{ExprTree, NodeId, NodeKind};
use std::fmt;

/// A per-kind arity violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityViolation {
    /// A number or variable node has a child.
    LeafWithChild,

    /// A function operator is missing its right child or grew a left one.
    UnaryShape,

    /// A `*`, `/` or `^` node is missing a child.
    BinaryMissingChild,

    /// An `+` or `-` node is missing its right child (the left one is optional).
    MissingRightOperand,

    /// A bracket or end-of-input marker survived past parsing.
    StructuralOperator,
}

/// A structural defect found by [`verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// The root node has a parent reference.
    InvalidRoot,

    /// A node's recorded parent disagrees with its structural parent, or a node is its own
    /// descendant.
    Cyclic,

    /// A node violates the arity rules for its kind.
    Arity(ArityViolation),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoot => write!(f, "the root node has a parent reference"),
            Self::Cyclic => write!(f, "the tree contains a cycle or a stale parent reference"),
            Self::Arity(ArityViolation::LeafWithChild) => {
                write!(f, "a number or variable node has children")
            }
            Self::Arity(ArityViolation::UnaryShape) => {
                write!(f, "a function node must have exactly a right child")
            }
            Self::Arity(ArityViolation::BinaryMissingChild) => {
                write!(f, "a binary operator node is missing a child")
            }
            Self::Arity(ArityViolation::MissingRightOperand) => {
                write!(f, "an addition or subtraction node is missing its right operand")
            }
            Self::Arity(ArityViolation::StructuralOperator) => {
                write!(f, "a bracket or end marker is linked into the tree")
            }
        }
    }
}

impl std::error::Error for VerifyError {}

/// Checks the structural invariants of the tree. An absent root verifies trivially.
pub fn verify(tree: &ExprTree) -> Result<(), VerifyError> {
    let Some(root) = tree.root() else {
        return Ok(());
    };

    if tree.node(root).parent.is_some() {
        return Err(VerifyError::InvalidRoot);
    }

    let mut visited = vec![false; tree.len()];
    check_acyclic(tree, root, None, &mut visited)?;
    check_arity(tree, root)
}

/// Walks the tree depth-first, comparing each node's recorded parent to the walk's actual
/// predecessor. Revisiting a slot means some node is reachable twice, so the walk would never
/// terminate without the `visited` set.
fn check_acyclic(
    tree: &ExprTree,
    id: NodeId,
    parent: Option<NodeId>,
    visited: &mut [bool],
) -> Result<(), VerifyError> {
    if visited[id] {
        return Err(VerifyError::Cyclic);
    }
    visited[id] = true;

    if tree.node(id).parent != parent {
        return Err(VerifyError::Cyclic);
    }

    if let Some(right) = tree.node(id).right {
        check_acyclic(tree, right, Some(id), visited)?;
    }
    if let Some(left) = tree.node(id).left {
        check_acyclic(tree, left, Some(id), visited)?;
    }
    Ok(())
}

/// Post-order arity check, right subtree before left, stopping at the first violation.
fn check_arity(tree: &ExprTree, id: NodeId) -> Result<(), VerifyError> {
    let node = tree.node(id);

    if let Some(right) = node.right {
        check_arity(tree, right)?;
    }
    if let Some(left) = node.left {
        check_arity(tree, left)?;
    }

    let violation = match node.kind {
        NodeKind::Num(_) | NodeKind::Var(_) => {
            (node.left.is_some() || node.right.is_some()).then_some(ArityViolation::LeafWithChild)
        }
        NodeKind::Op(op) if op.is_unary() => {
            (node.right.is_none() || node.left.is_some()).then_some(ArityViolation::UnaryShape)
        }
        NodeKind::Op(op) if op.is_binary() => {
            (node.left.is_none() || node.right.is_none())
                .then_some(ArityViolation::BinaryMissingChild)
        }
        NodeKind::Op(op) if op.is_structural() => Some(ArityViolation::StructuralOperator),
        // add / subtract: the left child is optional (unary plus/minus)
        NodeKind::Op(_) => node.right.is_none().then_some(ArityViolation::MissingRightOperand),
    };

    match violation {
        Some(violation) => Err(VerifyError::Arity(violation)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::OpKind;

    #[test]
    fn empty_tree_verifies() {
        assert_eq!(verify(&ExprTree::new()), Ok(()));
    }

    #[test]
    fn rejects_number_with_child() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        let two = tree.num(2.0);
        tree.node_mut(two).right = Some(x);
        tree.set_root(two);
        tree.relink_parents();

        assert_eq!(
            verify(&tree),
            Err(VerifyError::Arity(ArityViolation::LeafWithChild))
        );
    }

    #[test]
    fn rejects_sin_with_left_child() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        let y = tree.var("y");
        let sin = tree.op(OpKind::Sin, Some(x), Some(y));
        tree.set_root(sin);
        tree.relink_parents();

        assert_eq!(
            verify(&tree),
            Err(VerifyError::Arity(ArityViolation::UnaryShape))
        );
    }

    #[test]
    fn rejects_root_with_parent() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        tree.set_root(x);
        tree.node_mut(x).parent = Some(x);

        assert_eq!(verify(&tree), Err(VerifyError::InvalidRoot));
    }

    #[test]
    fn rejects_stale_parent_reference() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        let one = tree.num(1.0);
        let sum = tree.op(OpKind::Add, Some(x), Some(one));
        tree.set_root(sum);
        tree.relink_parents();
        // forge the leaf's parent to point somewhere else
        tree.node_mut(x).parent = Some(x);

        assert_eq!(verify(&tree), Err(VerifyError::Cyclic));
    }

    #[test]
    fn rejects_shared_subtree() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        let sum = tree.op(OpKind::Add, Some(x), Some(x));
        tree.set_root(sum);
        tree.relink_parents();

        assert_eq!(verify(&tree), Err(VerifyError::Cyclic));
    }

    #[test]
    fn rejects_missing_binary_operand() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        let mul = tree.op(OpKind::Mul, Some(x), None);
        tree.set_root(mul);
        tree.relink_parents();

        assert_eq!(
            verify(&tree),
            Err(VerifyError::Arity(ArityViolation::BinaryMissingChild))
        );
    }

    #[test]
    fn accepts_unary_minus() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        let neg = tree.op(OpKind::Sub, None, Some(x));
        tree.set_root(neg);
        tree.relink_parents();

        assert_eq!(verify(&tree), Ok(()));
    }
}
