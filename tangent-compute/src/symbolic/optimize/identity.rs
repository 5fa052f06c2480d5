//! Identity elimination: operators with a `0` or `1` operand are spliced out of the tree.
//!
//! The rewrites:
//!
//! - `x + 0`, `0 + x`, `x - 0` → `x`
//! - `t - t` → `0` (structurally equal operands)
//! - `0 * x`, `x * 0`, `0 / x` → `0`
//! - `1 * x`, `x * 1`, `x / 1`, `x ^ 1` → `x`
//! - `x / 0` → reported as [`OptimizeError::DivisionByZero`], never folded

use super::{OptimizeError, Rel};
use tangent_parser::tree::{ExprTree, NodeId, NodeKind, OpKind};

/// Runs elimination over the whole tree, post-order. The returned flag reports whether any
/// splice happened; the tree root is updated when the root itself was spliced away.
pub(super) fn run(tree: &mut ExprTree) -> Result<bool, OptimizeError> {
    let Some(root) = tree.root() else {
        return Ok(false);
    };

    let mut changed = false;
    let new_root = eliminate(tree, root, Rel::Root, &mut changed)?;
    tree.set_root(new_root);
    tree.node_mut(new_root).parent = None;
    Ok(changed)
}

fn eliminate(
    tree: &mut ExprTree,
    id: NodeId,
    rel: Rel,
    changed: &mut bool,
) -> Result<NodeId, OptimizeError> {
    // children first: a splice below can expose a pattern at this node in the same pass
    if let Some(left) = tree.node(id).left {
        let new_left = eliminate(tree, left, Rel::Left, changed)?;
        tree.node_mut(id).left = Some(new_left);
    }
    if let Some(right) = tree.node(id).right {
        let new_right = eliminate(tree, right, Rel::Right, changed)?;
        tree.node_mut(id).right = Some(new_right);
    }

    let (kind, left, right) = {
        let node = tree.node(id);
        (node.kind, node.left, node.right)
    };
    let NodeKind::Op(op) = kind else {
        return Ok(id);
    };
    // unary plus/minus and malformed nodes have nothing to eliminate
    let (Some(left), Some(right)) = (left, right) else {
        return Ok(id);
    };

    let left_val = tree.node(left).num();
    let right_val = tree.node(right).num();

    let replacement = match op {
        OpKind::Add | OpKind::Sub if right_val == Some(0.0) => Some(left),
        OpKind::Add if left_val == Some(0.0) => Some(right),
        OpKind::Sub if tree.subtree_eq(left, right) => Some(tree.num(0.0)),
        OpKind::Mul if left_val == Some(0.0) => Some(left),
        OpKind::Mul if right_val == Some(0.0) => Some(right),
        OpKind::Mul if left_val == Some(1.0) => Some(right),
        OpKind::Mul if right_val == Some(1.0) => Some(left),
        OpKind::Div if right_val == Some(0.0) => return Err(OptimizeError::DivisionByZero),
        OpKind::Div if left_val == Some(0.0) => Some(left),
        OpKind::Div if right_val == Some(1.0) => Some(left),
        OpKind::Pow if right_val == Some(1.0) => Some(left),
        _ => None,
    };

    let Some(surviving) = replacement else {
        return Ok(id);
    };
    *changed = true;

    // the survivor takes over this node's attachment point; besides handing it back to the
    // caller, redirect the parent's child link so back-references stay usable mid-pass
    let parent = tree.node(id).parent;
    tree.node_mut(surviving).parent = parent;
    match (rel, parent) {
        (Rel::Left, Some(parent)) => tree.node_mut(parent).left = Some(surviving),
        (Rel::Right, Some(parent)) => tree.node_mut(parent).right = Some(surviving),
        // the root has no parent to redirect; `run` adopts the returned id as the new root
        _ => {}
    }

    Ok(surviving)
}
