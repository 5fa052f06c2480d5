//! Constant folding: `2+3` becomes `5`.

use super::OptimizeError;
use tangent_parser::tree::{ExprTree, NodeId, NodeKind, OpKind};

/// Folds every foldable node reachable from the root, post-order. Returns whether anything
/// changed.
pub(super) fn run(tree: &mut ExprTree) -> Result<bool, OptimizeError> {
    match tree.root() {
        Some(root) => fold_node(tree, root),
        None => Ok(false),
    }
}

fn fold_node(tree: &mut ExprTree, id: NodeId) -> Result<bool, OptimizeError> {
    let (left, right) = {
        let node = tree.node(id);
        (node.left, node.right)
    };

    let mut changed = false;
    if let Some(left) = left {
        changed |= fold_node(tree, left)?;
    }
    if let Some(right) = right {
        changed |= fold_node(tree, right)?;
    }

    let Some(op) = tree.node(id).op() else {
        return Ok(changed);
    };
    let (Some(left), Some(right)) = (left, right) else {
        return Ok(changed);
    };
    let (Some(left_val), Some(right_val)) = (tree.node(left).num(), tree.node(right).num()) else {
        return Ok(changed);
    };

    // folding is defined only for the four elementary operators
    let value = match op {
        OpKind::Add => left_val + right_val,
        OpKind::Sub => left_val - right_val,
        OpKind::Mul => left_val * right_val,
        OpKind::Div => {
            if right_val == 0.0 {
                return Err(OptimizeError::DivisionByZero);
            }
            left_val / right_val
        }
        _ => return Ok(changed),
    };

    // the node morphs into a number leaf; its former children become unreachable
    let node = tree.node_mut(id);
    node.kind = NodeKind::Num(value);
    node.left = None;
    node.right = None;
    Ok(true)
}
