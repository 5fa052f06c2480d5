//! Inorder rendering of expression trees, as plain text and as LaTeX.
//!
//! Both renderings share the same parenthesization decision: a child is wrapped when its
//! operator precedence is lower than its parent's, or equal on the side the parent does not
//! associate over (the right operand of `-` and `/`, the left operand of `^`). Leaves and
//! function operators have precedence `-1` and are never wrapped; function operators instead
//! always enclose their operand in an explicit group.

use super::{ExprTree, NodeId, NodeKind, OpKind};
use std::fmt::{self, Display, Formatter};

/// A subtree borrowed for rendering; implements [`Display`] and [`Latex`].
#[derive(Debug, Clone, Copy)]
pub struct DisplayExpr<'a> {
    tree: &'a ExprTree,
    id: NodeId,
}

impl ExprTree {
    /// Wraps the subtree rooted at `id` for rendering.
    pub fn display(&self, id: NodeId) -> DisplayExpr<'_> {
        DisplayExpr { tree: self, id }
    }
}

impl Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_node(f, self.tree, self.id)
    }
}

/// Renders the root expression; an empty tree renders as nothing.
impl Display for ExprTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => fmt_node(f, self, root),
            None => Ok(()),
        }
    }
}

/// Rendering precedence of a node: the operator's own precedence, `-1` for leaves.
fn precedence(tree: &ExprTree, id: NodeId) -> i32 {
    match tree.node(id).kind {
        NodeKind::Op(op) => op.precedence(),
        _ => -1,
    }
}

/// Whether a child of equal precedence still needs parentheses on this side of the parent.
fn tie_breaks(parent: OpKind, right_side: bool) -> bool {
    match parent {
        OpKind::Sub | OpKind::Div => right_side,
        OpKind::Pow => !right_side,
        _ => false,
    }
}

fn needs_parens(tree: &ExprTree, child: NodeId, parent: OpKind, right_side: bool) -> bool {
    let child_prec = precedence(tree, child);
    child_prec != -1
        && (child_prec < parent.precedence()
            || (child_prec == parent.precedence() && tie_breaks(parent, right_side)))
}

fn fmt_node(f: &mut Formatter<'_>, tree: &ExprTree, id: NodeId) -> fmt::Result {
    let node = tree.node(id);
    match node.kind {
        NodeKind::Num(value) => write!(f, "{}", value),
        NodeKind::Var(index) => f.write_str(tree.vars().name(index).unwrap_or("?")),
        NodeKind::Op(op) if op.is_unary() => {
            write!(f, "{}(", op.name())?;
            if let Some(operand) = node.right {
                fmt_node(f, tree, operand)?;
            }
            f.write_str(")")
        }
        NodeKind::Op(op) => match (node.left, node.right) {
            (Some(left), Some(right)) => {
                fmt_child(f, tree, left, op, false)?;
                f.write_str(op.name())?;
                fmt_child(f, tree, right, op, true)
            }
            (None, Some(operand)) => {
                // unary plus/minus binds at power level: everything below it needs a group
                f.write_str(op.name())?;
                let parens = precedence(tree, operand) != -1
                    && precedence(tree, operand) < OpKind::Pow.precedence();
                if parens {
                    f.write_str("(")?;
                }
                fmt_node(f, tree, operand)?;
                if parens {
                    f.write_str(")")?;
                }
                Ok(())
            }
            _ => f.write_str(op.name()),
        },
    }
}

fn fmt_child(
    f: &mut Formatter<'_>,
    tree: &ExprTree,
    child: NodeId,
    parent: OpKind,
    right_side: bool,
) -> fmt::Result {
    let parens = needs_parens(tree, child, parent, right_side);
    if parens {
        f.write_str("(")?;
    }
    fmt_node(f, tree, child)?;
    if parens {
        f.write_str(")")?;
    }
    Ok(())
}

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_latex(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt_latex(f)
    }
}

impl Latex for DisplayExpr<'_> {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        latex_node(f, self.tree, self.id)
    }
}

fn latex_node(f: &mut Formatter<'_>, tree: &ExprTree, id: NodeId) -> fmt::Result {
    let node = tree.node(id);
    match node.kind {
        NodeKind::Num(value) => write!(f, "{}", value),
        NodeKind::Var(index) => f.write_str(tree.vars().name(index).unwrap_or("?")),
        NodeKind::Op(op) if op.is_unary() => {
            write!(f, "{}\\left(", op.latex_name())?;
            if let Some(operand) = node.right {
                latex_node(f, tree, operand)?;
            }
            f.write_str("\\right)")
        }
        NodeKind::Op(OpKind::Div) => match (node.left, node.right) {
            (Some(left), Some(right)) => {
                f.write_str("\\frac{")?;
                latex_node(f, tree, left)?;
                f.write_str("}{")?;
                latex_node(f, tree, right)?;
                f.write_str("}")
            }
            _ => f.write_str(OpKind::Div.name()),
        },
        NodeKind::Op(OpKind::Pow) => match (node.left, node.right) {
            (Some(base), Some(exponent)) => {
                if precedence(tree, base) == -1 {
                    latex_node(f, tree, base)?;
                } else {
                    f.write_str("\\left(")?;
                    latex_node(f, tree, base)?;
                    f.write_str("\\right)")?;
                }
                f.write_str("^{")?;
                latex_node(f, tree, exponent)?;
                f.write_str("}")
            }
            _ => f.write_str(OpKind::Pow.name()),
        },
        NodeKind::Op(op) => match (node.left, node.right) {
            (Some(left), Some(right)) => {
                latex_child(f, tree, left, op, false)?;
                f.write_str(latex_symbol(op))?;
                latex_child(f, tree, right, op, true)
            }
            (None, Some(operand)) => {
                f.write_str(op.name())?;
                let parens = precedence(tree, operand) != -1
                    && precedence(tree, operand) < OpKind::Pow.precedence();
                if parens {
                    f.write_str("\\left(")?;
                }
                latex_node(f, tree, operand)?;
                if parens {
                    f.write_str("\\right)")?;
                }
                Ok(())
            }
            _ => f.write_str(op.name()),
        },
    }
}

fn latex_child(
    f: &mut Formatter<'_>,
    tree: &ExprTree,
    child: NodeId,
    parent: OpKind,
    right_side: bool,
) -> fmt::Result {
    let parens = needs_parens(tree, child, parent, right_side);
    if parens {
        f.write_str("\\left(")?;
    }
    latex_node(f, tree, child)?;
    if parens {
        f.write_str("\\right)")?;
    }
    Ok(())
}

fn latex_symbol(op: OpKind) -> &'static str {
    match op {
        OpKind::Mul => " \\cdot ",
        _ => op.name(),
    }
}
