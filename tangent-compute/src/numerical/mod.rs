//! Numerical evaluation of expression trees against concrete variable bindings.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use tangent_parser::tree::{ExprTree, NodeId, NodeKind, OpKind};

/// Variable bindings for evaluation.
#[derive(Debug, Clone, Default)]
pub struct Ctxt {
    vars: HashMap<String, f64>,
}

impl Ctxt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable to a value, replacing any previous binding.
    pub fn add_var(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    pub fn var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }
}

/// Reasons a tree cannot be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The tree contains a variable with no binding in the context.
    UnknownVariable(String),

    /// An operator node is missing a required operand.
    MissingOperand(OpKind),

    /// A bracket or end-of-input marker is linked into the tree.
    StructuralOperator(OpKind),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable(name) => write!(f, "the variable `{name}` has no binding"),
            Self::MissingOperand(op) => write!(f, "`{op}` is missing an operand"),
            Self::StructuralOperator(op) => {
                write!(f, "`{op}` cannot appear inside a parsed expression")
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Evaluates the subtree rooted at `id` against the given bindings.
///
/// Numerical edge cases follow IEEE semantics: dividing by zero yields an infinity and leaving a
/// function's domain yields a NaN. Catching literal zero divisors ahead of time is the
/// optimizer's job, not the evaluator's.
pub fn eval(tree: &ExprTree, id: NodeId, ctxt: &Ctxt) -> Result<f64, EvalError> {
    let node = tree.node(id);
    match node.kind {
        NodeKind::Num(value) => Ok(value),
        NodeKind::Var(index) => {
            let name = tree.vars().name(index).unwrap_or("?");
            ctxt.var(name)
                .ok_or_else(|| EvalError::UnknownVariable(name.to_owned()))
        }
        NodeKind::Op(op) if op.is_unary() => {
            let operand = node.right.ok_or(EvalError::MissingOperand(op))?;
            Ok(function_value(op, eval(tree, operand, ctxt)?))
        }
        NodeKind::Op(op @ (OpKind::Add | OpKind::Sub)) => {
            let right = node.right.ok_or(EvalError::MissingOperand(op))?;
            // an absent left operand is unary plus/minus
            let left = match node.left {
                Some(left) => eval(tree, left, ctxt)?,
                None => 0.0,
            };
            let right = eval(tree, right, ctxt)?;
            Ok(match op {
                OpKind::Add => left + right,
                _ => left - right,
            })
        }
        NodeKind::Op(op @ (OpKind::Mul | OpKind::Div | OpKind::Pow)) => {
            let (left, right) = match (node.left, node.right) {
                (Some(left), Some(right)) => (left, right),
                _ => return Err(EvalError::MissingOperand(op)),
            };
            let left = eval(tree, left, ctxt)?;
            let right = eval(tree, right, ctxt)?;
            Ok(match op {
                OpKind::Mul => left * right,
                OpKind::Div => left / right,
                _ => left.powf(right),
            })
        }
        NodeKind::Op(op) => Err(EvalError::StructuralOperator(op)),
    }
}

/// Applies a function operator to its operand value. `log` reads as the base-10 logarithm.
fn function_value(op: OpKind, value: f64) -> f64 {
    match op {
        OpKind::Log => value.log10(),
        OpKind::Ln => value.ln(),
        OpKind::Exp => value.exp(),
        OpKind::Sin => value.sin(),
        OpKind::Cos => value.cos(),
        OpKind::Tan => value.tan(),
        OpKind::Cot => value.tan().recip(),
        OpKind::Sinh => value.sinh(),
        OpKind::Cosh => value.cosh(),
        OpKind::Tanh => value.tanh(),
        OpKind::Coth => value.tanh().recip(),
        OpKind::Arcsin => value.asin(),
        OpKind::Arccos => value.acos(),
        OpKind::Arctan => value.atan(),
        OpKind::Arccot => FRAC_PI_2 - value.atan(),
        OpKind::Arcsinh => value.asinh(),
        OpKind::Arccosh => value.acosh(),
        OpKind::Arctanh => value.atanh(),
        OpKind::Arccoth => value.recip().atanh(),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use tangent_parser::parser::Parser;

    fn eval_with_x(input: &str, x: f64) -> f64 {
        let tree = Parser::new(input).unwrap().parse().unwrap();
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", x);
        eval(&tree, tree.root().unwrap(), &ctxt).unwrap()
    }

    #[test]
    fn arithmetic() {
        assert_float_absolute_eq!(eval_with_x("2 + 3 * 4", 0.0), 14.0);
        assert_float_absolute_eq!(eval_with_x("(x + 1) ^ 2", 2.0), 9.0);
        assert_float_absolute_eq!(eval_with_x("-x", 3.0), -3.0);
        assert_float_absolute_eq!(eval_with_x("10 / x", 4.0), 2.5);
    }

    #[test]
    fn functions() {
        assert_float_absolute_eq!(eval_with_x("sin(x)", 0.0), 0.0);
        assert_float_absolute_eq!(eval_with_x("(ch(x))^2 - (sh(x))^2", 0.7), 1.0, 1e-12);
        assert_float_absolute_eq!(eval_with_x("ln(exp(x))", 1.5), 1.5, 1e-12);
        assert_float_absolute_eq!(eval_with_x("log(x)", 100.0), 2.0, 1e-12);
        assert_float_absolute_eq!(eval_with_x("arcctg(x) + arctg(x)", 1.0), FRAC_PI_2, 1e-12);
    }

    #[test]
    fn unbound_variables_are_reported() {
        let tree = Parser::new("x + y").unwrap().parse().unwrap();
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 1.0);
        assert_eq!(
            eval(&tree, tree.root().unwrap(), &ctxt),
            Err(EvalError::UnknownVariable("y".to_owned()))
        );
    }
}
