//! The differentiation rule table.
//!
//! Every rule builds new nodes in the output tree from recursive derivatives of the operand
//! subtrees and deep copies of the operands themselves. The output is intentionally literal and
//! expected to be cleaned up by [`optimize`](super::optimize).

use super::step_collector::StepCollector;
use std::fmt;
use tangent_parser::tree::{ExprTree, NodeId, NodeKind, OpKind};

/// A single rewrite performed by the differentiator: the rendered subexpression it visited and
/// the rendered derivative built for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub source: String,
    pub result: String,
}

/// Reasons the derivative of a tree cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeError {
    /// An operand required by the rewrite rule for this operator is absent.
    MissingOperand(OpKind),

    /// A bracket or end-of-input marker is linked into the tree.
    StructuralOperator(OpKind),
}

impl fmt::Display for DerivativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperand(op) => {
                write!(f, "`{op}` is missing an operand required by its derivative rule")
            }
            Self::StructuralOperator(op) => {
                write!(f, "`{op}` cannot appear inside a parsed expression")
            }
        }
    }
}

impl std::error::Error for DerivativeError {}

/// Differentiates the tree with respect to the named variable, returning an independent
/// derivative tree. Variables other than `var` are treated as constants; a name the tree has
/// never seen yields the all-zero derivative.
pub fn derivative(tree: &ExprTree, var: &str) -> Result<ExprTree, DerivativeError> {
    derivative_with(tree, var, &mut ())
}

/// Differentiates the tree, reporting a before/after pair for every rewritten operator subtree
/// to the step collector.
pub fn derivative_with(
    tree: &ExprTree,
    var: &str,
    steps: &mut dyn StepCollector<Step>,
) -> Result<ExprTree, DerivativeError> {
    let out = ExprTree::with_vars(tree.vars().clone());
    let Some(root) = tree.root() else {
        return Ok(out);
    };

    let mut ctx = Differentiator {
        src: tree,
        out,
        var: tree.vars().index_of(var),
        steps,
    };
    let derived = ctx.node(root)?;

    let mut out = ctx.out;
    out.set_root(derived);
    out.relink_parents();
    Ok(out)
}

/// The state of one differentiation run: the source tree being read, the output tree being
/// grown, and the index of the differentiation variable.
struct Differentiator<'a> {
    src: &'a ExprTree,
    out: ExprTree,
    var: Option<usize>,
    steps: &'a mut dyn StepCollector<Step>,
}

impl Differentiator<'_> {
    fn node(&mut self, id: NodeId) -> Result<NodeId, DerivativeError> {
        match self.src.node(id).kind {
            NodeKind::Num(_) => Ok(self.num(0.0)),
            NodeKind::Var(index) => {
                let value = if Some(index) == self.var { 1.0 } else { 0.0 };
                Ok(self.num(value))
            }
            NodeKind::Op(op) => {
                let result = self.operator(id, op)?;
                self.trace(id, result);
                Ok(result)
            }
        }
    }

    fn operator(&mut self, id: NodeId, op: OpKind) -> Result<NodeId, DerivativeError> {
        match op {
            OpKind::Add | OpKind::Sub => {
                // (f ± g)' = f' ± g'; an absent left operand stays absent (unary plus/minus)
                let (left, right) = {
                    let node = self.src.node(id);
                    (node.left, node.right)
                };
                let right = right.ok_or(DerivativeError::MissingOperand(op))?;
                let dleft = match left {
                    Some(left) => Some(self.node(left)?),
                    None => None,
                };
                let dright = self.node(right)?;
                Ok(self.out.op(op, dleft, Some(dright)))
            }
            OpKind::Mul => {
                // (f·g)' = f'·g + f·g'
                let (f, g) = self.operands(id, op)?;
                let df = self.node(f)?;
                let gc = self.copy(g);
                let lhs = self.binary(OpKind::Mul, df, gc);
                let fc = self.copy(f);
                let dg = self.node(g)?;
                let rhs = self.binary(OpKind::Mul, fc, dg);
                Ok(self.binary(OpKind::Add, lhs, rhs))
            }
            OpKind::Div => {
                // (f/g)' = (f'·g − f·g') / g²
                let (f, g) = self.operands(id, op)?;
                let df = self.node(f)?;
                let gc = self.copy(g);
                let lhs = self.binary(OpKind::Mul, df, gc);
                let fc = self.copy(f);
                let dg = self.node(g)?;
                let rhs = self.binary(OpKind::Mul, fc, dg);
                let numerator = self.binary(OpKind::Sub, lhs, rhs);
                let gc = self.copy(g);
                let two = self.num(2.0);
                let denominator = self.binary(OpKind::Pow, gc, two);
                Ok(self.binary(OpKind::Div, numerator, denominator))
            }
            OpKind::Pow => self.power(id),
            OpKind::Log => {
                // kept as-is: (log f)' = f' / (f · ln f). This is not the derivative of a
                // fixed-base logarithm; see DESIGN.md.
                let f = self.operand(id, op)?;
                let df = self.node(f)?;
                let fc = self.copy(f);
                let inner = self.copy(f);
                let ln = self.unary(OpKind::Ln, inner);
                let denominator = self.binary(OpKind::Mul, fc, ln);
                Ok(self.binary(OpKind::Div, df, denominator))
            }
            OpKind::Ln => {
                // (ln f)' = f'/f
                let f = self.operand(id, op)?;
                let df = self.node(f)?;
                let fc = self.copy(f);
                Ok(self.binary(OpKind::Div, df, fc))
            }
            OpKind::Exp => self.chain(id, op, |ctx, fc| ctx.unary(OpKind::Exp, fc)),
            OpKind::Sin => self.chain(id, op, |ctx, fc| ctx.unary(OpKind::Cos, fc)),
            OpKind::Cos => self.chain(id, op, |ctx, fc| {
                let sin = ctx.unary(OpKind::Sin, fc);
                let neg = ctx.num(-1.0);
                ctx.binary(OpKind::Mul, neg, sin)
            }),
            OpKind::Tan => self.chain(id, op, |ctx, fc| ctx.squared_recip(OpKind::Cos, fc, 1.0)),
            OpKind::Cot => self.chain(id, op, |ctx, fc| ctx.squared_recip(OpKind::Sin, fc, -1.0)),
            OpKind::Sinh => self.chain(id, op, |ctx, fc| ctx.unary(OpKind::Cosh, fc)),
            OpKind::Cosh => self.chain(id, op, |ctx, fc| ctx.unary(OpKind::Sinh, fc)),
            OpKind::Tanh => self.chain(id, op, |ctx, fc| ctx.squared_recip(OpKind::Cosh, fc, 1.0)),
            OpKind::Coth => self.chain(id, op, |ctx, fc| ctx.squared_recip(OpKind::Sinh, fc, -1.0)),
            OpKind::Arcsin => self.arcsin_rule(id, op),
            OpKind::Arccos => {
                // arccos reuses the arcsin rule with the sign flipped
                let inner = self.arcsin_rule(id, op)?;
                let neg = self.num(-1.0);
                Ok(self.binary(OpKind::Mul, neg, inner))
            }
            OpKind::Arctan => self.arctan_rule(id, op),
            OpKind::Arccot => {
                // likewise arccot is the negated arctan rule
                let inner = self.arctan_rule(id, op)?;
                let neg = self.num(-1.0);
                Ok(self.binary(OpKind::Mul, neg, inner))
            }
            OpKind::Arcsinh => {
                // f' / (1 + f²)^0.5
                let f = self.operand(id, op)?;
                let df = self.node(f)?;
                let squared = self.squared_copy(f);
                let one = self.num(1.0);
                let base = self.binary(OpKind::Add, one, squared);
                let half = self.num(0.5);
                let root = self.binary(OpKind::Pow, base, half);
                Ok(self.binary(OpKind::Div, df, root))
            }
            OpKind::Arccosh => {
                // f' / (f² − 1)^0.5
                let f = self.operand(id, op)?;
                let df = self.node(f)?;
                let squared = self.squared_copy(f);
                let one = self.num(1.0);
                let base = self.binary(OpKind::Sub, squared, one);
                let half = self.num(0.5);
                let root = self.binary(OpKind::Pow, base, half);
                Ok(self.binary(OpKind::Div, df, root))
            }
            OpKind::Arctanh | OpKind::Arccoth => {
                // f' / (1 − f²), for both: the two functions differ only in domain
                let f = self.operand(id, op)?;
                let df = self.node(f)?;
                let squared = self.squared_copy(f);
                let one = self.num(1.0);
                let denominator = self.binary(OpKind::Sub, one, squared);
                Ok(self.binary(OpKind::Div, df, denominator))
            }
            OpKind::OpenParen | OpKind::CloseParen | OpKind::End => {
                Err(DerivativeError::StructuralOperator(op))
            }
        }
    }

    /// The four power-rule cases, selected by scanning each operand subtree for the
    /// differentiation variable.
    fn power(&mut self, id: NodeId) -> Result<NodeId, DerivativeError> {
        let (f, g) = self.operands(id, OpKind::Pow)?;
        let in_base = self.var.map_or(false, |var| self.src.contains_var(f, var));
        let in_exponent = self.var.map_or(false, |var| self.src.contains_var(g, var));

        match (in_base, in_exponent) {
            // a constant raised to a constant
            (false, false) => Ok(self.num(0.0)),
            // g constant: g · f^(g−1) · f'
            (true, false) => {
                let df = self.node(f)?;
                let gc = self.copy(g);
                let base = self.copy(f);
                let gc2 = self.copy(g);
                let one = self.num(1.0);
                let exponent = self.binary(OpKind::Sub, gc2, one);
                let powed = self.binary(OpKind::Pow, base, exponent);
                let rhs = self.binary(OpKind::Mul, gc, powed);
                Ok(self.binary(OpKind::Mul, df, rhs))
            }
            // f constant: f^g · ln(f) · g'
            (false, true) => {
                let dg = self.node(g)?;
                let whole = self.copy(id);
                let fc = self.copy(f);
                let ln = self.unary(OpKind::Ln, fc);
                let rhs = self.binary(OpKind::Mul, whole, ln);
                Ok(self.binary(OpKind::Mul, dg, rhs))
            }
            // both vary: f^g · ( g'·ln(f) + g·f'/f )
            (true, true) => {
                let whole = self.copy(id);
                let dg = self.node(g)?;
                let fc = self.copy(f);
                let ln = self.unary(OpKind::Ln, fc);
                let lhs = self.binary(OpKind::Mul, dg, ln);
                let gc = self.copy(g);
                let df = self.node(f)?;
                let fc = self.copy(f);
                let ratio = self.binary(OpKind::Div, df, fc);
                let rhs = self.binary(OpKind::Mul, gc, ratio);
                let sum = self.binary(OpKind::Add, lhs, rhs);
                Ok(self.binary(OpKind::Mul, whole, sum))
            }
        }
    }

    /// Chain rule: `(op f)' = f' · outer(copy of f)`.
    fn chain(
        &mut self,
        id: NodeId,
        op: OpKind,
        outer: impl FnOnce(&mut Self, NodeId) -> NodeId,
    ) -> Result<NodeId, DerivativeError> {
        let f = self.operand(id, op)?;
        let df = self.node(f)?;
        let fc = self.copy(f);
        let outer = outer(self, fc);
        Ok(self.binary(OpKind::Mul, df, outer))
    }

    /// `f' / (1 − f²)^0.5`, the arcsin shape.
    fn arcsin_rule(&mut self, id: NodeId, op: OpKind) -> Result<NodeId, DerivativeError> {
        let f = self.operand(id, op)?;
        let df = self.node(f)?;
        let squared = self.squared_copy(f);
        let one = self.num(1.0);
        let base = self.binary(OpKind::Sub, one, squared);
        let half = self.num(0.5);
        let root = self.binary(OpKind::Pow, base, half);
        Ok(self.binary(OpKind::Div, df, root))
    }

    /// `f' / (1 + f²)`, the arctan shape.
    fn arctan_rule(&mut self, id: NodeId, op: OpKind) -> Result<NodeId, DerivativeError> {
        let f = self.operand(id, op)?;
        let df = self.node(f)?;
        let squared = self.squared_copy(f);
        let one = self.num(1.0);
        let denominator = self.binary(OpKind::Add, one, squared);
        Ok(self.binary(OpKind::Div, df, denominator))
    }

    /// `sign / inner(f)²`, the shape shared by the tangent/cotangent family.
    fn squared_recip(&mut self, inner: OpKind, fc: NodeId, sign: f64) -> NodeId {
        let wrapped = self.unary(inner, fc);
        let two = self.num(2.0);
        let squared = self.binary(OpKind::Pow, wrapped, two);
        let sign = self.num(sign);
        self.binary(OpKind::Div, sign, squared)
    }

    /// Deep-copies a source subtree into the output tree.
    fn copy(&mut self, id: NodeId) -> NodeId {
        self.out.copy_from(self.src, id)
    }

    /// `copy(f)^2` in the output tree.
    fn squared_copy(&mut self, f: NodeId) -> NodeId {
        let fc = self.copy(f);
        let two = self.num(2.0);
        self.binary(OpKind::Pow, fc, two)
    }

    fn num(&mut self, value: f64) -> NodeId {
        self.out.num(value)
    }

    fn unary(&mut self, op: OpKind, operand: NodeId) -> NodeId {
        self.out.op(op, None, Some(operand))
    }

    fn binary(&mut self, op: OpKind, left: NodeId, right: NodeId) -> NodeId {
        self.out.op(op, Some(left), Some(right))
    }

    /// The operand of a function operator (always the right child).
    fn operand(&self, id: NodeId, op: OpKind) -> Result<NodeId, DerivativeError> {
        self.src
            .node(id)
            .right
            .ok_or(DerivativeError::MissingOperand(op))
    }

    /// Both operands of a binary operator.
    fn operands(&self, id: NodeId, op: OpKind) -> Result<(NodeId, NodeId), DerivativeError> {
        let node = self.src.node(id);
        match (node.left, node.right) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(DerivativeError::MissingOperand(op)),
        }
    }

    /// Records a before/after pair for the subtree just rewritten.
    fn trace(&mut self, source: NodeId, result: NodeId) {
        self.steps.push(Step {
            source: self.src.display(source).to_string(),
            result: self.out.display(result).to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::{eval, Ctxt};
    use tangent_parser::parser::Parser;

    fn parse(input: &str) -> ExprTree {
        Parser::new(input).unwrap().parse().unwrap()
    }

    fn eval_x(tree: &ExprTree, x: f64) -> f64 {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", x);
        eval(tree, tree.root().unwrap(), &ctxt).unwrap()
    }

    /// Central finite difference of the source expression at `x`.
    fn finite_difference(tree: &ExprTree, x: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval_x(tree, x + DX) - eval_x(tree, x - DX)) / (2.0 * DX)
    }

    /// Differentiates `function` with respect to `x` and checks the result against a finite
    /// difference of the original at every point.
    fn check_derivative(function: &str, points: &[f64]) {
        const TOL: f64 = 1e-4;
        let tree = parse(function);
        let derived = derivative(&tree, "x").unwrap();

        for &point in points {
            let symbolic = eval_x(&derived, point);
            let numeric = finite_difference(&tree, point);
            assert!(
                (symbolic - numeric).abs() < TOL,
                "for `{function}` at x={point}: symbolic {symbolic}, numeric {numeric}"
            );
        }
    }

    #[test]
    fn constants_and_variables() {
        assert_eq!(derivative(&parse("5"), "x").unwrap().to_string(), "0");
        assert_eq!(derivative(&parse("x"), "x").unwrap().to_string(), "1");
        // other variables are constants
        assert_eq!(derivative(&parse("x"), "y").unwrap().to_string(), "0");
        assert_eq!(derivative(&parse("2^3"), "x").unwrap().to_string(), "0");
    }

    #[test]
    fn polynomials() {
        check_derivative("x^2 + 5*x + 6", &[0.0, 1.0, 2.0, 5.0]);
        check_derivative("x^3", &[-2.0, -1.0, 0.5, 3.0]);
        check_derivative("(x + 1) * (x - 2)", &[0.0, 1.5, 4.0]);
    }

    #[test]
    fn products_and_quotients() {
        check_derivative("x * sin(x)", &[0.0, 0.5, 1.2]);
        check_derivative("sin(x) / x", &[0.5, 1.0, 2.0]);
        check_derivative("x / x", &[0.5, 1.0, 3.0]);
    }

    #[test]
    fn trigonometric() {
        check_derivative("sin(x)", &[0.0, 0.5, 1.0]);
        check_derivative("cos(x)", &[0.0, 0.5, 1.0]);
        check_derivative("tg(x)", &[0.2, 0.6, 1.0]);
        check_derivative("ctg(x)", &[0.4, 0.9, 1.3]);
    }

    #[test]
    fn hyperbolic() {
        check_derivative("sh(x)", &[-1.0, 0.0, 1.0]);
        check_derivative("ch(x)", &[-1.0, 0.0, 1.0]);
        check_derivative("th(x)", &[-0.5, 0.0, 0.5]);
        check_derivative("cth(x)", &[0.5, 1.0, 2.0]);
    }

    #[test]
    fn inverse_trigonometric() {
        check_derivative("arcsin(x)", &[-0.5, 0.0, 0.5]);
        check_derivative("arccos(x)", &[-0.5, 0.0, 0.5]);
        check_derivative("arctg(x)", &[-1.0, 0.0, 2.0]);
        check_derivative("arcctg(x)", &[-1.0, 0.0, 2.0]);
    }

    #[test]
    fn inverse_hyperbolic() {
        check_derivative("arcsh(x)", &[-1.0, 0.0, 1.0]);
        check_derivative("arcch(x)", &[1.5, 2.0, 3.0]);
        check_derivative("arcth(x)", &[-0.5, 0.0, 0.5]);
        check_derivative("arccth(x)", &[1.5, 2.0, 3.0]);
    }

    #[test]
    fn exponential_forms() {
        check_derivative("exp(x)", &[-1.0, 0.0, 1.0]);
        check_derivative("ln(x)", &[0.5, 1.0, 2.0]);
        check_derivative("exp(x^2)", &[-0.5, 0.0, 0.5]);
        // constant base, variable exponent
        check_derivative("2^x", &[0.0, 1.0, 2.0]);
        // both vary
        check_derivative("x^x", &[0.5, 1.0, 2.0]);
    }

    #[test]
    fn chained_functions() {
        check_derivative("sin(cos(x))", &[0.0, 0.5, 1.0]);
        check_derivative("ln(x^2 + 1)", &[-1.0, 0.0, 2.0]);
    }

    #[test]
    fn log_rule_is_literal() {
        // the `log` rule divides by f·ln(f); it is checked structurally because it does not
        // match any fixed-base logarithm derivative
        let derived = derivative(&parse("log(x)"), "x").unwrap();
        assert_eq!(derived.to_string(), "1/(x*ln(x))");
    }

    #[test]
    fn steps_are_collected() {
        let tree = parse("x * x");
        let mut steps = Vec::new();
        derivative_with(&tree, "x", &mut steps).unwrap();
        assert_eq!(
            steps,
            vec![Step {
                source: "x*x".to_string(),
                result: "1*x+x*1".to_string(),
            }]
        );
    }

    #[test]
    fn missing_operand_is_reported() {
        let mut tree = ExprTree::new();
        let x = tree.var("x");
        let malformed = tree.op(OpKind::Mul, Some(x), None);
        tree.set_root(malformed);
        tree.relink_parents();

        assert!(matches!(
            derivative(&tree, "x"),
            Err(DerivativeError::MissingOperand(OpKind::Mul))
        ));
    }

    #[test]
    fn derivative_shares_no_state_with_source() {
        let tree = parse("x * sin(x)");
        let derived = derivative(&tree, "x").unwrap();
        // the source is untouched and still renders the original expression
        assert_eq!(tree.to_string(), "x*sin(x)");
        assert_eq!(derived.to_string(), "1*sin(x)+x*1*cos(x)");
    }
}
