//! Recursive-descent parsing of the token sequence into an expression tree.
//!
//! The grammar, with one token of lookahead held in the cursor:
//!
//! ```text
//! Goal    := Expr EndMarker
//! Expr    := Term { ('+' | '-') Term }          left-associative
//! Term    := Power { ('*' | '/') Power }        left-associative
//! Power   := Primary [ '^' Power ]              right-associative
//! Primary := ('+' | '-') Power
//!          | '(' Expr ')'
//!          | Number | Variable
//!          | Function Power
//! ```
//!
//! The parser operates directly on the node arena the tokenizer produced: leaf and function
//! tokens are linked in place, and only the infix combination nodes are freshly allocated.

pub mod error;

use crate::tokenizer;
use crate::tree::{ExprTree, Node, NodeId, NodeKind, OpKind};
use error::Error;
use std::ops::Range;
use tangent_error::ErrorKind;

/// Consumes a token sequence and links it into an expression tree.
#[derive(Debug, Clone)]
pub struct Parser {
    /// The tree whose arena doubles as the token stream.
    tree: ExprTree,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl Parser {
    /// Tokenizes the given source. Fails on characters no token pattern accepts.
    pub fn new(source: &str) -> Result<Self, Error> {
        Ok(Self {
            tree: tokenizer::tokenize_nodes(source)?,
            cursor: 0,
        })
    }

    /// Parses the whole expression, installs parent references, and returns the finished tree.
    ///
    /// Anything between the parsed expression and the end-of-input marker is an error; anything
    /// after an explicit `$` marker is ignored.
    pub fn parse(mut self) -> Result<ExprTree, Error> {
        let root = self.expr()?;

        if self.peek_op() != Some(OpKind::End) {
            let found = self.describe(self.cursor);
            return Err(self.error(error::ExpectedEof { found }));
        }

        self.tree.set_root(root);
        self.tree.relink_parents();
        Ok(self.tree)
    }

    /// `Expr := Term { ('+' | '-') Term }`
    fn expr(&mut self) -> Result<NodeId, Error> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_op() {
                Some(op @ (OpKind::Add | OpKind::Sub)) => op,
                _ => break,
            };
            let span = self.span();
            self.cursor += 1;
            let rhs = self.term()?;
            lhs = self.combine(op, span, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `Term := Power { ('*' | '/') Power }`
    fn term(&mut self) -> Result<NodeId, Error> {
        let mut lhs = self.power()?;
        loop {
            let op = match self.peek_op() {
                Some(op @ (OpKind::Mul | OpKind::Div)) => op,
                _ => break,
            };
            let span = self.span();
            self.cursor += 1;
            let rhs = self.power()?;
            lhs = self.combine(op, span, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `Power := Primary [ '^' Power ]` — recursing on the exponent makes `a^b^c` parse as
    /// `a^(b^c)`.
    fn power(&mut self) -> Result<NodeId, Error> {
        let lhs = self.primary()?;
        if self.peek_op() == Some(OpKind::Pow) {
            let span = self.span();
            self.cursor += 1;
            let rhs = self.power()?;
            return Ok(self.combine(OpKind::Pow, span, lhs, rhs));
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<NodeId, Error> {
        match self.peek_kind() {
            // unary plus/minus: the token node becomes the tree node, its left child stays
            // absent, and it applies to a whole power-level operand
            NodeKind::Op(OpKind::Add | OpKind::Sub) => {
                let id = self.bump();
                let operand = self.power()?;
                self.tree.node_mut(id).right = Some(operand);
                Ok(id)
            }
            NodeKind::Op(OpKind::OpenParen) => {
                let open_span = self.span();
                self.cursor += 1;
                let inner = self.expr()?;
                if self.peek_op() != Some(OpKind::CloseParen) {
                    return Err(Error::new(vec![open_span], error::UnclosedParenthesis));
                }
                self.cursor += 1;
                Ok(inner)
            }
            NodeKind::Num(_) => Ok(self.bump()),
            NodeKind::Var(index) => {
                let id = self.bump();
                if self.peek_op() == Some(OpKind::OpenParen) {
                    // a variable in call position reads as a misspelled function name
                    let name = self.tree.vars().name(index).unwrap_or_default().to_owned();
                    let suggestion = OpKind::closest_function(&name).map(str::to_owned);
                    return Err(Error::new(
                        vec![self.tree.node(id).span.clone()],
                        error::UnknownFunction { name, suggestion },
                    ));
                }
                Ok(id)
            }
            // a function token is reused as the tree node and consumes exactly one power-level
            // operand as its right child
            NodeKind::Op(op) if op.is_unary() => {
                let id = self.bump();
                let operand = self.power()?;
                self.tree.node_mut(id).right = Some(operand);
                Ok(id)
            }
            NodeKind::Op(OpKind::End) => Err(self.error(error::UnexpectedEof)),
            NodeKind::Op(_) => {
                let found = self.describe(self.cursor);
                Err(self.error(error::UnexpectedToken {
                    expected: "a number, a variable, a function or `(`",
                    found,
                }))
            }
        }
    }

    /// Appends a combination node for an infix operator. These are the only nodes that do not
    /// reuse token storage.
    fn combine(&mut self, op: OpKind, span: Range<usize>, left: NodeId, right: NodeId) -> NodeId {
        let mut node = Node::spanned(NodeKind::Op(op), span);
        node.left = Some(left);
        node.right = Some(right);
        self.tree.push(node)
    }

    /// The kind of the token under the cursor. Always valid: the end-of-input marker is never
    /// consumed.
    fn peek_kind(&self) -> NodeKind {
        self.tree.node(self.cursor).kind
    }

    fn peek_op(&self) -> Option<OpKind> {
        self.tree.node(self.cursor).op()
    }

    /// The source span of the token under the cursor.
    fn span(&self) -> Range<usize> {
        self.tree.node(self.cursor).span.clone()
    }

    /// Returns the id of the token under the cursor and advances past it.
    fn bump(&mut self) -> NodeId {
        let id = self.cursor;
        self.cursor += 1;
        id
    }

    /// Creates an error pointing at the token under the cursor.
    fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    fn describe(&self, id: NodeId) -> String {
        match self.tree.node(id).kind {
            NodeKind::Num(value) => format!("the number `{}`", value),
            NodeKind::Var(index) => {
                format!("the variable `{}`", self.tree.vars().name(index).unwrap_or("?"))
            }
            NodeKind::Op(OpKind::End) => "the end of the expression".to_owned(),
            NodeKind::Op(op) => format!("`{}`", op.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::verify::verify;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> ExprTree {
        Parser::new(input).unwrap().parse().unwrap()
    }

    fn parse_err(input: &str) -> Error {
        match Parser::new(input).and_then(Parser::parse) {
            Ok(tree) => panic!("`{input}` unexpectedly parsed as `{tree}`"),
            Err(err) => err,
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let tree = parse("1 + 2 * 3");
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).op(), Some(OpKind::Add));
        let product = tree.node(root).right.unwrap();
        assert_eq!(tree.node(product).op(), Some(OpKind::Mul));
    }

    #[test]
    fn power_is_right_associative() {
        let tree = parse("a ^ b ^ c");
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).op(), Some(OpKind::Pow));
        let exponent = tree.node(root).right.unwrap();
        assert_eq!(tree.node(exponent).op(), Some(OpKind::Pow));
        assert_eq!(tree.to_string(), "a^b^c");
    }

    #[test]
    fn unary_minus_binds_at_power_level() {
        let tree = parse("-x * y");
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).op(), Some(OpKind::Mul));
        let negation = tree.node(root).left.unwrap();
        assert_eq!(tree.node(negation).op(), Some(OpKind::Sub));
        assert_eq!(tree.node(negation).left, None);
    }

    #[test]
    fn function_consumes_one_power_operand() {
        // the exponent binds into the function argument
        let tree = parse("sin(x)^2");
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).op(), Some(OpKind::Sin));
        assert_eq!(tree.to_string(), "sin(x^2)");
    }

    #[test]
    fn leaf_tokens_are_reused_as_tree_nodes() {
        // `sin ( x ) $` tokenizes to five nodes and parsing allocates nothing new
        let tree = parse("sin(x)");
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root(), Some(0));

        // `1 + 2 $` adds exactly one combination node
        let tree = parse("1 + 2");
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root(), Some(4));
    }

    #[test]
    fn explicit_end_marker() {
        assert_eq!(parse("x + 1 $").to_string(), "x+1");
        // tokens after the marker are never looked at
        assert_eq!(parse("x $ y").to_string(), "x");
    }

    #[test]
    fn parse_then_verify_holds() {
        for input in [
            "x",
            "3.5",
            "x + y * z",
            "-(x + 1) ^ 2",
            "sin(x) * ln(x / 2)",
            "arccth(x ^ 2 - 1)",
        ] {
            let tree = parse(input);
            assert_eq!(verify(&tree), Ok(()), "verify failed for `{input}`");
        }
    }

    #[test]
    fn rejects_unclosed_parenthesis() {
        let err = parse_err("(x + 1");
        assert!(err.kind.as_any().downcast_ref::<error::UnclosedParenthesis>().is_some());
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn rejects_missing_operand() {
        let err = parse_err("x +");
        assert!(err.kind.as_any().downcast_ref::<error::UnexpectedEof>().is_some());
    }

    #[test]
    fn rejects_trailing_input() {
        let err = parse_err("x y");
        assert!(err.kind.as_any().downcast_ref::<error::ExpectedEof>().is_some());
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse_err("");
        assert!(err.kind.as_any().downcast_ref::<error::UnexpectedEof>().is_some());
    }

    #[test]
    fn suggests_function_names() {
        let err = parse_err("six(x)");
        let kind = err.kind.as_any().downcast_ref::<error::UnknownFunction>().unwrap();
        assert_eq!(kind.name, "six");
        assert_eq!(kind.suggestion.as_deref(), Some("sin"));
    }
}
