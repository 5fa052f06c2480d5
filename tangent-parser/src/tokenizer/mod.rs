pub mod token;

use crate::parser::error::InvalidCharacter;
use crate::tree::{ExprTree, Node, NodeKind, OpKind};
use logos::{Lexer, Logos};
use tangent_error::Error;
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer.
///
/// The returned sequence is always logically terminated: when the source does not end with an
/// explicit `$`, a zero-width end-of-input marker is appended.
pub fn tokenize_complete(input: &str) -> Result<Vec<Token<'_>>, Error> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token {
                span: lexer.span(),
                kind,
                lexeme: lexer.slice(),
            }),
            Err(()) => {
                let ch = lexer.slice().chars().next().unwrap_or('\0');
                return Err(Error::new(vec![lexer.span()], InvalidCharacter { ch }));
            }
        }
    }

    let terminated = tokens
        .iter()
        .rev()
        .find(|token| !token.is_whitespace())
        .is_some_and(|token| token.kind == TokenKind::End);
    if !terminated {
        tokens.push(Token {
            span: input.len()..input.len(),
            kind: TokenKind::End,
            lexeme: "",
        });
    }

    Ok(tokens)
}

/// Tokenizes the input and materializes every non-whitespace token as an (unlinked) node of a
/// fresh expression tree, interning variable names along the way. The parser later links these
/// very slots into a tree; token storage and node storage are one and the same.
pub fn tokenize_nodes(input: &str) -> Result<ExprTree, Error> {
    let tokens = tokenize_complete(input)?;
    let mut tree = ExprTree::new();

    for token in &tokens {
        let kind = match token.kind {
            TokenKind::Whitespace => continue,
            TokenKind::Num => NodeKind::Num(number_value(token.lexeme)),
            TokenKind::Name => match OpKind::from_name(token.lexeme) {
                Some(op) => NodeKind::Op(op),
                None => NodeKind::Var(tree.intern_var(token.lexeme)),
            },
            TokenKind::Add => NodeKind::Op(OpKind::Add),
            TokenKind::Sub => NodeKind::Op(OpKind::Sub),
            TokenKind::Mul => NodeKind::Op(OpKind::Mul),
            TokenKind::Div => NodeKind::Op(OpKind::Div),
            TokenKind::Caret => NodeKind::Op(OpKind::Pow),
            TokenKind::OpenParen => NodeKind::Op(OpKind::OpenParen),
            TokenKind::CloseParen => NodeKind::Op(OpKind::CloseParen),
            TokenKind::End => NodeKind::Op(OpKind::End),
        };
        tree.push(Node::spanned(kind, token.span.clone()));
    }

    Ok(tree)
}

/// Numeric value of a number lexeme.
///
/// Integer and fractional digits are accumulated into one magnitude, which is divided by the
/// *count* of fractional digits when any exist: `3.25` reads as `325 / 2`, not `3.25`. This is
/// not decimal notation, but every consumer of number payloads only depends on the mapping being
/// consistent.
pub(crate) fn number_value(lexeme: &str) -> f64 {
    let (int_part, frac_part) = match lexeme.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (lexeme, ""),
    };

    let mut magnitude = 0.0;
    for digit in int_part.bytes().chain(frac_part.bytes()) {
        magnitude = magnitude * 10.0 + f64::from(digit - b'0');
    }

    if frac_part.is_empty() {
        magnitude
    } else {
        magnitude / frac_part.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<const N: usize>(input: &str, expected: [(TokenKind, &str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Num, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Num, "2"),
            ],
        );
    }

    #[test]
    fn functions_and_variables() {
        compare_tokens(
            "sin(x_1) * velocity $",
            [
                (TokenKind::Name, "sin"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x_1"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Mul, "*"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "velocity"),
                (TokenKind::Whitespace, " "),
                (TokenKind::End, "$"),
            ],
        );
    }

    #[test]
    fn end_marker_is_appended() {
        let tokens = tokenize_complete("x + 1").unwrap();
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::End);
        assert_eq!(last.span, 5..5);
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize_complete("2 # 3").unwrap_err();
        assert_eq!(err.spans, vec![2..3]);
        assert!(err.kind.as_any().downcast_ref::<InvalidCharacter>().is_some());
    }

    #[test]
    fn uppercase_is_rejected() {
        assert!(tokenize_complete("Sin(x)").is_err());
    }

    #[test]
    fn number_values_divide_by_digit_count() {
        // fractional digits divide the whole magnitude by their count
        assert_eq!(number_value("3.5"), 35.0);
        assert_eq!(number_value("3.25"), 162.5);
        assert_eq!(number_value("10"), 10.0);
        assert_eq!(number_value("3."), 3.0);
        assert_eq!(number_value("0.125"), 125.0 / 3.0);
    }

    #[test]
    fn variables_are_interned_in_first_seen_order() {
        let tree = tokenize_nodes("a + b * a + c").unwrap();
        let names: Vec<_> = tree.vars().names().collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
