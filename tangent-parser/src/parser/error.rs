//! Error kinds reported by the tokenizer and parser. All of them are fatal: parsing never
//! recovers or returns a partial tree.

use ariadne::Fmt;
use tangent_attrs::ErrorKind;
use tangent_error::{ErrorKind, EXPR};

pub use tangent_error::Error;

/// A character no token pattern accepts.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the character `{}` cannot appear in an expression", ch),
    labels = ["here"],
    help = "expressions are built from numbers, lowercase names, `+ - * / ^ ( )` and the `$` end marker",
)]
pub struct InvalidCharacter {
    /// The offending character.
    pub ch: char,
}

/// The end of the expression was reached where an operand was expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of expression",
    labels = [format!("you might need to add another {} here", "operand".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The expression ended, but more tokens follow.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected the end of the expression",
    labels = [format!("I could not understand {} here", found.fg(EXPR))],
)]
pub struct ExpectedEof {
    /// A description of the token that was found instead.
    pub found: String,
}

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected {}, found {}", expected, found.fg(EXPR))],
)]
pub struct UnexpectedToken {
    /// A description of the token(s) that were expected.
    pub expected: &'static str,

    /// A description of the token that was found.
    pub found: String,
}

/// A parenthesis was opened but never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = "add a closing parenthesis `)` somewhere after this",
)]
pub struct UnclosedParenthesis;

/// A variable was applied like a function, e.g. `six(x)`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a known function", name),
    labels = ["used like a function here"],
    help = match suggestion {
        Some(suggestion) => format!("did you mean `{}`?", suggestion.fg(EXPR)),
        None => "only the built-in function names can be applied to an operand".to_string(),
    },
)]
pub struct UnknownFunction {
    /// The name that was applied.
    pub name: String,

    /// The closest known function name, if any is close.
    pub suggestion: Option<String>,
}
