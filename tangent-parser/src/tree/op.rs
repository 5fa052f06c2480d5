//! The closed set of operator codes stored in operator nodes.

use levenshtein::levenshtein;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// The name table used to resolve identifier tokens to operator codes. Identifiers that do not
/// appear here become variables.
static FUNCTIONS: Lazy<HashMap<&'static str, OpKind>> = Lazy::new(|| {
    use OpKind::*;
    HashMap::from([
        ("log", Log),
        ("ln", Ln),
        ("exp", Exp),
        ("sin", Sin),
        ("cos", Cos),
        ("tg", Tan),
        ("ctg", Cot),
        ("sh", Sinh),
        ("ch", Cosh),
        ("th", Tanh),
        ("cth", Coth),
        ("arcsin", Arcsin),
        ("arccos", Arccos),
        ("arctg", Arctan),
        ("arcctg", Arccot),
        ("arcsh", Arcsinh),
        ("arcch", Arccosh),
        ("arcth", Arctanh),
        ("arccth", Arccoth),
    ])
});

/// The operation performed by an operator node.
///
/// The last three codes are structural: they only ever appear in token slots and never survive
/// past parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Log,
    Ln,
    Exp,
    Sin,
    Cos,
    Tan,
    Cot,
    Sinh,
    Cosh,
    Tanh,
    Coth,
    Arcsin,
    Arccos,
    Arctan,
    Arccot,
    Arcsinh,
    Arccosh,
    Arctanh,
    Arccoth,
    OpenParen,
    CloseParen,
    End,
}

impl OpKind {
    /// Resolves a spelled-out function name to its operator code.
    pub fn from_name(name: &str) -> Option<Self> {
        FUNCTIONS.get(name).copied()
    }

    /// Returns the known function name closest to `name`, if any is close enough to plausibly be
    /// a typo of it.
    pub fn closest_function(name: &str) -> Option<&'static str> {
        FUNCTIONS
            .keys()
            .map(|&candidate| (levenshtein(name, candidate), candidate))
            .filter(|&(distance, _)| distance <= 2)
            .min_by_key(|&(distance, _)| distance)
            .map(|(_, candidate)| candidate)
    }

    /// Returns the rendering precedence of the operator. Operators that never need enclosing
    /// parentheses (the function operators and the structural codes) have precedence `-1`.
    pub fn precedence(&self) -> i32 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 3,
            _ => -1,
        }
    }

    /// Returns true for the function operators, which take exactly one operand held in the right
    /// child.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Self::Log
                | Self::Ln
                | Self::Exp
                | Self::Sin
                | Self::Cos
                | Self::Tan
                | Self::Cot
                | Self::Sinh
                | Self::Cosh
                | Self::Tanh
                | Self::Coth
                | Self::Arcsin
                | Self::Arccos
                | Self::Arctan
                | Self::Arccot
                | Self::Arcsinh
                | Self::Arccosh
                | Self::Arctanh
                | Self::Arccoth
        )
    }

    /// Returns true for the operators that require both children. `+` and `-` are absent: their
    /// left child is optional (unary plus/minus).
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Mul | Self::Div | Self::Pow)
    }

    /// Returns true for the parser-only structural codes.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::OpenParen | Self::CloseParen | Self::End)
    }

    /// The surface spelling of the operator, matching what the tokenizer accepts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Exp => "exp",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tg",
            Self::Cot => "ctg",
            Self::Sinh => "sh",
            Self::Cosh => "ch",
            Self::Tanh => "th",
            Self::Coth => "cth",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctg",
            Self::Arccot => "arcctg",
            Self::Arcsinh => "arcsh",
            Self::Arccosh => "arcch",
            Self::Arctanh => "arcth",
            Self::Arccoth => "arccth",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::End => "$",
        }
    }

    /// The LaTeX command rendering this operator. Function names LaTeX has no command for fall
    /// back to `\operatorname`.
    pub fn latex_name(&self) -> &'static str {
        match self {
            Self::Log => "\\log",
            Self::Ln => "\\ln",
            Self::Exp => "\\exp",
            Self::Sin => "\\sin",
            Self::Cos => "\\cos",
            Self::Tan => "\\tan",
            Self::Cot => "\\cot",
            Self::Sinh => "\\sinh",
            Self::Cosh => "\\cosh",
            Self::Tanh => "\\tanh",
            Self::Coth => "\\coth",
            Self::Arcsin => "\\arcsin",
            Self::Arccos => "\\arccos",
            Self::Arctan => "\\arctan",
            Self::Arccot => "\\operatorname{arccot}",
            Self::Arcsinh => "\\operatorname{arcsinh}",
            Self::Arccosh => "\\operatorname{arccosh}",
            Self::Arctanh => "\\operatorname{arctanh}",
            Self::Arccoth => "\\operatorname{arccoth}",
            _ => self.name(),
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_resolution() {
        assert_eq!(OpKind::from_name("sin"), Some(OpKind::Sin));
        assert_eq!(OpKind::from_name("arccth"), Some(OpKind::Arccoth));
        assert_eq!(OpKind::from_name("tan"), None);
        assert_eq!(OpKind::from_name("x"), None);
    }

    #[test]
    fn typo_suggestions() {
        assert_eq!(OpKind::closest_function("sim"), Some("sin"));
        assert_eq!(OpKind::closest_function("arcsinn"), Some("arcsin"));
        assert_eq!(OpKind::closest_function("somethingelse"), None);
    }
}
