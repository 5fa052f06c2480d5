//! Symbolic manipulation of expression trees.
//!
//! # Differentiation
//!
//! [`derivative()`] walks the source tree once and assembles a brand-new tree for the
//! derivative, dispatching on each operator code to its rewrite rule. Operand subtrees a rule
//! needs verbatim (the `g` in `f'·g + f·g'`, say) are deep-copied: the source tree and its
//! derivative never share a node, so either can be mutated or dropped freely afterwards.
//!
//! ```
//! use tangent_compute::symbolic::{derivative, optimize};
//! use tangent_parser::parser::Parser;
//!
//! let tree = Parser::new("x^3").unwrap().parse().unwrap();
//! let mut derived = derivative(&tree, "x").unwrap();
//! optimize(&mut derived).unwrap();
//! assert_eq!(derived.to_string(), "3*x^2");
//! ```
//!
//! # Optimization
//!
//! The derivative rules are deliberately literal, so their output is full of noise like
//! `1*cos(x)` or `x^(2-1)`. [`optimize()`] removes it with two cooperating passes — constant
//! folding and identity elimination — alternated until a whole round changes nothing. Each pass
//! can expose work for the other: folding `2-1` to `1` is what lets `x^1` collapse to `x`.

pub mod derivative;
pub mod optimize;
pub mod step_collector;

pub use derivative::{derivative, derivative_with, DerivativeError, Step};
pub use optimize::{optimize, OptimizeError};
pub use step_collector::StepCollector;
