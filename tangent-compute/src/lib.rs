//! Symbolic and numerical computation over the expression trees produced by `tangent-parser`.
//!
//! The [`symbolic`] module differentiates a tree with respect to a variable and simplifies the
//! result to a fixed point; the [`numerical`] module evaluates a tree against concrete variable
//! bindings (and doubles as the oracle for the finite-difference tests of the differentiator).

pub mod numerical;
pub mod symbolic;
