//! LaTeX to Symbolic Expression Library
//!
//! Converts LaTeX mathematical notation into unevaluated symbolic expression
//! trees. Nothing is simplified on the way in: `x + x` stays `x + x`, and
//! `\frac{d}{dx} x^2` becomes a `Derivative` node, not `2*x`.
//!
//! # Features
//! - Arithmetic, relations, fractions, roots, binomials and absolute values
//! - Calculus constructs: integrals, sums, products, limits, derivatives in
//!   Leibniz, prime and dot notation, evaluation bars
//! - Matrices, determinants, arrays, bra/ket notation
//! - Assignment-style relations solved for their single unknown
//! - Exact rational numbers (`0.5` is `1/2`)
//! - Numeric evaluation and symbolic differentiation of the result
//!
//! # Usage
//! ```
//! use symb_latex::parse_latex;
//!
//! let expr = parse_latex(r"\frac{x^2}{2}").unwrap();
//! assert_eq!(expr.to_string(), "x^2/2");
//!
//! let integral = parse_latex(r"\int_0^1 x\,dx").unwrap();
//! assert_eq!(integral.to_string(), "Integral(x, (x, 0, 1))");
//! ```
//!
//! ## Builder
//! ```
//! use symb_latex::Latex;
//!
//! let expr = Latex::new()
//!     .max_depth(50)
//!     .times_sign_heuristic(false)
//!     .parse("2 x 3")
//!     .unwrap();
//! assert_eq!(expr.to_string(), "2*x*3");
//! ```

mod ast;
mod builder;
mod convert;
mod differentiation;
mod display;
mod error;
mod evaluate;
pub mod functions;
mod helpers;
pub(crate) mod math;
mod matrix;
mod number;
mod parser;
mod solve;
pub mod traits;
pub mod visitor;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{Bounds, Constant, Expr, ExprKind, LimitDirection, RelOp};
pub use builder::Latex;
pub use error::{Diagnostic, LatexError, Span};
pub use helpers::{evaluate_str, gradient, gradient_str, hessian, hessian_str, jacobian, jacobian_str};
pub use matrix::Matrix;
pub use number::Number;

/// Default maximum expression depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum expression node count
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Main API function: convert a LaTeX string into an expression tree
///
/// Uses the default configuration; see [`Latex`] for the knobs.
///
/// # Errors
/// [`LatexError::EmptyInput`] for blank input, [`LatexError::Syntax`] with a
/// caret diagnostic for malformed input, and a semantic variant for
/// well-formed input that has no meaning (e.g. `\frac{d}{dx}` with nothing
/// to differentiate).
///
/// # Example
/// ```
/// use symb_latex::{LatexError, parse_latex};
///
/// assert_eq!(parse_latex(r"\sin^{-1}(x)").unwrap().to_string(), "asin(x)");
/// assert!(matches!(parse_latex("x +"), Err(LatexError::Syntax(_))));
/// ```
pub fn parse_latex(input: &str) -> Result<Expr, LatexError> {
    Latex::new()
        .max_depth(DEFAULT_MAX_DEPTH)
        .max_nodes(DEFAULT_MAX_NODES)
        .parse(input)
}
