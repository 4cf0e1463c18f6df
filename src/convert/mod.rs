//! Concrete syntax tree to expression conversion
//!
//! One method per grammar rule on [`Converter`], split by concern:
//! - `relation`: comparisons and assignment solving
//! - `arith`: additive, multiplicative, unary, power and component levels
//! - `postfix`: `!`, evaluation bars and implicit multiplication
//! - `atom`: leaves
//! - `differential`: differential tokens and derivative fractions
//! - `named`: functions, integrals, sums, products and limits
//!
//! Every node is built unevaluated. The folding helpers in `functions` are
//! only reached where the notation itself asks for a value, such as the
//! determinant of a `vmatrix` or the solutions of an assignment.

mod arith;
mod atom;
mod differential;
mod named;
mod postfix;
mod relation;

use crate::builder::Latex;
use crate::parser::cst::{Relation, Script};
use crate::{Expr, LatexError};

/// Result of converting one postfix term
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Term {
    Expr(Expr),
    /// `\frac{d}{dx}` waiting for the expression it differentiates
    Differential { var: String, order: Expr },
}

/// Walks a concrete syntax tree and builds the expression it denotes
pub(crate) struct Converter<'c> {
    config: &'c Latex,
}

impl<'c> Converter<'c> {
    pub(crate) fn new(config: &'c Latex) -> Self {
        Converter { config }
    }

    /// Convert the root `relation` of a parse
    pub(crate) fn math(&self, root: &Relation) -> Result<Expr, LatexError> {
        self.relation(root)
    }

    /// Argument of `_` or `^`
    fn script(&self, script: &Script) -> Result<Expr, LatexError> {
        match script {
            Script::Atom(atom) => self.atom(atom),
            Script::Expr(expr) => self.expr(expr),
        }
    }

    /// `name_{sub}` with the subscript rendered as text
    fn subscripted(&self, name: &str, sub: Option<&Script>) -> Result<String, LatexError> {
        match sub {
            Some(sub) => Ok(format!("{}_{{{}}}", name, self.script(sub)?)),
            None => Ok(name.to_string()),
        }
    }
}
