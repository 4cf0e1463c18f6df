//! Comparisons and assignment-style equations

use super::Converter;
use crate::ast::RelOp;
use crate::parser::cst::Relation;
use crate::solve::{has_complex_root, solve_for};
use crate::{Expr, LatexError};

/// Stand-in for the known side while solving `unknown = λ`
const PLACEHOLDER: &str = "λ";

impl Converter<'_> {
    pub(super) fn relation(&self, relation: &Relation) -> Result<Expr, LatexError> {
        match relation {
            Relation::Expr(expr) => self.expr(expr),
            Relation::Compare { lhs, op, rhs } => {
                let lhs = self.relation(lhs)?;
                let rhs = self.relation(rhs)?;
                if self.config.solves_assignments()
                    && let Some(solved) = assignment(*op, &lhs, &rhs)
                {
                    return Ok(solved);
                }
                Ok(Expr::relational(*op, lhs, rhs))
            }
        }
    }
}

/// Pick (unknown side, value side) when the relation reads as an assignment.
///
/// Either exactly one side is a matrix or tuple, or the relation is `=` with
/// one closed-form side and one side in a single free symbol.
fn split_assignment<'e>(op: RelOp, lhs: &'e Expr, rhs: &'e Expr) -> Option<(&'e Expr, &'e Expr)> {
    match (lhs.is_structured(), rhs.is_structured()) {
        (false, true) => Some((lhs, rhs)),
        (true, false) => Some((rhs, lhs)),
        (true, true) => None,
        (false, false) if op == RelOp::Eq => {
            match (lhs.free_symbols().len(), rhs.free_symbols().len()) {
                (1, 0) => Some((lhs, rhs)),
                (0, 1) => Some((rhs, lhs)),
                _ => None,
            }
        }
        (false, false) => None,
    }
}

/// Solve the unknown side for its only free symbol and plug the value side in.
///
/// Solutions that need an even root of a negative number are dropped; with
/// none left the relation is kept as written.
fn assignment(op: RelOp, lhs: &Expr, rhs: &Expr) -> Option<Expr> {
    let (unknown, value) = split_assignment(op, lhs, rhs)?;
    let symbols = unknown.free_symbols();
    let var = match symbols.len() {
        1 => symbols.first()?,
        _ => return None,
    };

    let mut solutions: Vec<Expr> = solve_for(unknown, &Expr::symbol(PLACEHOLDER), var)
        .iter()
        .map(|solution| solution.substitute(PLACEHOLDER, value))
        .filter(|solution| !has_complex_root(solution))
        .collect();
    log::trace!(
        "assignment {} {} {}: {} solution(s) for {}",
        lhs,
        op.symbol(),
        rhs,
        solutions.len(),
        var
    );
    match solutions.len() {
        0 => None,
        1 => solutions.pop(),
        _ => Some(Expr::tuple(solutions)),
    }
}
