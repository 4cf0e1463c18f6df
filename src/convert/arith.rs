//! Operator levels from additive down to components

use super::{Converter, Term};
use crate::ExprKind;
use crate::matrix::Matrix;
use crate::parser::cst::{AddOp, Additive, Comp, Exp, Mp, MulOp, Unary};
use crate::{Expr, LatexError};

impl Converter<'_> {
    pub(super) fn expr(&self, expr: &Additive) -> Result<Expr, LatexError> {
        // Unwind the left spine first, then fold the operands back in order
        let mut links = Vec::new();
        let mut node = expr;
        let mut value = loop {
            match node {
                Additive::Binary { lhs, op, rhs } => {
                    links.push((*op, rhs));
                    node = lhs;
                }
                Additive::Mp(mp) => break self.mp(mp)?,
            }
        };
        while let Some((op, rhs)) = links.pop() {
            let rhs = self.expr(rhs)?;
            value = match op {
                AddOp::Add => Expr::add_expr(value, rhs),
                AddOp::Sub => Expr::sub_expr(value, rhs),
            };
        }
        Ok(value)
    }

    pub(super) fn mp(&self, mp: &Mp) -> Result<Expr, LatexError> {
        let mut links = Vec::new();
        let mut node = mp;
        let mut value = loop {
            match node {
                Mp::Binary { lhs, op, rhs } => {
                    links.push((*op, rhs));
                    node = lhs;
                }
                Mp::Unary(unary) => break self.unary(unary)?,
            }
        };
        while let Some((op, rhs)) = links.pop() {
            let rhs = self.mp(rhs)?;
            value = match op {
                MulOp::Mul => Expr::mul_expr(value, rhs),
                MulOp::Div => Expr::div_expr(value, rhs),
            };
        }
        Ok(value)
    }

    pub(super) fn unary(&self, unary: &Unary) -> Result<Expr, LatexError> {
        match unary {
            Unary::Plus(inner) => self.unary(inner),
            Unary::Minus(inner) => {
                let value = self.unary(inner)?;
                // `-1` is a literal, not `-1 * 1`
                if value.is_one_num() {
                    Ok(Expr::integer(-1))
                } else {
                    Ok(Expr::negate(value))
                }
            }
            Unary::Postfix(items) => self.postfix_list(items),
        }
    }

    pub(super) fn exp(&self, exp: &Exp) -> Result<Term, LatexError> {
        match exp {
            Exp::Comp(comp) => self.comp(comp),
            Exp::Power { base, exponent } => {
                let Term::Expr(base) = self.exp(base)? else {
                    return Err(LatexError::CannotRaiseDerivative);
                };
                let exponent = self.script(exponent)?;
                Ok(Term::Expr(Expr::pow(base, exponent)))
            }
        }
    }

    pub(super) fn comp(&self, comp: &Comp) -> Result<Term, LatexError> {
        let expr = match comp {
            Comp::Group { expr, .. } => group_value(self.expr(expr)?)?,
            Comp::Abs(inner) => Expr::func("abs", self.expr(inner)?),
            Comp::Func(func) => self.func(func)?,
            Comp::Atom(atom) => self.atom(atom)?,
            Comp::Frac { upper, lower } => return self.frac(upper, lower),
            Comp::Binom { n, k } => {
                Expr::func_multi("binomial", vec![self.expr(n)?, self.expr(k)?])
            }
            Comp::Floor(inner) => Expr::func("floor", self.expr(inner)?),
            Comp::Ceil(inner) => Expr::func("ceiling", self.expr(inner)?),
        };
        Ok(Term::Expr(expr))
    }
}

/// A tuple inside a group becomes a matrix: rows when every item is itself a
/// tuple, a single column otherwise
fn group_value(value: Expr) -> Result<Expr, LatexError> {
    let ExprKind::Tuple(items) = &value.kind else {
        return Ok(value);
    };
    let rows: Option<Vec<Vec<Expr>>> = items
        .iter()
        .map(|item| match &item.kind {
            ExprKind::Tuple(row) => Some(row.clone()),
            _ => None,
        })
        .collect();
    let matrix = match rows {
        Some(rows) if !rows.is_empty() => Matrix::from_rows(rows)?,
        _ => Matrix::column(items.clone()),
    };
    Ok(Expr::matrix(matrix))
}
