//! Postfix operators and implicit multiplication

use super::{Converter, Term};
use crate::parser::cst::{EvalAtBound, Postfix, PostfixOp};
use crate::{Expr, LatexError};

impl Converter<'_> {
    /// Resolve juxtaposed terms into one expression.
    ///
    /// Terms multiply right-nested (`a b c` is `a*(b*c)`). A pending
    /// `\frac{d}{dx}` takes everything after it as its target.
    pub(super) fn postfix_list(&self, items: &[Postfix]) -> Result<Expr, LatexError> {
        let terms = items
            .iter()
            .map(|item| self.postfix(item))
            .collect::<Result<Vec<_>, _>>()?;

        let mut rest: Option<Expr> = None;
        for (i, term) in terms.iter().enumerate().rev() {
            rest = Some(match (term, rest) {
                (Term::Expr(value), None) => value.clone(),
                (Term::Differential { .. }, None) => {
                    return Err(LatexError::MissingDerivativeTarget);
                }
                (Term::Differential { var, order }, Some(target)) => {
                    Expr::derivative(target, var.clone(), order.clone())
                }
                (Term::Expr(value), Some(target)) => {
                    if self.config.uses_times_sign_heuristic() && is_times_sign(&terms, i) {
                        log::trace!("reading `x` between closed forms as a times sign");
                        target
                    } else {
                        Expr::mul_expr(value.clone(), target)
                    }
                }
            });
        }
        rest.ok_or(LatexError::IndexOutOfBounds)
    }

    fn postfix(&self, item: &Postfix) -> Result<Term, LatexError> {
        let mut term = self.exp(&item.exp)?;
        for op in &item.ops {
            let Term::Expr(value) = term else {
                return Err(LatexError::CannotApplyPostfix);
            };
            term = Term::Expr(match op {
                PostfixOp::Bang => Expr::func("factorial", value),
                PostfixOp::EvalAt { sup, sub } => {
                    self.eval_at(&value, sup.as_ref(), sub.as_ref())?
                }
            });
        }
        Ok(term)
    }

    /// `value|_{a}^{b}`: the substitution at `b` minus the one at `a`
    fn eval_at(
        &self,
        value: &Expr,
        sup: Option<&EvalAtBound>,
        sub: Option<&EvalAtBound>,
    ) -> Result<Expr, LatexError> {
        let upper = sup.map(|bound| self.substitute_bound(value, bound)).transpose()?;
        let lower = sub.map(|bound| self.substitute_bound(value, bound)).transpose()?;
        Ok(match (upper, lower) {
            (Some(upper), Some(lower)) => Expr::sub_expr(upper, lower),
            (Some(single), None) | (None, Some(single)) => single,
            (None, None) => value.clone(),
        })
    }

    /// Plug one bound into `value`.
    ///
    /// An equality bound (`x = 2`) replaces its left side. A plain bound
    /// replaces the first free symbol of `value` in lexical order, not a
    /// symbol taken from the bound, so `x^2|_{a}` gives `a^2`.
    fn substitute_bound(&self, value: &Expr, bound: &EvalAtBound) -> Result<Expr, LatexError> {
        let at = match bound {
            EvalAtBound::Equality(equality) => {
                let lhs = self.expr(&equality.lhs)?;
                let rhs = self.expr(&equality.rhs)?;
                return Ok(value.replace(&lhs, &rhs));
            }
            EvalAtBound::Expr(expr) => self.expr(expr)?,
            EvalAtBound::Atom(atom) => self.atom(atom)?,
        };
        match value.free_symbols().first() {
            Some(var) => Ok(value.substitute(var, &at)),
            None => Ok(value.clone()),
        }
    }
}

/// A lone `x` between two terms with no free symbols, as in `2 x 3`
fn is_times_sign(terms: &[Term], i: usize) -> bool {
    let closed = |term: Option<&Term>| match term {
        Some(Term::Expr(value)) => value.free_symbols().is_empty(),
        _ => false,
    };
    let is_x = matches!(&terms[i], Term::Expr(value) if value.as_symbol() == Some("x"));
    i > 0 && is_x && closed(terms.get(i - 1)) && closed(terms.get(i + 1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use crate::{Expr, ExprKind, LatexError, parse_latex};

    #[test]
    fn test_juxtaposition_nests_to_the_right() {
        let expr = parse_latex("abc").unwrap();
        let ExprKind::Mul(a, rest) = &expr.kind else {
            panic!("expected Mul");
        };
        assert_eq!(a.as_symbol(), Some("a"));
        assert!(matches!(rest.kind, ExprKind::Mul(_, _)));
        assert_eq!(expr.to_string(), "a*b*c");
    }

    #[test]
    fn test_times_sign_needs_closed_neighbours() {
        assert_eq!(parse_latex("2 x 3").unwrap().to_string(), "2*3");
        assert_eq!(parse_latex("2 x y").unwrap().to_string(), "2*x*y");
        assert_eq!(parse_latex("x 3").unwrap().to_string(), "x*3");
        assert_eq!(parse_latex("2 y 3").unwrap().to_string(), "2*y*3");
    }

    #[test]
    fn test_factorial() {
        assert_eq!(parse_latex("n!").unwrap().to_string(), "factorial(n)");
        assert_eq!(
            parse_latex("n!!").unwrap().to_string(),
            "factorial(factorial(n))"
        );
    }

    #[test]
    fn test_derivative_placeholder_takes_the_rest() {
        let expr = parse_latex("\\frac{d}{dx} x y").unwrap();
        assert_eq!(expr.to_string(), "Derivative(x*y, x)");
        assert_eq!(
            parse_latex("2 \\frac{d}{dx}"),
            Err(LatexError::MissingDerivativeTarget)
        );
        assert_eq!(
            parse_latex("\\frac{d}{dx}! x"),
            Err(LatexError::CannotApplyPostfix)
        );
    }

    #[test]
    fn test_eval_at_both_bounds() {
        let expr = parse_latex("x^2 \\Big|_{0}^{1}").unwrap();
        assert_eq!(expr.to_string(), "1^2 - 0^2");
    }

    #[test]
    fn test_eval_at_single_bound_and_equality() {
        assert_eq!(parse_latex("x^2|_{2}").unwrap().to_string(), "2^2");
        assert_eq!(parse_latex("(x+y)|_{y=3}").unwrap().to_string(), "x + 3");
        // A plain bound replaces the lexically first symbol of the value
        assert_eq!(parse_latex("(y + x)|_{a}").unwrap().to_string(), "y + a");
        // Nothing to substitute into
        assert_eq!(parse_latex("5|_{2}").unwrap(), Expr::integer(5));
    }
}
