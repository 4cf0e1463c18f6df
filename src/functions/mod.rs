//! Function registry and the static name tables used by the transducer
//!
//! The registry is the single source of truth for evaluation and derivative
//! rules; `families` holds the LaTeX-facing name sets.

use crate::number::Number;
use crate::{Expr, ExprKind};

pub(crate) mod definitions;
pub mod families;
pub(crate) mod registry;

// ===== Folding builders =====
// Used wherever the crate itself synthesizes expressions (derivatives, solver,
// determinants). Parsed input never goes through these.

/// Add, folding two numbers and dropping a zero operand
pub(crate) fn add_opt(a: Expr, b: Expr) -> Expr {
    match (&a.kind, &b.kind) {
        (ExprKind::Number(x), ExprKind::Number(y)) => Expr::number(x.add(y)),
        (ExprKind::Number(x), _) if x.is_zero() => b,
        (_, ExprKind::Number(y)) if y.is_zero() => a,
        _ => Expr::add_expr(a, b),
    }
}

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    match (&a.kind, &b.kind) {
        (ExprKind::Number(x), ExprKind::Number(y)) => Expr::number(x.mul(y)),
        (ExprKind::Number(x), _) if x.is_zero() => Expr::number(Number::zero()),
        (_, ExprKind::Number(y)) if y.is_zero() => Expr::number(Number::zero()),
        (ExprKind::Number(x), _) if x.is_one() => b,
        (_, ExprKind::Number(y)) if y.is_one() => a,
        _ => Expr::mul_expr(a, b),
    }
}

/// Power, folding exact integer powers of numbers and trivial exponents
pub(crate) fn pow_opt(base: Expr, exponent: Expr) -> Expr {
    if exponent.is_zero_num() {
        return Expr::integer(1);
    }
    if exponent.is_one_num() || base.is_one_num() {
        return base;
    }
    if let (Some(b), Some(e)) = (base.as_number(), exponent.as_number())
        && let Some(power) = e.as_i64().and_then(|e| b.powi(e))
    {
        return Expr::number(power);
    }
    Expr::pow(base, exponent)
}

/// Negate an expression, unwrapping an existing `-1 * x`
pub(crate) fn neg(e: Expr) -> Expr {
    if let ExprKind::Mul(left, right) = &e.kind
        && left.is_neg_one_num()
    {
        return right.as_ref().clone();
    }
    mul_opt(Expr::integer(-1), e)
}

pub(crate) fn sub_opt(a: Expr, b: Expr) -> Expr {
    add_opt(a, neg(b))
}

pub(crate) fn div_opt(a: Expr, b: Expr) -> Expr {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number())
        && let Some(q) = x.div(y)
    {
        return Expr::number(q);
    }
    mul_opt(a, pow_opt(b, Expr::integer(-1)))
}

/// `e ^ (1/2)`
pub(crate) fn sqrt(e: Expr) -> Expr {
    Expr::pow(e, Expr::number(Number::half()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folding() {
        let x = Expr::symbol("x");
        assert_eq!(add_opt(Expr::integer(2), Expr::integer(3)), Expr::integer(5));
        assert_eq!(add_opt(Expr::integer(0), x.clone()), x);
        assert_eq!(mul_opt(Expr::integer(0), x.clone()), Expr::integer(0));
        assert_eq!(mul_opt(x.clone(), Expr::integer(1)), x);
        assert_eq!(pow_opt(Expr::integer(2), Expr::integer(3)), Expr::integer(8));
        assert_eq!(pow_opt(x.clone(), Expr::integer(1)), x);
        assert_eq!(sub_opt(Expr::integer(2), Expr::integer(5)), Expr::integer(-3));
        assert_eq!(neg(Expr::negate(x.clone())), x);
        assert_eq!(
            div_opt(Expr::integer(1), Expr::integer(4)),
            Expr::number(Number::ratio(1, 4).unwrap_or_else(Number::zero))
        );
    }

    #[test]
    fn test_symbolic_operands_stay_unevaluated() {
        let x = Expr::symbol("x");
        assert!(matches!(
            add_opt(x.clone(), Expr::integer(1)).kind,
            ExprKind::Add(_, _)
        ));
        assert!(matches!(
            pow_opt(x, Expr::integer(2)).kind,
            ExprKind::Pow(_, _)
        ));
    }
}
