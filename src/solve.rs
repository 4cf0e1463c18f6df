//! Equation solving for a single variable
//!
//! Enough algebra for assignment-style relations: the unknown is isolated by
//! undoing the operations around its only occurrence, and anything else is
//! tried as a polynomial of degree at most two. Results are built with the
//! folding helpers, so numeric parts collapse (`2x = 6` gives `3`).

use std::collections::HashMap;

use crate::ast::Constant;
use crate::functions::{add_opt, div_opt, families, mul_opt, neg, pow_opt, sub_opt};
use crate::number::Number;
use crate::{Expr, ExprKind};

/// Solutions of `lhs = rhs` for `var`, in a fixed order.
///
/// `rhs` must not depend on `var`. An empty result means no solution was
/// found, not that none exists.
pub(crate) fn solve_for(lhs: &Expr, rhs: &Expr, var: &str) -> Vec<Expr> {
    if rhs.contains_var(var) {
        return polynomial_roots(&Expr::sub_expr(lhs.clone(), rhs.clone()), &Expr::integer(0), var);
    }
    isolate(lhs, rhs.clone(), var)
}

fn isolate(lhs: &Expr, rhs: Expr, var: &str) -> Vec<Expr> {
    if lhs.as_symbol() == Some(var) {
        return vec![rhs];
    }
    match &lhs.kind {
        ExprKind::Add(a, b) => match (a.contains_var(var), b.contains_var(var)) {
            (true, false) => isolate(a, sub_opt(rhs, b.as_ref().clone()), var),
            (false, true) => isolate(b, sub_opt(rhs, a.as_ref().clone()), var),
            (true, true) => polynomial_roots(lhs, &rhs, var),
            (false, false) => Vec::new(),
        },
        ExprKind::Mul(a, b) => match (a.contains_var(var), b.contains_var(var)) {
            (true, false) if !b.is_zero_num() => isolate(a, div_opt(rhs, b.as_ref().clone()), var),
            (false, true) if !a.is_zero_num() => isolate(b, div_opt(rhs, a.as_ref().clone()), var),
            (true, true) => polynomial_roots(lhs, &rhs, var),
            _ => Vec::new(),
        },
        ExprKind::Pow(base, exponent) => {
            match (base.contains_var(var), exponent.contains_var(var)) {
                (true, false) => invert_power(base, exponent, rhs, var),
                (false, true) => {
                    let log_rhs = natural_log(rhs);
                    let value = match &base.kind {
                        ExprKind::Constant(Constant::E) => log_rhs,
                        _ => div_opt(log_rhs, natural_log(base.as_ref().clone())),
                    };
                    isolate(exponent, value, var)
                }
                _ => polynomial_roots(lhs, &rhs, var),
            }
        }
        ExprKind::FunctionCall { name, args } => match args.as_slice() {
            [arg] if arg.contains_var(var) => match families::inverse_of(name) {
                Some(inverse) => isolate(arg, Expr::func(inverse, rhs), var),
                None => Vec::new(),
            },
            // log(arg, base) = rhs
            [arg, base] if name == "log" && arg.contains_var(var) && !base.contains_var(var) => {
                isolate(arg, pow_opt(base.clone(), rhs), var)
            }
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// `base ^ exponent = rhs` with a constant exponent
fn invert_power(base: &Expr, exponent: &Expr, rhs: Expr, var: &str) -> Vec<Expr> {
    let Some(n) = exponent.as_number() else {
        return isolate(base, Expr::pow(rhs, Expr::recip(exponent.clone())), var);
    };
    let Some(inverse) = n.recip() else {
        return Vec::new();
    };
    let root = pow_opt(rhs.clone(), Expr::number(inverse));
    let even = n.as_i64().is_some_and(|n| n % 2 == 0);
    if !even {
        return isolate(base, root, var);
    }
    if rhs.as_number().is_some_and(Number::is_negative) {
        return Vec::new();
    }
    if rhs.is_zero_num() {
        return isolate(base, root, var);
    }
    [neg(root.clone()), root]
        .into_iter()
        .flat_map(|branch| isolate(base, branch, var))
        .collect()
}

/// Whether `expr` takes an even root of a closed form that evaluates
/// negative, as in `sqrt(-4)`
pub(crate) fn has_complex_root(expr: &Expr) -> bool {
    if let ExprKind::Pow(base, exponent) = &expr.kind
        && exponent
            .as_number()
            .and_then(Number::recip)
            .and_then(|degree| degree.as_i64())
            .is_some_and(|degree| degree % 2 == 0)
        && base.free_symbols().is_empty()
        && base.evaluate(&HashMap::new()).is_some_and(|value| value < 0.0)
    {
        return true;
    }
    expr.children().into_iter().any(has_complex_root)
}

fn natural_log(value: Expr) -> Expr {
    if value.is_one_num() {
        return Expr::integer(0);
    }
    Expr::func("log", value)
}

/// Coefficients `[c0, c1, c2]` of `expr` as a polynomial in `var`
fn coefficients(expr: &Expr, var: &str) -> Option<[Expr; 3]> {
    let zero = || Expr::integer(0);
    if !expr.contains_var(var) {
        return Some([expr.clone(), zero(), zero()]);
    }
    match &expr.kind {
        ExprKind::Symbol(_) => Some([zero(), Expr::integer(1), zero()]),
        ExprKind::Add(a, b) => {
            let [a0, a1, a2] = coefficients(a, var)?;
            let [b0, b1, b2] = coefficients(b, var)?;
            Some([add_opt(a0, b0), add_opt(a1, b1), add_opt(a2, b2)])
        }
        ExprKind::Mul(a, b) => multiply(coefficients(a, var)?, coefficients(b, var)?),
        ExprKind::Pow(base, exponent) if !exponent.contains_var(var) => {
            let times = exponent.as_number()?.as_i64()?;
            let base = coefficients(base, var)?;
            match times {
                0 => Some([Expr::integer(1), zero(), zero()]),
                1 => Some(base),
                2 => multiply(base.clone(), base),
                _ => None,
            }
        }
        _ => None,
    }
}

fn multiply(a: [Expr; 3], b: [Expr; 3]) -> Option<[Expr; 3]> {
    let mut out = [Expr::integer(0), Expr::integer(0), Expr::integer(0)];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            let term = mul_opt(x.clone(), y.clone());
            if term.is_zero_num() {
                continue;
            }
            let slot = out.get_mut(i + j)?;
            *slot = add_opt(slot.clone(), term);
        }
    }
    Some(out)
}

/// Roots of `lhs - rhs` as a linear or quadratic polynomial
fn polynomial_roots(lhs: &Expr, rhs: &Expr, var: &str) -> Vec<Expr> {
    let Some([c0, b, a]) = coefficients(lhs, var) else {
        return Vec::new();
    };
    let c = sub_opt(c0, rhs.clone());

    if a.is_zero_num() {
        if b.is_zero_num() {
            return Vec::new();
        }
        return vec![div_opt(neg(c), b)];
    }

    // (-b ± sqrt(b^2 - 4ac)) / 2a
    let discriminant = sub_opt(
        pow_opt(b.clone(), Expr::integer(2)),
        mul_opt(Expr::integer(4), mul_opt(a.clone(), c)),
    );
    if discriminant.as_number().is_some_and(Number::is_negative) {
        return Vec::new();
    }
    let denominator = mul_opt(Expr::integer(2), a);
    if discriminant.is_zero_num() {
        return vec![div_opt(neg(b), denominator)];
    }
    let root = pow_opt(discriminant, Expr::number(Number::half()));
    vec![
        div_opt(sub_opt(neg(b.clone()), root.clone()), denominator.clone()),
        div_opt(add_opt(neg(b), root), denominator),
    ]
}
