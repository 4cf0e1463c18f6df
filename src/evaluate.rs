//! Numeric evaluation of expression trees
//!
//! Evaluation is a plain recursive walk over `f64`. It returns `None` when a
//! symbol is unbound, a function is unknown or leaves its domain, or a node
//! has no numeric value (relations, matrices, tuples, indefinite integrals).
//!
//! # Example
//! ```
//! use std::collections::HashMap;
//! use symb_latex::parse_latex;
//!
//! let expr = parse_latex(r"\frac{x^2}{2}").unwrap();
//! let vars = HashMap::from([("x", 3.0)]);
//! assert_eq!(expr.evaluate(&vars), Some(4.5));
//! ```

use std::collections::HashMap;
use std::f64::consts;

use crate::ast::{Bounds, Constant, LimitDirection};
use crate::functions::registry::Registry;
use crate::traits::is_whole;
use crate::{Expr, ExprKind};

/// Subintervals of the composite Simpson rule (must be even)
const SIMPSON_INTERVALS: usize = 1000;
/// Largest number of terms a finite sum or product may expand to
const MAX_TERMS: i64 = 10_000;
/// Relative offset from the approach point of a one-sided limit
const LIMIT_STEP: f64 = 1e-7;
/// Stand-in for an infinite approach point
const LARGE: f64 = 1e12;

impl Expr {
    /// Evaluate with the given symbol bindings
    pub fn evaluate(&self, vars: &HashMap<&str, f64>) -> Option<f64> {
        let value = match &self.kind {
            ExprKind::Number(n) => n.to_f64(),
            ExprKind::Symbol(name) => *vars.get(name.as_str())?,
            ExprKind::Constant(Constant::Pi) => consts::PI,
            ExprKind::Constant(Constant::E) => consts::E,
            ExprKind::Constant(Constant::Infinity) => f64::INFINITY,

            ExprKind::Add(a, b) => a.evaluate(vars)? + b.evaluate(vars)?,
            ExprKind::Mul(a, b) => a.evaluate(vars)? * b.evaluate(vars)?,
            ExprKind::Pow(base, exponent) => {
                let base = base.evaluate(vars)?;
                let exponent = exponent.evaluate(vars)?;
                if is_whole(exponent) && exponent.abs() < f64::from(i32::MAX) {
                    base.powi(exponent.round() as i32)
                } else {
                    base.powf(exponent)
                }
            }

            ExprKind::FunctionCall { name, args } => {
                let def = Registry::get_with_arity(name, args.len())?;
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(vars))
                    .collect::<Option<Vec<f64>>>()?;
                (def.eval)(&values)?
            }

            ExprKind::Derivative { .. } => {
                let done = self.doit();
                if matches!(done.kind, ExprKind::Derivative { .. }) {
                    return None;
                }
                done.evaluate(vars)?
            }

            ExprKind::Subs { inner, var, point } => {
                let point = point.evaluate(vars)?;
                inner.evaluate(&bind(vars, var, point))?
            }

            ExprKind::Integral {
                integrand,
                var,
                bounds: Some(bounds),
            } => {
                let lower = bounds.lower.evaluate(vars)?;
                let upper = bounds.upper.evaluate(vars)?;
                simpson(integrand, var, lower, upper, vars)?
            }

            ExprKind::Sum { body, var, bounds } => {
                let mut total = 0.0;
                for index in index_range(bounds, vars)? {
                    total += body.evaluate(&bind(vars, var, index as f64))?;
                }
                total
            }

            ExprKind::Product { body, var, bounds } => {
                let mut total = 1.0;
                for index in index_range(bounds, vars)? {
                    total *= body.evaluate(&bind(vars, var, index as f64))?;
                }
                total
            }

            ExprKind::Limit {
                body,
                var,
                point,
                direction,
            } => {
                let point = point.evaluate(vars)?;
                let near = if point.is_infinite() {
                    point.signum() * LARGE
                } else {
                    let step = LIMIT_STEP * point.abs().max(1.0);
                    match direction {
                        LimitDirection::Plus => point + step,
                        LimitDirection::Minus => point - step,
                    }
                };
                body.evaluate(&bind(vars, var, near))?
            }

            ExprKind::Integral { bounds: None, .. }
            | ExprKind::Relational { .. }
            | ExprKind::Matrix(_)
            | ExprKind::Tuple(_)
            | ExprKind::Bra(_)
            | ExprKind::Ket(_) => return None,
        };
        (!value.is_nan()).then_some(value)
    }
}

/// `vars` with `var` bound to `value`, shadowing any outer binding
fn bind<'a, 'b: 'a>(vars: &HashMap<&'b str, f64>, var: &'a str, value: f64) -> HashMap<&'a str, f64> {
    let mut scoped: HashMap<&'a str, f64> = vars.iter().map(|(name, v)| (*name, *v)).collect();
    scoped.insert(var, value);
    scoped
}

/// Whole-number index range of a finite sum or product
fn index_range(bounds: &Bounds, vars: &HashMap<&str, f64>) -> Option<std::ops::RangeInclusive<i64>> {
    let lower = bounds.lower.evaluate(vars)?;
    let upper = bounds.upper.evaluate(vars)?;
    if !is_whole(lower) || !is_whole(upper) {
        return None;
    }
    let (lower, upper) = (lower.round() as i64, upper.round() as i64);
    if upper.saturating_sub(lower) >= MAX_TERMS {
        return None;
    }
    Some(lower..=upper)
}

/// Composite Simpson rule over [a, b]
fn simpson(integrand: &Expr, var: &str, a: f64, b: f64, vars: &HashMap<&str, f64>) -> Option<f64> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let h = (b - a) / SIMPSON_INTERVALS as f64;
    let f = |x: f64| integrand.evaluate(&bind(vars, var, x));
    let mut total = f(a)? + f(b)?;
    for i in 1..SIMPSON_INTERVALS {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        total += weight * f(a + h * i as f64)?;
    }
    Some(total * h / 3.0)
}
