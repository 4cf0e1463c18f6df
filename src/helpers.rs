//! Multi-variable calculus and evaluation helpers over LaTeX input
//!
//! Provides gradient, hessian, and jacobian computation functions
//! for both Expr-based and string-based APIs.

use std::collections::HashMap;

use crate::{Expr, LatexError, parse_latex};

// ===== Public Expr-based API =====

/// Gradient of an expression with respect to multiple variables
/// Returns a vector of partial derivatives [∂f/∂x₁, ∂f/∂x₂, ...]
///
/// # Example
/// ```
/// use symb_latex::{gradient, parse_latex};
///
/// let expr = parse_latex("x^2 + y^2").unwrap();
/// let grad: Vec<String> = gradient(&expr, &["x", "y"]).iter().map(ToString::to_string).collect();
/// assert_eq!(grad, ["2*x", "2*y"]);
/// ```
pub fn gradient(expr: &Expr, vars: &[&str]) -> Vec<Expr> {
    vars.iter().map(|var| expr.derive(var)).collect()
}

/// Hessian matrix of an expression
/// H[i][j] = ∂²f/∂xᵢ∂xⱼ
pub fn hessian(expr: &Expr, vars: &[&str]) -> Vec<Vec<Expr>> {
    gradient(expr, vars)
        .iter()
        .map(|partial| gradient(partial, vars))
        .collect()
}

/// Jacobian matrix of a vector of expressions
/// J[i][j] = ∂fᵢ/∂xⱼ
pub fn jacobian(exprs: &[Expr], vars: &[&str]) -> Vec<Vec<Expr>> {
    exprs.iter().map(|expr| gradient(expr, vars)).collect()
}

// ===== String-based API =====

/// Gradient of a LaTeX formula, rendered as text
pub fn gradient_str(formula: &str, vars: &[&str]) -> Result<Vec<String>, LatexError> {
    let expr = parse_latex(formula)?;
    Ok(gradient(&expr, vars).iter().map(ToString::to_string).collect())
}

/// Hessian of a LaTeX formula, rendered as text
pub fn hessian_str(formula: &str, vars: &[&str]) -> Result<Vec<Vec<String>>, LatexError> {
    let expr = parse_latex(formula)?;
    Ok(render_rows(hessian(&expr, vars)))
}

/// Jacobian of several LaTeX formulas, rendered as text
pub fn jacobian_str(formulas: &[&str], vars: &[&str]) -> Result<Vec<Vec<String>>, LatexError> {
    let exprs = formulas
        .iter()
        .map(|formula| parse_latex(formula))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(render_rows(jacobian(&exprs, vars)))
}

/// Parse a LaTeX formula and evaluate it numerically
///
/// `Ok(None)` means the formula parsed but has no numeric value for these
/// bindings (an unbound symbol, a pole, a relation).
///
/// # Example
/// ```
/// use symb_latex::evaluate_str;
///
/// assert_eq!(evaluate_str(r"\frac{x}{4}", &[("x", 2.0)]).unwrap(), Some(0.5));
/// assert_eq!(evaluate_str(r"x y", &[("x", 2.0)]).unwrap(), None);
/// ```
pub fn evaluate_str(formula: &str, vars: &[(&str, f64)]) -> Result<Option<f64>, LatexError> {
    let expr = parse_latex(formula)?;
    let var_map: HashMap<&str, f64> = vars.iter().copied().collect();
    Ok(expr.evaluate(&var_map))
}

fn render_rows(rows: Vec<Vec<Expr>>) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn test_gradient() {
        let grad = gradient_str("x^2 + y^2", &["x", "y"]).unwrap();
        assert_eq!(grad, ["2*x", "2*y"]);
    }

    #[test]
    fn test_hessian() {
        let hess = hessian_str("x^2 + y^2", &["x", "y"]).unwrap();
        assert_eq!(hess.len(), 2);
        assert_eq!(hess[0], ["2", "0"]);
        assert_eq!(hess[1], ["0", "2"]);
    }

    #[test]
    fn test_jacobian() {
        let jac = jacobian_str(&["x^2", "x y"], &["x", "y"]).unwrap();
        assert_eq!(jac.len(), 2);
        assert_eq!(jac[0][0], "2*x");
        assert_eq!(jac[1][0], "y");
        assert_eq!(jac[1][1], "x");
    }

    #[test]
    fn test_syntax_error_propagates() {
        assert!(gradient_str("x +", &["x"]).is_err());
        assert!(evaluate_str("", &[]).is_err());
    }

    #[test]
    fn test_evaluate_str() {
        assert_eq!(evaluate_str("x y", &[("x", 3.0), ("y", 2.0)]).unwrap(), Some(6.0));
        assert_eq!(evaluate_str("x = 1", &[("x", 1.0)]).unwrap(), None);
    }
}
