//! Calculus on converted expressions: symbolic results checked numerically

use std::collections::HashMap;

use crate::traits::approx_eq;
use crate::{Expr, parse_latex};

fn at(expr: &Expr, x: f64) -> Option<f64> {
    expr.evaluate(&HashMap::from([("x", x)]))
}

fn value(input: &str) -> Option<f64> {
    parse_latex(input).unwrap().evaluate(&HashMap::new())
}

/// Central difference of `expr` in `x`
fn numeric_derivative(expr: &Expr, x: f64) -> f64 {
    let h = 1e-5;
    (at(expr, x + h).unwrap() - at(expr, x - h).unwrap()) / (2.0 * h)
}

#[test]
fn test_derivatives_match_finite_differences() {
    let cases = [
        "\\sin(x) x^2",
        "\\exp(x^2)",
        "\\ln x",
        "\\frac{1}{x}",
        "\\sqrt{x}",
        "\\tan(x)",
        "\\log_{2}(x)",
        "x^x",
        "\\arctan(x)",
        "\\cosh(x) - \\sinh(x)",
    ];
    for input in cases {
        let expr = parse_latex(input).unwrap();
        let derivative = Expr::derivative(expr.clone(), "x", Expr::integer(1)).doit();
        for x in [0.3, 0.7, 1.9] {
            let symbolic = at(&derivative, x).unwrap();
            let numeric = numeric_derivative(&expr, x);
            assert!(
                (symbolic - numeric).abs() < 1e-5 * symbolic.abs().max(1.0),
                "{} at {}: {} vs {}",
                input,
                x,
                symbolic,
                numeric
            );
        }
    }
}

#[test]
fn test_second_order_derivative() {
    let expr = parse_latex("\\frac{d^2}{dx^2} x^3").unwrap();
    assert_eq!(at(&expr, 2.0), Some(12.0));
}

#[test]
fn test_leibniz_derivative_evaluates() {
    let expr = parse_latex("\\frac{d}{dx} \\sin(x)").unwrap();
    assert!(approx_eq(at(&expr, 0.0).unwrap(), 1.0));
}

#[test]
fn test_unknown_function_has_no_value() {
    assert_eq!(value("f'(2)"), None);
    assert_eq!(value("\\frac{d}{dx} g(x)"), None);
}

#[test]
fn test_integrals_and_series() {
    assert!(approx_eq(value("\\int_0^{\\pi} \\sin(x) dx").unwrap(), 2.0));
    let expected: f64 = (1..=100).map(|k| 1.0 / f64::from(k * k)).sum();
    assert!(approx_eq(
        value("\\sum_{k=1}^{100} \\frac{1}{k^2}").unwrap(),
        expected
    ));
    assert!(approx_eq(value("\\prod_{j=1}^{4} (j + 1)").unwrap(), 120.0));
}

#[test]
fn test_special_functions() {
    assert!(approx_eq(value("\\Gamma(5)").unwrap(), 24.0));
    assert!(approx_eq(value("\\binom{6}{3}").unwrap(), 20.0));
    assert_eq!(value("\\Gamma(0)"), None);
    assert_eq!(value("\\lfloor 2.5 \\rfloor"), Some(2.0));
    assert_eq!(value("\\lceil 2.5 \\rceil"), Some(3.0));
    assert_eq!(value("|-4|"), Some(4.0));
}

#[test]
fn test_evaluation_bars() {
    assert_eq!(value("x^2 \\Big|_{1}^{3}"), Some(8.0));
    assert_eq!(value("(x + 1)|_{x=2}"), Some(3.0));
}

#[test]
fn test_degrees() {
    assert!(approx_eq(value("\\sin(30^\\circ)").unwrap(), 0.5));
}
