//! Function commands and the binder constructs (integral, sum, product, limit)

use super::Converter;
use super::differential::Differential;
use crate::ast::{Bounds, LimitDirection};
use crate::functions::{self, families};
use crate::parser::cst::{AddOp, BigOp, Func, FuncArgs, Script};
use crate::{Expr, ExprKind, LatexError};

/// Variable of an integral or limit that names none
const DEFAULT_VAR: &str = "x";

impl Converter<'_> {
    pub(super) fn func(&self, func: &Func) -> Result<Expr, LatexError> {
        match func {
            Func::Normal {
                name,
                sub,
                sup,
                args,
            } => self.normal_func(name, sub.as_ref(), sup.as_ref(), args),
            Func::User { name, sub, args } => {
                let name = self.subscripted(name, sub.as_ref())?;
                let args = args
                    .iter()
                    .map(|arg| self.expr(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::func_multi(name, args))
            }
            Func::Integral {
                bounds,
                integrand,
                differential,
            } => {
                let integrand = match integrand {
                    Some(integrand) => self.expr(integrand)?,
                    None => Expr::integer(1),
                };
                let bounds = match bounds {
                    Some((lower, upper)) => Some(Bounds::new(self.script(lower)?, self.script(upper)?)),
                    None => None,
                };
                let (integrand, var) = match differential {
                    Some(text) => (integrand, Differential::from_token(text).variable),
                    None => integration_variable(integrand),
                };
                Ok(Expr::integral(integrand, var, bounds))
            }
            Func::Sqrt { root, base } => {
                let base = self.expr(base)?;
                let Some(root) = root else {
                    return Ok(functions::sqrt(base));
                };
                let root = self.expr(root)?;
                let exponent = match root.as_number().and_then(|n| n.recip()) {
                    Some(reciprocal) => Expr::number(reciprocal),
                    None => Expr::recip(root),
                };
                Ok(Expr::pow(base, exponent))
            }
            Func::BigOp { op, sub, sup, body } => {
                let construct = match op {
                    BigOp::Sum => "sum",
                    BigOp::Prod => "product",
                };
                let index = self.expr(&sub.lhs)?;
                let Some(var) = index.as_symbol() else {
                    return Err(LatexError::invalid_binder(
                        construct,
                        format!("index '{}' is not a symbol", index),
                    ));
                };
                let bounds = Bounds::new(self.expr(&sub.rhs)?, self.script(sup)?);
                let body = self.mp(body)?;
                Ok(match op {
                    BigOp::Sum => Expr::sum(body, var, bounds),
                    BigOp::Prod => Expr::product(body, var, bounds),
                })
            }
            Func::Limit {
                var,
                approach,
                direction,
                body,
            } => {
                let var = var.as_deref().unwrap_or(DEFAULT_VAR);
                let direction = match direction {
                    Some(AddOp::Sub) => LimitDirection::Minus,
                    Some(AddOp::Add) | None => LimitDirection::Plus,
                };
                let point = self.expr(approach)?;
                let body = self.mp(body)?;
                Ok(Expr::limit(body, var, point, direction))
            }
        }
    }

    fn normal_func(
        &self,
        name: &str,
        sub: Option<&Script>,
        sup: Option<&Script>,
        args: &FuncArgs,
    ) -> Result<Expr, LatexError> {
        // Step 1: Arguments
        let mut args = match args {
            FuncArgs::Paren(list) => list
                .iter()
                .map(|arg| self.expr(arg))
                .collect::<Result<Vec<_>, _>>()?,
            FuncArgs::Bare(mp) => vec![self.mp(mp)?],
        };
        let name = families::canonical_name(name);
        let power = sup.map(|power| self.script(power)).transpose()?;

        // Step 2: The call itself
        let call = match name {
            "log" | "ln" => {
                let arg = single(name, &mut args)?;
                match (sub, name) {
                    (Some(base), _) => Expr::func_multi("log", vec![arg, self.script(base)?]),
                    (None, "log") => Expr::func_multi("log", vec![arg, Expr::integer(10)]),
                    (None, _) => Expr::func("log", arg),
                }
            }
            "Gamma" => match args.len() {
                1 => gamma_elementwise(&single(name, &mut args)?),
                2 => Expr::func_multi("uppergamma", args),
                found => return Err(arity(name, "1 or 2", found)),
            },
            "gamma" => match args.len() {
                2 => Expr::func_multi("lowergamma", args),
                found => return Err(arity(name, "2", found)),
            },
            "zeta" => match args.len() {
                1 | 2 => Expr::func_multi("zeta", args),
                found => return Err(arity(name, "1 or 2", found)),
            },
            _ => {
                let arg = single(name, &mut args)?;
                if families::is_invertible_by_power(name)
                    && power.as_ref().is_some_and(Expr::is_neg_one_num)
                {
                    return Ok(Expr::func(format!("a{}", name), arg));
                }
                Expr::func(name, arg)
            }
        };

        // Step 3: Superscript as a power around the call
        match power {
            Some(power) => Ok(Expr::pow(call, power)),
            None => Ok(call),
        }
    }
}

/// Take the only argument of a one-argument function
fn single(name: &str, args: &mut Vec<Expr>) -> Result<Expr, LatexError> {
    match args.len() {
        1 => args.pop().ok_or(LatexError::IndexOutOfBounds),
        found => Err(arity(name, "1", found)),
    }
}

fn arity(name: &str, expected: &'static str, found: usize) -> LatexError {
    LatexError::ArityMismatch {
        function: name.to_string(),
        expected,
        found,
    }
}

/// `\Gamma` of a matrix or tuple applies to each entry, down through nested
/// tuples such as the rows of an `array`
fn gamma_elementwise(arg: &Expr) -> Expr {
    match &arg.kind {
        ExprKind::Matrix(m) => Expr::matrix(m.map(gamma_elementwise)),
        ExprKind::Tuple(items) => Expr::tuple(items.iter().map(gamma_elementwise).collect()),
        _ => Expr::func("gamma", arg.clone()),
    }
}

/// Find the variable of an integral written without a trailing differential.
///
/// A free symbol such as `dx` or `dtheta` inside the integrand (as in
/// `\int \frac{dx}{x}`) names the variable and is replaced by `1`. Only `d`
/// followed by one letter or a Greek letter name counts, so `\delta` stays a
/// symbol. Symbols are scanned in lexical order and the first match wins.
fn integration_variable(integrand: Expr) -> (Expr, String) {
    let found = integrand
        .free_symbols()
        .into_iter()
        .find_map(|name| differential_variable(&name).map(|var| (var.to_string(), name.clone())));
    match found {
        Some((var, symbol)) => {
            log::trace!("integration variable {} taken from symbol {}", var, symbol);
            (integrand.substitute(&symbol, &Expr::integer(1)), var)
        }
        None => (integrand, DEFAULT_VAR.to_string()),
    }
}

/// `dx` -> `x`, `dtheta` -> `theta`
fn differential_variable(name: &str) -> Option<&str> {
    let var = name.strip_prefix('d')?;
    let mut chars = var.chars();
    let single_letter = chars.next().is_some_and(char::is_alphabetic) && chars.next().is_none();
    (single_letter || families::is_greek_letter(var)).then_some(var)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::parse_latex;

    fn show(input: &str) -> String {
        parse_latex(input).unwrap().to_string()
    }

    #[test]
    fn test_inverse_names() {
        assert_eq!(show("\\arcsin x"), "asin(x)");
        assert_eq!(show("\\arsinh(x)"), "asinh(x)");
        assert_eq!(show("\\sin^{-1}(x)"), "asin(x)");
        assert_eq!(show("\\cosh^{-1} x"), "acosh(x)");
    }

    #[test]
    fn test_function_powers() {
        assert_eq!(show("\\sin^2 x"), "sin(x)^2");
        assert_eq!(show("\\exp^{2}(x)"), "exp(x)^2");
        // Only the trigonometric family is inverted by `^{-1}`
        assert_eq!(show("\\exp^{-1} x"), "1/exp(x)");
    }

    #[test]
    fn test_logarithms() {
        assert_eq!(show("\\log x"), "log(x, 10)");
        assert_eq!(show("\\ln x"), "log(x)");
        assert_eq!(show("\\log_2 8"), "log(8, 2)");
        assert_eq!(show("\\ln_{b}(a)"), "log(a, b)");
    }

    #[test]
    fn test_gamma_family() {
        assert_eq!(show("\\Gamma(x)"), "gamma(x)");
        assert_eq!(show("\\Gamma(s, x)"), "uppergamma(s, x)");
        assert_eq!(show("\\gamma(s, x)"), "lowergamma(s, x)");
        assert_eq!(show("\\zeta(s)"), "zeta(s)");
        assert_eq!(show("\\zeta(s, a)"), "zeta(s, a)");
        assert_eq!(
            show("\\Gamma(\\begin{pmatrix}1 & 2\\end{pmatrix})"),
            "Matrix([[gamma(1), gamma(2)]])"
        );
        assert_eq!(
            show("\\Gamma(\\begin{array}{cc}1 & 2\\end{array})"),
            "((gamma(1), gamma(2)),)"
        );
        assert_eq!(
            show("\\Gamma(\\begin{array}{cc}1 & 2 \\\\ 3 & x\\end{array})"),
            "((gamma(1), gamma(2)), (gamma(3), gamma(x)))"
        );
    }

    #[test]
    fn test_arity_errors() {
        assert_eq!(
            parse_latex("\\gamma(x)"),
            Err(LatexError::ArityMismatch {
                function: "gamma".into(),
                expected: "2",
                found: 1
            })
        );
        assert!(matches!(
            parse_latex("\\sin(x, y)"),
            Err(LatexError::ArityMismatch { found: 2, .. })
        ));
    }

    #[test]
    fn test_user_functions() {
        assert_eq!(show("f(x)"), "f(x)");
        assert_eq!(show("g(a, b, c)"), "g(a, b, c)");
        assert_eq!(show("f_{1}(x)"), "f_{1}(x)");
    }

    #[test]
    fn test_roots() {
        assert_eq!(show("\\sqrt{x}"), "sqrt(x)");
        assert_eq!(show("\\sqrt[3]{x}"), "x^(1/3)");
        assert_eq!(show("\\sqrt[n]{x}"), "x^(1/n)");
    }

    #[test]
    fn test_integrals() {
        assert_eq!(show("\\int_0^1 x\\,dx"), "Integral(x, (x, 0, 1))");
        assert_eq!(show("\\int x^2 dx"), "Integral(x^2, x)");
        assert_eq!(show("\\int^{b}_{a} f dt"), "Integral(f, (t, a, b))");
        assert_eq!(show("\\int dx"), "Integral(1, x)");
        assert_eq!(show("\\int \\frac{dy}{y}"), "Integral(1/y, y)");
        assert_eq!(show("\\int y"), "Integral(y, x)");
        assert_eq!(show("\\int \\frac{d\\theta}{\\theta}"), "Integral(1/theta, theta)");
        // A Greek letter starting with `d` is not a differential
        assert_eq!(show("\\int \\delta"), "Integral(delta, x)");
    }

    #[test]
    fn test_sums_and_products() {
        assert_eq!(show("\\sum_{n=1}^{10} n^2"), "Sum(n^2, (n, 1, 10))");
        assert_eq!(show("\\prod^{N}_{k=0} k"), "Product(k, (k, 0, N))");
        assert!(matches!(
            parse_latex("\\sum_{2n=1}^{3} n"),
            Err(LatexError::InvalidBinder {
                construct: "sum",
                ..
            })
        ));
    }

    #[test]
    fn test_limits() {
        assert_eq!(
            show("\\lim_{x \\to 0} \\frac{1}{x}"),
            "Limit(1/x, x, 0, dir='+')"
        );
        assert_eq!(
            show("\\lim_{h \\to 0^-} h"),
            "Limit(h, h, 0, dir='-')"
        );
        assert_eq!(
            show("\\lim_{t \\to \\infty^{+}} t"),
            "Limit(t, t, oo, dir='+')"
        );
    }

    #[test]
    fn test_integration_variable_discovery() {
        let integrand = Expr::mul_expr(Expr::symbol("dz"), Expr::symbol("z"));
        let (rest, var) = integration_variable(integrand);
        assert_eq!(var, "z");
        assert_eq!(rest, Expr::mul_expr(Expr::integer(1), Expr::symbol("z")));
    }
}
