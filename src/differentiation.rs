// Differentiation engine - applies calculus rules to parsed expressions
//
// Results are built with the folding helpers from `functions`, so numeric
// factors collapse as they appear (`d/dx 3x` is `3`, not `0*x + 3*1`).
// Anything without a rule (user functions, limits, products) stays an
// unevaluated `Derivative` node.

use crate::functions::registry::Registry;
use crate::functions::{add_opt, div_opt, mul_opt, pow_opt, sub_opt};
use crate::number::Number;
use crate::{Constant, Expr, ExprKind};

impl Expr {
    /// Differentiate this expression with respect to `var`
    ///
    /// Bound variables are respected: `d/dx \sum_{x=1}^{n} x` is `0`.
    pub fn derive(&self, var: &str) -> Expr {
        if !self.contains_var(var) {
            return Expr::integer(0);
        }
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Constant(_) => Expr::integer(0),

            ExprKind::Symbol(name) => {
                if name == var {
                    Expr::integer(1)
                } else {
                    Expr::integer(0)
                }
            }

            // Sum rule: (u + v)' = u' + v'
            ExprKind::Add(u, v) => add_opt(u.derive(var), v.derive(var)),

            // Product rule: (u * v)' = u' * v + u * v'
            ExprKind::Mul(u, v) => add_opt(
                mul_opt(u.derive(var), v.as_ref().clone()),
                mul_opt(u.as_ref().clone(), v.derive(var)),
            ),

            ExprKind::Pow(u, v) => power_rule(u, v, var),

            ExprKind::FunctionCall { name, args } => {
                if let Some(def) = Registry::get_with_arity(name, args.len())
                    && let Some(rule) = def.derivative
                {
                    let primes: Vec<Expr> = args.iter().map(|arg| arg.derive(var)).collect();
                    return rule(args, &primes);
                }
                Expr::derivative(self.clone(), var, Expr::integer(1))
            }

            // d/dx of d^n/dx^n f is d^(n+1)/dx^(n+1) f
            ExprKind::Derivative {
                inner,
                var: wrt,
                order,
            } if wrt == var => Expr::derivative(
                inner.as_ref().clone(),
                wrt.clone(),
                add_opt(order.as_ref().clone(), Expr::integer(1)),
            ),

            // Fundamental theorem for an antiderivative in the same variable
            ExprKind::Integral {
                integrand,
                var: wrt,
                bounds: None,
            } if wrt == var => integrand.as_ref().clone(),

            ExprKind::Sum { body, var: index, bounds }
                if !bounds.lower.contains_var(var) && !bounds.upper.contains_var(var) =>
            {
                Expr::sum(body.derive(var), index.clone(), bounds.clone())
            }

            ExprKind::Relational { .. }
            | ExprKind::Matrix(_)
            | ExprKind::Tuple(_)
            | ExprKind::Bra(_)
            | ExprKind::Ket(_) => self.map_children(|child| child.derive(var)),

            _ => Expr::derivative(self.clone(), var, Expr::integer(1)),
        }
    }

    /// Carry out every `Derivative` with a non-negative integer order and
    /// every `Subs`, innermost first
    pub fn doit(&self) -> Expr {
        match &self.kind {
            ExprKind::Derivative { inner, var, order } => {
                let inner = inner.doit();
                let order = order.doit();
                let Some(times) = order.as_number().and_then(Number::as_i64).filter(|n| *n >= 0)
                else {
                    return Expr::derivative(inner, var.clone(), order);
                };
                let mut result = inner;
                for _ in 0..times {
                    if !result.contains_var(var) {
                        return Expr::integer(0);
                    }
                    result = result.derive(var);
                }
                result
            }
            ExprKind::Subs { inner, var, point } => inner.doit().substitute(var, &point.doit()),
            _ => self.map_children(Expr::doit),
        }
    }
}

/// (u^v)' for a constant or a variable exponent
fn power_rule(u: &Expr, v: &Expr, var: &str) -> Expr {
    let u_prime = u.derive(var);

    if !v.contains_var(var) {
        // (u^n)' = n * u^(n-1) * u'
        if u_prime.is_zero_num() {
            return Expr::integer(0);
        }
        let n_minus_1 = match v.as_number() {
            Some(n) => Expr::number(n.sub(&Number::one())),
            None => sub_opt(v.clone(), Expr::integer(1)),
        };
        return mul_opt(
            v.clone(),
            mul_opt(pow_opt(u.clone(), n_minus_1), u_prime),
        );
    }

    // Logarithmic differentiation: (u^v)' = u^v * (v' * ln(u) + v * u'/u)
    let ln_u = match &u.kind {
        ExprKind::Constant(Constant::E) => Expr::integer(1),
        _ if u.is_one_num() => Expr::integer(0),
        _ => Expr::func("log", u.clone()),
    };
    let sum = add_opt(
        mul_opt(v.derive(var), ln_u),
        mul_opt(v.clone(), div_opt(u_prime, u.clone())),
    );
    mul_opt(Expr::pow(u.clone(), v.clone()), sum)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::ast::Bounds;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_power_rule() {
        let square = Expr::pow(x(), Expr::integer(2));
        assert_eq!(square.derive("x"), Expr::mul_expr(Expr::integer(2), x()));
        assert_eq!(square.derive("y"), Expr::integer(0));
    }

    #[test]
    fn test_linear_terms_fold() {
        let expr = Expr::add_expr(Expr::mul_expr(Expr::integer(3), x()), Expr::integer(1));
        assert_eq!(expr.derive("x"), Expr::integer(3));
    }

    #[test]
    fn test_registry_rule() {
        assert_eq!(Expr::func("sin", x()).derive("x"), Expr::func("cos", x()));
    }

    #[test]
    fn test_unknown_function_stays_unevaluated() {
        let f = Expr::func("f", x());
        assert_eq!(f.derive("x").to_string(), "Derivative(f(x), x)");
        assert_eq!(
            f.derive("x").derive("x").to_string(),
            "Derivative(f(x), (x, 2))"
        );
    }

    #[test]
    fn test_exponential() {
        let expr = Expr::pow(Expr::symbol("a"), x());
        assert_eq!(expr.derive("x").to_string(), "a^x*log(a)");
    }

    #[test]
    fn test_bound_variable_is_constant() {
        let sum = Expr::sum(x(), "x", Bounds::new(Expr::integer(1), Expr::symbol("n")));
        assert_eq!(sum.derive("x"), Expr::integer(0));
    }

    #[test]
    fn test_doit_derivative() {
        let d = Expr::derivative(Expr::pow(x(), Expr::integer(2)), "x", Expr::integer(1));
        assert_eq!(d.doit(), Expr::mul_expr(Expr::integer(2), x()));

        let cubic = Expr::derivative(Expr::pow(x(), Expr::integer(3)), "x", Expr::integer(4));
        assert_eq!(cubic.doit(), Expr::integer(0));
    }

    #[test]
    fn test_doit_symbolic_order_is_kept() {
        let d = Expr::derivative(x(), "x", Expr::symbol("n"));
        assert_eq!(d.doit(), d);
    }

    #[test]
    fn test_doit_subs() {
        let s = Expr::subs(Expr::pow(x(), Expr::integer(2)), "x", Expr::integer(3));
        assert_eq!(s.doit(), Expr::pow(Expr::integer(3), Expr::integer(2)));
    }
}
