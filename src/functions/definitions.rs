//! Function definitions for the registry
//!
//! Names are the canonical ones produced by the transducer (`asin`, not
//! `arcsin`). Derivative formulas follow DLMF §4.21-4.37 for the elementary
//! functions and §5.2.1 for Γ'(x) = Γ(x)ψ(x).

use super::registry::FunctionDefinition;
use super::{add_opt, div_opt, mul_opt, neg, pow_opt, sqrt, sub_opt};
use crate::Expr;
use crate::math;

fn call(name: &str, u: &Expr) -> Expr {
    Expr::func(name, u.clone())
}

fn square(u: &Expr) -> Expr {
    pow_opt(u.clone(), Expr::integer(2))
}

fn one() -> Expr {
    Expr::integer(1)
}

/// `outer * u'`
fn chain(outer: Expr, primes: &[Expr]) -> Expr {
    mul_opt(outer, primes[0].clone())
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| Some(args[0].sin()),
            derivative: Some(|args, primes| chain(call("cos", &args[0]), primes)),
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| Some(args[0].cos()),
            derivative: Some(|args, primes| chain(neg(call("sin", &args[0])), primes)),
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| Some(args[0].tan()),
            derivative: Some(|args, primes| chain(square(&call("sec", &args[0])), primes)),
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].tan()),
            derivative: Some(|args, primes| {
                chain(neg(square(&call("csc", &args[0]))), primes)
            }),
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].cos()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                chain(mul_opt(call("sec", u), call("tan", u)), primes)
            }),
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].sin()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                chain(neg(mul_opt(call("csc", u), call("cot", u))), primes)
            }),
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| Some(args[0].asin()),
            derivative: Some(|args, primes| {
                // 1 / sqrt(1 - u^2)
                let root = sqrt(sub_opt(one(), square(&args[0])));
                chain(div_opt(one(), root), primes)
            }),
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| Some(args[0].acos()),
            derivative: Some(|args, primes| {
                let root = sqrt(sub_opt(one(), square(&args[0])));
                chain(neg(div_opt(one(), root)), primes)
            }),
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| Some(args[0].atan()),
            derivative: Some(|args, primes| {
                chain(div_opt(one(), add_opt(one(), square(&args[0]))), primes)
            }),
        },
        FunctionDefinition {
            name: "acot",
            arity: 1..=1,
            eval: |args| Some((1.0 / args[0]).atan()),
            derivative: Some(|args, primes| {
                chain(neg(div_opt(one(), add_opt(one(), square(&args[0])))), primes)
            }),
        },
        FunctionDefinition {
            name: "asec",
            arity: 1..=1,
            eval: |args| Some((1.0 / args[0]).acos()),
            derivative: Some(|args, primes| {
                // 1 / (|u| sqrt(u^2 - 1))
                let u = &args[0];
                let den = mul_opt(call("abs", u), sqrt(sub_opt(square(u), one())));
                chain(div_opt(one(), den), primes)
            }),
        },
        FunctionDefinition {
            name: "acsc",
            arity: 1..=1,
            eval: |args| Some((1.0 / args[0]).asin()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                let den = mul_opt(call("abs", u), sqrt(sub_opt(square(u), one())));
                chain(neg(div_opt(one(), den)), primes)
            }),
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| Some(args[0].sinh()),
            derivative: Some(|args, primes| chain(call("cosh", &args[0]), primes)),
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| Some(args[0].cosh()),
            derivative: Some(|args, primes| chain(call("sinh", &args[0]), primes)),
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| Some(args[0].tanh()),
            derivative: Some(|args, primes| chain(square(&call("sech", &args[0])), primes)),
        },
        FunctionDefinition {
            name: "coth",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].tanh()),
            derivative: Some(|args, primes| {
                chain(neg(square(&call("csch", &args[0]))), primes)
            }),
        },
        FunctionDefinition {
            name: "sech",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].cosh()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                chain(neg(mul_opt(call("sech", u), call("tanh", u))), primes)
            }),
        },
        FunctionDefinition {
            name: "csch",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].sinh()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                chain(neg(mul_opt(call("csch", u), call("coth", u))), primes)
            }),
        },
        // Inverse hyperbolic
        FunctionDefinition {
            name: "asinh",
            arity: 1..=1,
            eval: |args| Some(args[0].asinh()),
            derivative: Some(|args, primes| {
                chain(div_opt(one(), sqrt(add_opt(square(&args[0]), one()))), primes)
            }),
        },
        FunctionDefinition {
            name: "acosh",
            arity: 1..=1,
            eval: |args| Some(args[0].acosh()),
            derivative: Some(|args, primes| {
                chain(div_opt(one(), sqrt(sub_opt(square(&args[0]), one()))), primes)
            }),
        },
        FunctionDefinition {
            name: "atanh",
            arity: 1..=1,
            eval: |args| Some(args[0].atanh()),
            derivative: Some(|args, primes| {
                chain(div_opt(one(), sub_opt(one(), square(&args[0]))), primes)
            }),
        },
        FunctionDefinition {
            name: "acoth",
            arity: 1..=1,
            eval: |args| Some((1.0 / args[0]).atanh()),
            derivative: Some(|args, primes| {
                chain(div_opt(one(), sub_opt(one(), square(&args[0]))), primes)
            }),
        },
        FunctionDefinition {
            name: "asech",
            arity: 1..=1,
            eval: |args| Some((1.0 / args[0]).acosh()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                let den = mul_opt(u.clone(), sqrt(sub_opt(one(), square(u))));
                chain(neg(div_opt(one(), den)), primes)
            }),
        },
        FunctionDefinition {
            name: "acsch",
            arity: 1..=1,
            eval: |args| Some((1.0 / args[0]).asinh()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                let den = mul_opt(call("abs", u), sqrt(add_opt(one(), square(u))));
                chain(neg(div_opt(one(), den)), primes)
            }),
        },
        // Exponential and logarithm
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| Some(args[0].exp()),
            derivative: Some(|args, primes| chain(call("exp", &args[0]), primes)),
        },
        FunctionDefinition {
            name: "log",
            arity: 1..=2,
            eval: |args| match args {
                [x] if *x > 0.0 => Some(x.ln()),
                [x, base] if *x > 0.0 && *base > 0.0 && *base != 1.0 => Some(x.ln() / base.ln()),
                _ => None,
            },
            derivative: Some(|args, primes| {
                let u = &args[0];
                let du = div_opt(primes[0].clone(), u.clone());
                match (args.get(1), primes.get(1)) {
                    // log(u, b) = ln(u) / ln(b)
                    (Some(b), Some(db)) => {
                        let ln_b = call("log", b);
                        let first = div_opt(du, ln_b.clone());
                        let second = div_opt(
                            mul_opt(call("log", u), div_opt(db.clone(), b.clone())),
                            square(&ln_b),
                        );
                        sub_opt(first, second)
                    }
                    _ => du,
                }
            }),
        },
        // Piecewise and combinatorial
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: Some(|args, primes| {
                let u = &args[0];
                chain(div_opt(u.clone(), call("abs", u)), primes)
            }),
        },
        FunctionDefinition {
            name: "floor",
            arity: 1..=1,
            eval: |args| Some(args[0].floor()),
            derivative: None,
        },
        FunctionDefinition {
            name: "ceiling",
            arity: 1..=1,
            eval: |args| Some(args[0].ceil()),
            derivative: None,
        },
        FunctionDefinition {
            name: "factorial",
            arity: 1..=1,
            eval: |args| math::eval_factorial(args[0]),
            derivative: None,
        },
        FunctionDefinition {
            name: "binomial",
            arity: 2..=2,
            eval: |args| math::eval_binomial(args[0], args[1]),
            derivative: None,
        },
        // Special functions
        FunctionDefinition {
            name: "gamma",
            arity: 1..=1,
            eval: |args| math::eval_gamma(args[0]),
            derivative: Some(|args, primes| {
                let u = &args[0];
                chain(mul_opt(call("gamma", u), call("digamma", u)), primes)
            }),
        },
        FunctionDefinition {
            name: "digamma",
            arity: 1..=1,
            eval: |args| math::eval_digamma(args[0]),
            derivative: None,
        },
        FunctionDefinition {
            name: "uppergamma",
            arity: 2..=2,
            eval: |args| math::eval_upper_gamma(args[0], args[1]),
            derivative: None,
        },
        FunctionDefinition {
            name: "lowergamma",
            arity: 2..=2,
            eval: |args| math::eval_lower_gamma(args[0], args[1]),
            derivative: None,
        },
        FunctionDefinition {
            name: "zeta",
            arity: 1..=2,
            eval: |args| match args {
                [s] => math::eval_zeta(*s),
                [s, a] => math::eval_hurwitz_zeta(*s, *a),
                _ => None,
            },
            derivative: None,
        },
    ]
}
