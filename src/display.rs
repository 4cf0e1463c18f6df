// Display formatting for expressions
use crate::ast::{Bounds, Constant};
use crate::number::Number;
use crate::{Expr, ExprKind};
use std::fmt;

const PREC_RELATION: u8 = 1;
const PREC_ADD: u8 = 10;
const PREC_MUL: u8 = 20;
const PREC_POW: u8 = 30;
const PREC_ATOM: u8 = 100;

/// Binding strength of the outermost operator, as printed
fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Relational { .. } => PREC_RELATION,
        ExprKind::Add(_, _) => PREC_ADD,
        ExprKind::Mul(_, _) => PREC_MUL,
        ExprKind::Pow(_, e) if e.is_neg_one_num() => PREC_MUL,
        ExprKind::Pow(_, _) => PREC_POW,
        ExprKind::Number(n) if n.is_negative() || !n.is_integer() => PREC_MUL,
        _ => PREC_ATOM,
    }
}

/// Format `expr`, parenthesized when it binds looser than `min`
fn operand(expr: &Expr, min: u8) -> String {
    if precedence(expr) < min {
        format!("({})", expr)
    } else {
        format!("{}", expr)
    }
}

fn join(items: &[Expr]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn bounds_tuple(var: &str, bounds: &Bounds) -> String {
    format!("({}, {}, {})", var, bounds.lower, bounds.upper)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{}", n),

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::Constant(Constant::Pi) => write!(f, "pi"),
            ExprKind::Constant(Constant::E) => write!(f, "E"),
            ExprKind::Constant(Constant::Infinity) => write!(f, "oo"),

            ExprKind::Add(u, v) => {
                // Show `u + (-1 * w)` as a subtraction
                if let ExprKind::Mul(left, right) = &v.kind
                    && left.is_neg_one_num()
                {
                    write!(f, "{} - {}", operand(u, PREC_ADD), operand(right, PREC_MUL))
                } else if let Some(n) = v.as_number()
                    && n.is_negative()
                {
                    write!(f, "{} - {}", operand(u, PREC_ADD), n.neg())
                } else {
                    write!(f, "{} + {}", operand(u, PREC_ADD), operand(v, PREC_ADD))
                }
            }

            ExprKind::Mul(u, v) => {
                if u.is_neg_one_num() {
                    return write!(f, "-{}", operand(v, PREC_POW));
                }
                // Show `u * w^-1` as a division
                if let ExprKind::Pow(base, exp) = &v.kind
                    && exp.is_neg_one_num()
                {
                    return write!(f, "{}/{}", operand(u, PREC_MUL), operand(base, PREC_POW));
                }
                write!(f, "{}*{}", operand(u, PREC_MUL), operand(v, PREC_MUL))
            }

            ExprKind::Pow(base, exp) => {
                if exp.is_neg_one_num() {
                    write!(f, "1/{}", operand(base, PREC_POW))
                } else if exp.as_number().is_some_and(|n| *n == Number::half()) {
                    write!(f, "sqrt({})", base)
                } else {
                    write!(f, "{}^{}", operand(base, PREC_POW + 1), operand(exp, PREC_ATOM))
                }
            }

            ExprKind::Relational { op, lhs, rhs } => {
                write!(f, "{} {} {}", lhs, op.symbol(), rhs)
            }

            ExprKind::FunctionCall { name, args } => write!(f, "{}({})", name, join(args)),

            ExprKind::Derivative { inner, var, order } => {
                if order.is_one_num() {
                    write!(f, "Derivative({}, {})", inner, var)
                } else {
                    write!(f, "Derivative({}, ({}, {}))", inner, var, order)
                }
            }

            ExprKind::Subs { inner, var, point } => {
                write!(f, "Subs({}, {}, {})", inner, var, point)
            }

            ExprKind::Integral {
                integrand,
                var,
                bounds,
            } => match bounds {
                Some(b) => write!(f, "Integral({}, {})", integrand, bounds_tuple(var, b)),
                None => write!(f, "Integral({}, {})", integrand, var),
            },

            ExprKind::Sum { body, var, bounds } => {
                write!(f, "Sum({}, {})", body, bounds_tuple(var, bounds))
            }

            ExprKind::Product { body, var, bounds } => {
                write!(f, "Product({}, {})", body, bounds_tuple(var, bounds))
            }

            ExprKind::Limit {
                body,
                var,
                point,
                direction,
            } => write!(
                f,
                "Limit({}, {}, {}, dir='{}')",
                body,
                var,
                point,
                direction.symbol()
            ),

            ExprKind::Matrix(m) => {
                let rows: Vec<String> = m
                    .row_slices()
                    .map(|row| format!("[{}]", join(row)))
                    .collect();
                write!(f, "Matrix([{}])", rows.join(", "))
            }

            ExprKind::Tuple(items) => match items.as_slice() {
                [single] => write!(f, "({},)", single),
                _ => write!(f, "({})", join(items)),
            },

            ExprKind::Bra(inner) => write!(f, "<{}|", inner),
            ExprKind::Ket(inner) => write!(f, "|{}>", inner),
        }
    }
}
