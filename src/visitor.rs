//! Expression visitor pattern for tree traversal
//!
//! Provides a clean interface for walking the expression tree without
//! manually handling the recursive structure.

use std::collections::BTreeSet;

use crate::ast::Constant;
use crate::number::Number;
use crate::{Expr, ExprKind};

/// Trait for visiting expression nodes
///
/// Each method returns a boolean indicating whether to continue visiting children.
/// Binders and collections have default methods that always descend.
///
/// # Example
/// ```
/// use symb_latex::visitor::{ExprVisitor, walk_expr};
/// use symb_latex::{Number, Expr, parse_latex};
///
/// struct Numbers(usize);
///
/// impl ExprVisitor for Numbers {
///     fn visit_number(&mut self, _n: &Number) -> bool { self.0 += 1; true }
///     fn visit_symbol(&mut self, _name: &str) -> bool { true }
///     fn visit_function(&mut self, _name: &str, _args: &[Expr]) -> bool { true }
///     fn visit_binary(&mut self, _op: &str, _left: &Expr, _right: &Expr) -> bool { true }
/// }
///
/// let mut numbers = Numbers(0);
/// walk_expr(&parse_latex("2x + 3").unwrap(), &mut numbers);
/// assert_eq!(numbers.0, 2);
/// ```
pub trait ExprVisitor {
    /// Visit an exact number literal
    fn visit_number(&mut self, n: &Number) -> bool;

    /// Visit a symbol/variable
    fn visit_symbol(&mut self, name: &str) -> bool;

    /// Visit a function call, returns true to visit arguments
    fn visit_function(&mut self, name: &str, args: &[Expr]) -> bool;

    /// Visit a binary node (`+`, `*`, `^` or a relation symbol), returns true to visit operands
    fn visit_binary(&mut self, op: &str, left: &Expr, right: &Expr) -> bool;

    fn visit_constant(&mut self, _constant: Constant) -> bool {
        true
    }

    /// Visit a node that binds `var` (derivative, substitution, integral,
    /// sum, product, limit), returns true to visit its children
    fn visit_binder(&mut self, _construct: &str, _var: &str, _expr: &Expr) -> bool {
        true
    }

    /// Visit a matrix, tuple, bra or ket
    fn visit_collection(&mut self, _expr: &Expr) -> bool {
        true
    }
}

/// Walk an expression tree with a visitor
///
/// Visits nodes in pre-order (parent before children).
/// The visitor methods return true to continue walking children, false to skip.
pub fn walk_expr<V: ExprVisitor>(expr: &Expr, visitor: &mut V) {
    let descend = match &expr.kind {
        ExprKind::Number(n) => visitor.visit_number(n),
        ExprKind::Symbol(s) => visitor.visit_symbol(s),
        ExprKind::Constant(c) => visitor.visit_constant(*c),
        ExprKind::FunctionCall { name, args } => visitor.visit_function(name, args),
        ExprKind::Add(l, r) => visitor.visit_binary("+", l, r),
        ExprKind::Mul(l, r) => visitor.visit_binary("*", l, r),
        ExprKind::Pow(l, r) => visitor.visit_binary("^", l, r),
        ExprKind::Relational { op, lhs, rhs } => visitor.visit_binary(op.symbol(), lhs, rhs),
        ExprKind::Derivative { var, .. } => visitor.visit_binder("Derivative", var, expr),
        ExprKind::Subs { var, .. } => visitor.visit_binder("Subs", var, expr),
        ExprKind::Integral { var, .. } => visitor.visit_binder("Integral", var, expr),
        ExprKind::Sum { var, .. } => visitor.visit_binder("Sum", var, expr),
        ExprKind::Product { var, .. } => visitor.visit_binder("Product", var, expr),
        ExprKind::Limit { var, .. } => visitor.visit_binder("Limit", var, expr),
        ExprKind::Matrix(_) | ExprKind::Tuple(_) | ExprKind::Bra(_) | ExprKind::Ket(_) => {
            visitor.visit_collection(expr)
        }
    };
    if descend {
        for child in expr.children() {
            walk_expr(child, visitor);
        }
    }
}

/// A simple visitor that counts nodes
#[derive(Default)]
pub struct NodeCounter {
    pub count: usize,
}

impl ExprVisitor for NodeCounter {
    fn visit_number(&mut self, _n: &Number) -> bool {
        self.count += 1;
        true
    }

    fn visit_symbol(&mut self, _name: &str) -> bool {
        self.count += 1;
        true
    }

    fn visit_function(&mut self, _name: &str, _args: &[Expr]) -> bool {
        self.count += 1;
        true
    }

    fn visit_binary(&mut self, _op: &str, _left: &Expr, _right: &Expr) -> bool {
        self.count += 1;
        true
    }

    fn visit_constant(&mut self, _constant: Constant) -> bool {
        self.count += 1;
        true
    }

    fn visit_binder(&mut self, _construct: &str, _var: &str, _expr: &Expr) -> bool {
        self.count += 1;
        true
    }

    fn visit_collection(&mut self, _expr: &Expr) -> bool {
        self.count += 1;
        true
    }
}

/// Collects every function name called anywhere in the tree
#[derive(Default)]
pub struct FunctionCollector {
    pub functions: BTreeSet<String>,
}

impl ExprVisitor for FunctionCollector {
    fn visit_number(&mut self, _n: &Number) -> bool {
        true
    }

    fn visit_symbol(&mut self, _name: &str) -> bool {
        true
    }

    fn visit_function(&mut self, name: &str, _args: &[Expr]) -> bool {
        self.functions.insert(name.to_string());
        true
    }

    fn visit_binary(&mut self, _op: &str, _left: &Expr, _right: &Expr) -> bool {
        true
    }
}

/// Collects the variables bound by derivatives, integrals, sums, products and limits
#[derive(Default)]
pub struct BinderCollector {
    pub variables: BTreeSet<String>,
}

impl ExprVisitor for BinderCollector {
    fn visit_number(&mut self, _n: &Number) -> bool {
        true
    }

    fn visit_symbol(&mut self, _name: &str) -> bool {
        true
    }

    fn visit_function(&mut self, _name: &str, _args: &[Expr]) -> bool {
        true
    }

    fn visit_binary(&mut self, _op: &str, _left: &Expr, _right: &Expr) -> bool {
        true
    }

    fn visit_binder(&mut self, _construct: &str, var: &str, _expr: &Expr) -> bool {
        self.variables.insert(var.to_string());
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::parse_latex;

    #[test]
    fn test_node_counter_matches_node_count() {
        for input in ["x + x^2", "\\int_0^1 \\sin x dx", "\\begin{pmatrix}a & 1\\end{pmatrix}"] {
            let expr = parse_latex(input).unwrap();
            let mut counter = NodeCounter::default();
            walk_expr(&expr, &mut counter);
            assert_eq!(counter.count, expr.node_count(), "{}", input);
        }
    }

    #[test]
    fn test_function_collector() {
        let expr = parse_latex("\\sin x + \\cos(f(y))").unwrap();
        let mut collector = FunctionCollector::default();
        walk_expr(&expr, &mut collector);
        let names: Vec<&str> = collector.functions.iter().map(String::as_str).collect();
        assert_eq!(names, ["cos", "f", "sin"]);
    }

    #[test]
    fn test_binder_collector() {
        let expr = parse_latex("\\sum_{n=1}^{N} \\int x^n dx").unwrap();
        let mut collector = BinderCollector::default();
        walk_expr(&expr, &mut collector);
        assert_eq!(collector.variables.len(), 2);
        assert!(collector.variables.contains("n"));
        assert!(collector.variables.contains("x"));
    }

    #[test]
    fn test_skip_children() {
        struct TopOnly(usize);
        impl ExprVisitor for TopOnly {
            fn visit_number(&mut self, _n: &Number) -> bool {
                self.0 += 1;
                false
            }
            fn visit_symbol(&mut self, _name: &str) -> bool {
                self.0 += 1;
                false
            }
            fn visit_function(&mut self, _name: &str, _args: &[Expr]) -> bool {
                self.0 += 1;
                false
            }
            fn visit_binary(&mut self, _op: &str, _left: &Expr, _right: &Expr) -> bool {
                self.0 += 1;
                false
            }
        }
        let mut top = TopOnly(0);
        walk_expr(&parse_latex("a + b + c").unwrap(), &mut top);
        assert_eq!(top.0, 1);
    }
}
