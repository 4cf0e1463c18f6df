//! Expression tree produced by the LaTeX transducer
//!
//! Nodes are built unevaluated: `1+1` stays `Add(1, 1)` and the caller decides
//! when to fold, differentiate or evaluate.

use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::matrix::Matrix;
use crate::number::Number;

/// Global counter for expression IDs
static EXPR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    EXPR_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct Expr {
    /// Unique ID for debugging (not used in equality comparisons)
    pub id: u64,
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

// Implement Eq and Hash based on KIND only for structural equality
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

/// Named mathematical constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    Infinity,
}

/// Comparison operator of a relational node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            RelOp::Eq => "=",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        }
    }
}

/// Side from which a limit is approached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitDirection {
    Plus,
    Minus,
}

impl LimitDirection {
    pub fn symbol(&self) -> &'static str {
        match self {
            LimitDirection::Plus => "+",
            LimitDirection::Minus => "-",
        }
    }
}

/// Lower and upper limits of a definite integral, sum or product
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub lower: Arc<Expr>,
    pub upper: Arc<Expr>,
}

impl Bounds {
    pub fn new(lower: Expr, upper: Expr) -> Self {
        Bounds {
            lower: Arc::new(lower),
            upper: Arc::new(upper),
        }
    }

    fn map(&self, mut f: impl FnMut(&Expr) -> Expr) -> Bounds {
        Bounds::new(f(&self.lower), f(&self.upper))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// Exact rational literal
    Number(Number),

    /// Variable (e.g., "x", "alpha", "x_{1}")
    Symbol(String),

    Constant(Constant),

    /// Addition; subtraction is `Add(l, Mul(-1, r))`
    Add(Arc<Expr>, Arc<Expr>),

    /// Multiplication; division is `Mul(l, Pow(r, -1))`
    Mul(Arc<Expr>, Arc<Expr>),

    /// Exponentiation
    Pow(Arc<Expr>, Arc<Expr>),

    /// Equation or inequality
    Relational {
        op: RelOp,
        lhs: Arc<Expr>,
        rhs: Arc<Expr>,
    },

    /// Function call (built-in or user-named)
    FunctionCall { name: String, args: Vec<Expr> },

    /// d^order/dvar^order of inner, kept unevaluated
    Derivative {
        inner: Arc<Expr>,
        var: String,
        order: Arc<Expr>,
    },

    /// `inner` with `var` replaced by `point`, kept unevaluated
    Subs {
        inner: Arc<Expr>,
        var: String,
        point: Arc<Expr>,
    },

    Integral {
        integrand: Arc<Expr>,
        var: String,
        bounds: Option<Bounds>,
    },

    Sum {
        body: Arc<Expr>,
        var: String,
        bounds: Bounds,
    },

    Product {
        body: Arc<Expr>,
        var: String,
        bounds: Bounds,
    },

    Limit {
        body: Arc<Expr>,
        var: String,
        point: Arc<Expr>,
        direction: LimitDirection,
    },

    Matrix(Matrix),

    /// Ordered collection (solution sets, array rows, comma lists)
    Tuple(Vec<Expr>),

    /// Quantum bra `<x|`
    Bra(Arc<Expr>),

    /// Quantum ket `|x>`
    Ket(Arc<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            id: next_id(),
            kind,
        }
    }

    // Accessor methods

    /// Check if expression is a number literal and return its value
    pub fn as_number(&self) -> Option<&Number> {
        match &self.kind {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Name of the symbol, if this is a bare symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    #[inline]
    pub fn is_neg_one_num(&self) -> bool {
        self.as_number().is_some_and(Number::is_neg_one)
    }

    /// Matrix or tuple, as opposed to a scalar expression
    pub fn is_structured(&self) -> bool {
        matches!(self.kind, ExprKind::Matrix(_) | ExprKind::Tuple(_))
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_structured()
    }

    // Convenience constructors

    pub fn number(n: Number) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    pub fn integer(n: i64) -> Self {
        Expr::number(Number::integer(n))
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Expr::new(ExprKind::Symbol(s.into()))
    }

    pub fn constant(c: Constant) -> Self {
        Expr::new(ExprKind::Constant(c))
    }

    pub fn pi() -> Self {
        Expr::constant(Constant::Pi)
    }

    pub fn infinity() -> Self {
        Expr::constant(Constant::Infinity)
    }

    /// Create an addition expression
    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    /// Create a multiplication expression
    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    /// Create a power expression
    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// `-1 * expr`
    pub fn negate(expr: Expr) -> Self {
        Expr::mul_expr(Expr::integer(-1), expr)
    }

    /// `left + (-1 * right)`
    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::add_expr(left, Expr::negate(right))
    }

    /// `expr ^ -1`
    pub fn recip(expr: Expr) -> Self {
        Expr::pow(expr, Expr::integer(-1))
    }

    /// `left * (right ^ -1)`
    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::mul_expr(left, Expr::recip(right))
    }

    pub fn relational(op: RelOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::new(ExprKind::Relational {
            op,
            lhs: Arc::new(lhs),
            rhs: Arc::new(rhs),
        })
    }

    /// Create a function call expression (single argument convenience)
    pub fn func(name: impl Into<String>, content: Expr) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: vec![content],
        })
    }

    /// Create a multi-argument function call expression
    pub fn func_multi(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args,
        })
    }

    pub fn derivative(inner: Expr, var: impl Into<String>, order: Expr) -> Self {
        Expr::new(ExprKind::Derivative {
            inner: Arc::new(inner),
            var: var.into(),
            order: Arc::new(order),
        })
    }

    pub fn subs(inner: Expr, var: impl Into<String>, point: Expr) -> Self {
        Expr::new(ExprKind::Subs {
            inner: Arc::new(inner),
            var: var.into(),
            point: Arc::new(point),
        })
    }

    pub fn integral(integrand: Expr, var: impl Into<String>, bounds: Option<Bounds>) -> Self {
        Expr::new(ExprKind::Integral {
            integrand: Arc::new(integrand),
            var: var.into(),
            bounds,
        })
    }

    pub fn sum(body: Expr, var: impl Into<String>, bounds: Bounds) -> Self {
        Expr::new(ExprKind::Sum {
            body: Arc::new(body),
            var: var.into(),
            bounds,
        })
    }

    pub fn product(body: Expr, var: impl Into<String>, bounds: Bounds) -> Self {
        Expr::new(ExprKind::Product {
            body: Arc::new(body),
            var: var.into(),
            bounds,
        })
    }

    pub fn limit(
        body: Expr,
        var: impl Into<String>,
        point: Expr,
        direction: LimitDirection,
    ) -> Self {
        Expr::new(ExprKind::Limit {
            body: Arc::new(body),
            var: var.into(),
            point: Arc::new(point),
            direction,
        })
    }

    pub fn matrix(matrix: Matrix) -> Self {
        Expr::new(ExprKind::Matrix(matrix))
    }

    pub fn tuple(items: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Tuple(items))
    }

    pub fn bra(inner: Expr) -> Self {
        Expr::new(ExprKind::Bra(Arc::new(inner)))
    }

    pub fn ket(inner: Expr) -> Self {
        Expr::new(ExprKind::Ket(Arc::new(inner)))
    }

    // Structure

    /// Direct children in a fixed order (operands, then bounds or orders)
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => Vec::new(),
            ExprKind::Add(l, r) | ExprKind::Mul(l, r) | ExprKind::Pow(l, r) => {
                vec![l.as_ref(), r.as_ref()]
            }
            ExprKind::Relational { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            ExprKind::FunctionCall { args, .. } => args.iter().collect(),
            ExprKind::Derivative { inner, order, .. } => vec![inner.as_ref(), order.as_ref()],
            ExprKind::Subs { inner, point, .. } => vec![inner.as_ref(), point.as_ref()],
            ExprKind::Integral {
                integrand, bounds, ..
            } => match bounds {
                Some(b) => vec![integrand.as_ref(), b.lower.as_ref(), b.upper.as_ref()],
                None => vec![integrand.as_ref()],
            },
            ExprKind::Sum { body, bounds, .. } | ExprKind::Product { body, bounds, .. } => {
                vec![body.as_ref(), bounds.lower.as_ref(), bounds.upper.as_ref()]
            }
            ExprKind::Limit { body, point, .. } => vec![body.as_ref(), point.as_ref()],
            ExprKind::Matrix(m) => m.entries().iter().collect(),
            ExprKind::Tuple(items) => items.iter().collect(),
            ExprKind::Bra(inner) | ExprKind::Ket(inner) => vec![inner.as_ref()],
        }
    }

    /// Rebuild this node with every child passed through `f`
    pub fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => self.clone(),
            ExprKind::Add(l, r) => Expr::add_expr(f(l), f(r)),
            ExprKind::Mul(l, r) => Expr::mul_expr(f(l), f(r)),
            ExprKind::Pow(l, r) => Expr::pow(f(l), f(r)),
            ExprKind::Relational { op, lhs, rhs } => Expr::relational(*op, f(lhs), f(rhs)),
            ExprKind::FunctionCall { name, args } => {
                Expr::func_multi(name.clone(), args.iter().map(f).collect())
            }
            ExprKind::Derivative { inner, var, order } => {
                Expr::derivative(f(inner), var.clone(), f(order))
            }
            ExprKind::Subs { inner, var, point } => Expr::subs(f(inner), var.clone(), f(point)),
            ExprKind::Integral {
                integrand,
                var,
                bounds,
            } => {
                let integrand = f(integrand);
                Expr::integral(integrand, var.clone(), bounds.as_ref().map(|b| b.map(&mut f)))
            }
            ExprKind::Sum { body, var, bounds } => {
                let body = f(body);
                Expr::sum(body, var.clone(), bounds.map(&mut f))
            }
            ExprKind::Product { body, var, bounds } => {
                let body = f(body);
                Expr::product(body, var.clone(), bounds.map(&mut f))
            }
            ExprKind::Limit {
                body,
                var,
                point,
                direction,
            } => Expr::limit(f(body), var.clone(), f(point), *direction),
            ExprKind::Matrix(m) => Expr::matrix(m.map(f)),
            ExprKind::Tuple(items) => Expr::tuple(items.iter().map(f).collect()),
            ExprKind::Bra(inner) => Expr::bra(f(inner)),
            ExprKind::Ket(inner) => Expr::ket(f(inner)),
        }
    }

    // Analysis methods

    /// Count the total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::node_count)
            .sum::<usize>()
    }

    /// Get the maximum nesting depth of the tree
    pub fn max_depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::max_depth)
            .max()
            .unwrap_or(0)
    }

    /// Symbols the value of this expression depends on, in lexical order.
    ///
    /// Variables bound by a definite integral, sum, product, limit or `Subs`
    /// are excluded; a derivative or indefinite integral still depends on its
    /// variable.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_free_symbols(&mut out);
        out
    }

    fn collect_free_symbols(&self, out: &mut BTreeSet<String>) {
        let bound_scope = |body: &Expr, var: &str, out: &mut BTreeSet<String>| {
            let mut inner = body.free_symbols();
            inner.remove(var);
            out.extend(inner);
        };
        match &self.kind {
            ExprKind::Symbol(s) => {
                out.insert(s.clone());
            }
            ExprKind::Integral {
                integrand,
                var,
                bounds: Some(b),
            } => {
                bound_scope(integrand, var, out);
                b.lower.collect_free_symbols(out);
                b.upper.collect_free_symbols(out);
            }
            ExprKind::Integral {
                integrand,
                var,
                bounds: None,
            } => {
                integrand.collect_free_symbols(out);
                out.insert(var.clone());
            }
            ExprKind::Sum { body, var, bounds } | ExprKind::Product { body, var, bounds } => {
                bound_scope(body, var, out);
                bounds.lower.collect_free_symbols(out);
                bounds.upper.collect_free_symbols(out);
            }
            ExprKind::Limit {
                body, var, point, ..
            } => {
                bound_scope(body, var, out);
                point.collect_free_symbols(out);
            }
            ExprKind::Subs { inner, var, point } => {
                bound_scope(inner, var, out);
                point.collect_free_symbols(out);
            }
            ExprKind::Derivative { inner, var, order } => {
                inner.collect_free_symbols(out);
                order.collect_free_symbols(out);
                out.insert(var.clone());
            }
            _ => {
                for child in self.children() {
                    child.collect_free_symbols(out);
                }
            }
        }
    }

    /// Check if the value of the expression depends on `var`
    pub fn contains_var(&self, var: &str) -> bool {
        self.free_symbols().contains(var)
    }

    /// Replace the free occurrences of `var` by `replacement`.
    ///
    /// Bound occurrences are left alone. A derivative (or indefinite integral)
    /// taken with respect to `var` is renamed when the replacement is a
    /// symbol and wrapped in `Subs` otherwise, so `f'(2)` keeps its meaning.
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        match &self.kind {
            ExprKind::Symbol(s) if s == var => replacement.clone(),
            ExprKind::Integral {
                integrand,
                var: v,
                bounds: Some(b),
            } if v == var => Expr::integral(
                integrand.as_ref().clone(),
                v.clone(),
                Some(b.map(|e| e.substitute(var, replacement))),
            ),
            ExprKind::Sum {
                body,
                var: v,
                bounds,
            } if v == var => Expr::sum(
                body.as_ref().clone(),
                v.clone(),
                bounds.map(|e| e.substitute(var, replacement)),
            ),
            ExprKind::Product {
                body,
                var: v,
                bounds,
            } if v == var => Expr::product(
                body.as_ref().clone(),
                v.clone(),
                bounds.map(|e| e.substitute(var, replacement)),
            ),
            ExprKind::Limit {
                body,
                var: v,
                point,
                direction,
            } if v == var => Expr::limit(
                body.as_ref().clone(),
                v.clone(),
                point.substitute(var, replacement),
                *direction,
            ),
            ExprKind::Subs {
                inner,
                var: v,
                point,
            } if v == var => Expr::subs(
                inner.as_ref().clone(),
                v.clone(),
                point.substitute(var, replacement),
            ),
            ExprKind::Derivative {
                inner,
                var: v,
                order,
            } if v == var => match replacement.as_symbol() {
                Some(renamed) => Expr::derivative(
                    inner.substitute(var, replacement),
                    renamed,
                    order.substitute(var, replacement),
                ),
                None => Expr::subs(self.clone(), var, replacement.clone()),
            },
            ExprKind::Integral {
                integrand,
                var: v,
                bounds: None,
            } if v == var => match replacement.as_symbol() {
                Some(renamed) => {
                    Expr::integral(integrand.substitute(var, replacement), renamed, None)
                }
                None => Expr::subs(self.clone(), var, replacement.clone()),
            },
            _ => self.map_children(|child| child.substitute(var, replacement)),
        }
    }

    /// Replace every subtree structurally equal to `target`
    pub fn replace(&self, target: &Expr, replacement: &Expr) -> Expr {
        if let Some(name) = target.as_symbol() {
            return self.substitute(name, replacement);
        }
        if self == target {
            return replacement.clone();
        }
        self.map_children(|child| child.replace(target, replacement))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_constructors() {
        let num = Expr::integer(3);
        match &num.kind {
            ExprKind::Number(n) => assert_eq!(n.as_i64(), Some(3)),
            _ => panic!("Expected Number variant"),
        }

        let sub = Expr::sub_expr(x(), Expr::integer(1));
        match &sub.kind {
            ExprKind::Add(_, r) => assert!(matches!(r.kind, ExprKind::Mul(_, _))),
            _ => panic!("Expected Add variant"),
        }

        let div = Expr::div_expr(Expr::integer(1), x());
        match &div.kind {
            ExprKind::Mul(_, r) => assert!(matches!(r.kind, ExprKind::Pow(_, _))),
            _ => panic!("Expected Mul variant"),
        }
    }

    #[test]
    fn test_ids() {
        let e1 = Expr::integer(1);
        let e2 = Expr::integer(1);
        let e3 = Expr::integer(2);

        assert_ne!(e1.id, e2.id); // IDs must be unique
        assert_eq!(e1, e2); // Structural equality should pass
        assert_ne!(e1, e3);
    }

    #[test]
    fn test_node_count_and_depth() {
        assert_eq!(x().node_count(), 1);
        let nested = Expr::add_expr(Expr::mul_expr(x(), Expr::symbol("y")), Expr::integer(1));
        assert_eq!(nested.node_count(), 5);
        assert_eq!(nested.max_depth(), 3);
    }

    #[test]
    fn test_free_symbols_skip_bound_variables() {
        let body = Expr::mul_expr(x(), Expr::symbol("a"));
        let integral = Expr::integral(
            body.clone(),
            "x",
            Some(Bounds::new(Expr::integer(0), Expr::symbol("b"))),
        );
        let names: Vec<String> = integral.free_symbols().into_iter().collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);

        let indefinite = Expr::integral(body, "x", None);
        assert!(indefinite.free_symbols().contains("x"));
    }

    #[test]
    fn test_free_symbols_are_lexically_ordered() {
        let expr = Expr::add_expr(Expr::symbol("z"), Expr::mul_expr(Expr::symbol("b"), x()));
        let names: Vec<String> = expr.free_symbols().into_iter().collect();
        assert_eq!(names, vec!["b", "x", "z"]);
    }

    #[test]
    fn test_substitute_leaves_bound_occurrences() {
        let sum = Expr::sum(
            x(),
            "x",
            Bounds::new(Expr::integer(1), Expr::symbol("x")),
        );
        let replaced = sum.substitute("x", &Expr::integer(5));
        match &replaced.kind {
            ExprKind::Sum { body, bounds, .. } => {
                assert_eq!(body.as_ref(), &x());
                assert_eq!(bounds.upper.as_ref(), &Expr::integer(5));
            }
            _ => panic!("Expected Sum variant"),
        }
    }

    #[test]
    fn test_substitute_into_derivative() {
        let f = Expr::func("f", x());
        let d = Expr::derivative(f, "x", Expr::integer(1));

        let renamed = d.substitute("x", &Expr::symbol("y"));
        match &renamed.kind {
            ExprKind::Derivative { var, inner, .. } => {
                assert_eq!(var, "y");
                assert_eq!(inner.as_ref(), &Expr::func("f", Expr::symbol("y")));
            }
            _ => panic!("Expected Derivative variant"),
        }

        let at_two = d.substitute("x", &Expr::integer(2));
        assert!(matches!(at_two.kind, ExprKind::Subs { .. }));
        assert!(at_two.free_symbols().is_empty());
    }

    #[test]
    fn test_replace_subtree() {
        let fx = Expr::func("f", x());
        let expr = Expr::add_expr(fx.clone(), Expr::integer(1));
        let replaced = expr.replace(&fx, &Expr::integer(3));
        assert_eq!(replaced, Expr::add_expr(Expr::integer(3), Expr::integer(1)));
    }
}
