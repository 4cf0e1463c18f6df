//! Concrete syntax tree
//!
//! One enum per grammar rule, one variant per alternative. The tree is built
//! once by the grammar and only read afterwards.

use crate::ast::RelOp;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Relation {
    Compare {
        lhs: Box<Relation>,
        op: RelOp,
        rhs: Box<Relation>,
    },
    Expr(Additive),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Equality {
    pub lhs: Additive,
    pub rhs: Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddOp {
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MulOp {
    /// `*`, `\times`, `\cdot`
    Mul,
    /// `/`, `\div`, `:`
    Div,
}

/// `expr` in the grammar
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Additive {
    Binary {
        lhs: Box<Additive>,
        op: AddOp,
        rhs: Box<Additive>,
    },
    Mp(Mp),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mp {
    Binary {
        lhs: Box<Mp>,
        op: MulOp,
        rhs: Box<Mp>,
    },
    Unary(Unary),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Unary {
    Plus(Box<Unary>),
    Minus(Box<Unary>),
    /// Juxtaposed terms, multiplied implicitly
    Postfix(Vec<Postfix>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Postfix {
    pub exp: Exp,
    pub ops: Vec<PostfixOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PostfixOp {
    Bang,
    /// `|_{a}^{b}`
    EvalAt {
        sup: Option<EvalAtBound>,
        sub: Option<EvalAtBound>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EvalAtBound {
    Expr(Additive),
    Atom(Atom),
    Equality(Equality),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Exp {
    Power { base: Box<Exp>, exponent: Script },
    Comp(Comp),
}

/// Argument of `_` or `^`: a bare atom or a braced expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Script {
    Atom(Box<Atom>),
    Expr(Box<Additive>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Paren,
    Bracket,
    Brace,
    BraceLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Comp {
    Group {
        delim: Delimiter,
        expr: Box<Additive>,
    },
    Abs(Box<Additive>),
    Func(Box<Func>),
    Atom(Atom),
    Frac {
        upper: Box<Additive>,
        lower: Box<Additive>,
    },
    Binom {
        n: Box<Additive>,
        k: Box<Additive>,
    },
    Floor(Box<Additive>),
    Ceil(Box<Additive>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GridKind {
    Array,
    Matrix,
    Determinant,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PrimeMarks {
    /// `f'''` or `f^{\prime\prime}`
    Count(usize),
    /// `f^{(n)}`
    Order(Box<Additive>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Atom {
    Letter {
        name: String,
        sub: Option<Script>,
    },
    /// A backslash command; `name` has the backslash removed
    Symbol {
        name: String,
        sub: Option<Script>,
    },
    Number(String),
    /// Raw differential token text, e.g. `d^2x`
    Differential(String),
    Mathit(String),
    Prime {
        name: String,
        marks: PrimeMarks,
        arg: Option<Box<Additive>>,
        /// Source text without the argument, e.g. `f''`
        text: String,
    },
    Dot {
        order: usize,
        target: Script,
    },
    /// Numeric text of a degree value
    AngularUnit(String),
    Grid {
        kind: GridKind,
        rows: Vec<Vec<Relation>>,
    },
    Bra(Box<Additive>),
    Ket(Box<Additive>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FuncArgs {
    /// `\sin(a, b)`
    Paren(Vec<Additive>),
    /// `\sin x y`
    Bare(Box<Mp>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BigOp {
    Sum,
    Prod,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Func {
    Normal {
        name: String,
        sub: Option<Script>,
        sup: Option<Script>,
        args: FuncArgs,
    },
    User {
        name: String,
        sub: Option<Script>,
        args: Vec<Additive>,
    },
    Integral {
        /// (lower, upper)
        bounds: Option<(Script, Script)>,
        integrand: Option<Box<Additive>>,
        differential: Option<String>,
    },
    Sqrt {
        root: Option<Box<Additive>>,
        base: Box<Additive>,
    },
    BigOp {
        op: BigOp,
        sub: Equality,
        sup: Script,
        body: Box<Mp>,
    },
    Limit {
        var: Option<String>,
        approach: Box<Additive>,
        /// Sign after the approach point, `x \to 0^-`
        direction: Option<AddOp>,
        body: Box<Mp>,
    },
}

impl Additive {
    /// The juxtaposed terms when this expression is a single implicit product
    pub(crate) fn as_postfix_list(&self) -> Option<&[Postfix]> {
        match self {
            Additive::Mp(Mp::Unary(Unary::Postfix(items))) => Some(items),
            _ => None,
        }
    }

    /// The atom when this expression is exactly one bare atom
    pub(crate) fn as_single_atom(&self) -> Option<&Atom> {
        match self.as_postfix_list()? {
            [item] => item.as_bare_atom(),
            _ => None,
        }
    }
}

impl Postfix {
    /// The atom when this term has no exponent or postfix operator
    pub(crate) fn as_bare_atom(&self) -> Option<&Atom> {
        match (&self.exp, self.ops.is_empty()) {
            (Exp::Comp(Comp::Atom(atom)), true) => Some(atom),
            _ => None,
        }
    }
}
