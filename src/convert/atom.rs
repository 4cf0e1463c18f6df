//! Leaves of the syntax tree

use super::Converter;
use super::differential::Differential;
use crate::matrix::Matrix;
use crate::number::Number;
use crate::parser::cst::{Atom, GridKind, PrimeMarks, Relation};
use crate::{Expr, LatexError};

/// Variable a prime derivative is taken in before the argument is plugged in
const PRIME_VAR: &str = "x";
/// Variable of `\dot` and `\ddot`
const TIME_VAR: &str = "t";

impl Converter<'_> {
    pub(super) fn atom(&self, atom: &Atom) -> Result<Expr, LatexError> {
        match atom {
            Atom::Letter { name, sub } => Ok(Expr::symbol(self.subscripted(name, sub.as_ref())?)),
            Atom::Symbol { name, sub } => match name.as_str() {
                "infty" => Ok(Expr::infinity()),
                "pi" => Ok(Expr::pi()),
                _ => Ok(Expr::symbol(self.subscripted(name, sub.as_ref())?)),
            },
            Atom::Number(text) => number(text),
            Atom::Differential(text) => {
                let differential = Differential::from_token(text);
                Ok(Expr::symbol(format!("d{}", differential.variable)))
            }
            Atom::Mathit(text) => Ok(Expr::symbol(text.clone())),
            Atom::Prime {
                name,
                marks,
                arg,
                text,
            } => {
                let Some(arg) = arg else {
                    return Ok(Expr::symbol(text.clone()));
                };
                let order = match marks {
                    PrimeMarks::Count(count) => {
                        Expr::integer(i64::try_from(*count).unwrap_or(i64::MAX))
                    }
                    PrimeMarks::Order(order) => self.expr(order)?,
                };
                let point = self.expr(arg)?;
                let applied = Expr::func(name.clone(), Expr::symbol(PRIME_VAR));
                Ok(Expr::derivative(applied, PRIME_VAR, order).substitute(PRIME_VAR, &point))
            }
            Atom::Dot { order, target } => {
                let target = self.script(target)?;
                let order = Expr::integer(i64::try_from(*order).unwrap_or(i64::MAX));
                Ok(Expr::derivative(target, TIME_VAR, order))
            }
            Atom::AngularUnit(text) => {
                let degrees = number(text)?;
                Ok(Expr::mul_expr(
                    degrees,
                    Expr::div_expr(Expr::pi(), Expr::integer(180)),
                ))
            }
            Atom::Grid { kind, rows } => self.grid(*kind, rows),
            Atom::Bra(inner) => Ok(Expr::bra(self.expr(inner)?)),
            Atom::Ket(inner) => Ok(Expr::ket(self.expr(inner)?)),
        }
    }

    fn grid(&self, kind: GridKind, rows: &[Vec<Relation>]) -> Result<Expr, LatexError> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| self.relation(cell)).collect())
            .collect::<Result<Vec<Vec<Expr>>, _>>()?;
        match kind {
            GridKind::Array => Ok(Expr::tuple(rows.into_iter().map(Expr::tuple).collect())),
            GridKind::Matrix => Ok(Expr::matrix(Matrix::from_rows(rows)?)),
            GridKind::Determinant => Matrix::from_rows(rows)?.determinant(),
        }
    }
}

fn number(text: &str) -> Result<Expr, LatexError> {
    Number::parse_literal(text)
        .map(Expr::number)
        .ok_or_else(|| LatexError::invalid_number(text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use crate::ast::Constant;
    use crate::{Expr, ExprKind, parse_latex};

    fn show(input: &str) -> String {
        parse_latex(input).unwrap().to_string()
    }

    #[test]
    fn test_subscripted_names() {
        assert_eq!(parse_latex("x_1").unwrap(), Expr::symbol("x_{1}"));
        assert_eq!(parse_latex("x_{i+1}").unwrap(), Expr::symbol("x_{i + 1}"));
        assert_eq!(parse_latex("\\alpha_{0}").unwrap(), Expr::symbol("alpha_{0}"));
    }

    #[test]
    fn test_reserved_symbols() {
        assert!(matches!(
            parse_latex("\\infty").unwrap().kind,
            ExprKind::Constant(Constant::Infinity)
        ));
        assert!(matches!(
            parse_latex("\\pi").unwrap().kind,
            ExprKind::Constant(Constant::Pi)
        ));
    }

    #[test]
    fn test_numbers_are_exact() {
        assert_eq!(show("1,000,000"), "1000000");
        assert_eq!(show("007"), "7");
        assert_eq!(show("0.5"), "1/2");
        assert_eq!(show("0"), "0");
    }

    #[test]
    fn test_standalone_differential() {
        assert_eq!(parse_latex("dx").unwrap(), Expr::symbol("dx"));
    }

    #[test]
    fn test_primes() {
        assert_eq!(show("f'"), "f'");
        assert_eq!(show("f'(x)"), "Derivative(f(x), x)");
        assert_eq!(show("f''(y)"), "Derivative(f(y), (y, 2))");
        assert_eq!(show("f^{\\prime\\prime\\prime}(x)"), "Derivative(f(x), (x, 3))");
        assert_eq!(show("f^{(4)}(x)"), "Derivative(f(x), (x, 4))");
        assert_eq!(show("f'(2)"), "Subs(Derivative(f(x), x), x, 2)");
    }

    #[test]
    fn test_dots() {
        assert_eq!(show("\\dot{x}"), "Derivative(x, t)");
        assert_eq!(show("\\ddot x"), "Derivative(x, (t, 2))");
    }

    #[test]
    fn test_angular_unit() {
        assert_eq!(show("90^\\circ"), "90*pi/180");
        assert_eq!(show("45°"), "45*pi/180");
    }

    #[test]
    fn test_mathit() {
        assert_eq!(parse_latex("\\mathit{speed}").unwrap(), Expr::symbol("speed"));
    }

    #[test]
    fn test_grids() {
        assert_eq!(
            show("\\begin{array}{cc}1 & 2\\\\3 & 4\\end{array}"),
            "((1, 2), (3, 4))"
        );
        assert_eq!(
            show("\\begin{bmatrix}a & b\\\\c & d\\end{bmatrix}"),
            "Matrix([[a, b], [c, d]])"
        );
        assert_eq!(show("\\begin{vmatrix}1 & 2\\\\3 & 4\\end{vmatrix}"), "-2");
    }

    #[test]
    fn test_ragged_grid() {
        assert!(matches!(
            parse_latex("\\begin{pmatrix}1 & 2\\\\3\\end{pmatrix}"),
            Err(crate::LatexError::RaggedMatrix { row: 1, .. })
        ));
    }

    #[test]
    fn test_bra_ket() {
        assert_eq!(show("\\langle \\phi |"), "<phi|");
        assert_eq!(show("|\\psi\\rangle"), "|psi>");
    }
}
