//! Differential tokens and Leibniz fractions
//!
//! A differential token is `d` or `\partial`, an optional `^order`, optional
//! whitespace, then a variable (a letter or a `\command`) with an optional
//! `^order`. The lexer has already checked the shape; this module only takes
//! it apart.

use super::{Converter, Term};
use crate::parser::cst::{Additive, Atom, Comp, Exp, Func, Postfix};
use crate::parser::lexer::matching_brace;
use crate::{Expr, LatexError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    /// `d`
    D,
    /// `\partial`
    Partial,
}

/// The parts of one differential token
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Differential {
    pub marker: Marker,
    /// Variable name without a backslash
    pub variable: String,
    /// Raw order annotation, before or after the variable
    pub order_text: Option<String>,
}

/// Cursor over the text that follows the marker
struct Cursor<'t> {
    rest: &'t str,
}

impl<'t> Cursor<'t> {
    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// `^c` or `^{...}`
    fn order(&mut self) -> Option<&'t str> {
        let after = self.rest.strip_prefix('^')?;
        if after.starts_with('{') {
            let close = matching_brace(after, 0)?;
            let order = &after[1..close];
            self.rest = &after[close + 1..];
            return Some(order);
        }
        let first = after.chars().next()?;
        let (order, rest) = after.split_at(first.len_utf8());
        self.rest = rest;
        Some(order)
    }

    fn variable(&mut self) -> &'t str {
        if let Some(command) = self.rest.strip_prefix('\\') {
            let len = command
                .bytes()
                .take_while(u8::is_ascii_alphabetic)
                .count();
            let (name, rest) = command.split_at(len);
            self.rest = rest;
            return name;
        }
        let len = self.rest.chars().next().map_or(0, char::len_utf8);
        let (name, rest) = self.rest.split_at(len);
        self.rest = rest;
        name
    }
}

impl Differential {
    pub(crate) fn from_token(text: &str) -> Differential {
        let (marker, rest) = match text.strip_prefix("\\partial") {
            Some(rest) => (Marker::Partial, rest),
            None => (Marker::D, text.strip_prefix('d').unwrap_or(text)),
        };
        let mut cursor = Cursor { rest };
        let leading = cursor.order();
        cursor.skip_whitespace();
        let variable = cursor.variable().to_string();
        let trailing = cursor.order();
        Differential {
            marker,
            variable,
            order_text: leading.or(trailing).map(str::to_string),
        }
    }
}

impl Converter<'_> {
    /// The order annotation, read as an expression of its own
    pub(super) fn differential_order(&self, differential: &Differential) -> Result<Expr, LatexError> {
        match &differential.order_text {
            Some(text) => self.config.parse(text),
            None => Ok(Expr::integer(1)),
        }
    }

    /// `\frac{upper}{lower}`, recognising Leibniz notation when `lower` is a
    /// single differential
    pub(super) fn frac(&self, upper: &Additive, lower: &Additive) -> Result<Term, LatexError> {
        if let Some(Atom::Differential(text)) = lower.as_single_atom() {
            let wrt = Differential::from_token(text);
            if let Some(term) = self.leibniz(upper, &wrt)? {
                return Ok(term);
            }
        }

        let numerator = self.expr(upper)?;
        let denominator = self.expr(lower)?;
        if numerator.is_one_num() {
            Ok(Term::Expr(Expr::recip(denominator)))
        } else {
            Ok(Term::Expr(Expr::div_expr(numerator, denominator)))
        }
    }

    fn leibniz(&self, upper: &Additive, wrt: &Differential) -> Result<Option<Term>, LatexError> {
        let Some((first, rest)) = upper.as_postfix_list().and_then(<[Postfix]>::split_first) else {
            return Ok(None);
        };

        // Case 1: `\frac{d}{dx}`, `\frac{d^2}{dx^2} f`, `\frac{d \sin x}{dx}`
        if let Some(marker_order) = self.bare_marker(first, wrt.marker)? {
            let order = match marker_order {
                Some(order) => order,
                None => self.differential_order(wrt)?,
            };
            if rest.is_empty() {
                return Ok(Some(Term::Differential {
                    var: wrt.variable.clone(),
                    order,
                }));
            }
            let target = self.postfix_list(rest)?;
            return Ok(Some(Term::Expr(Expr::derivative(
                target,
                wrt.variable.clone(),
                order,
            ))));
        }

        // Case 2: `\frac{dy}{dx}`, `\frac{\partial f}{\partial x}`
        let (head, order) = match first.as_bare_atom() {
            Some(Atom::Differential(text)) => {
                let top = Differential::from_token(text);
                if top.marker != wrt.marker {
                    return Ok(None);
                }
                let head = match top.marker {
                    Marker::D => Expr::symbol(top.variable.clone()),
                    Marker::Partial => {
                        Expr::func(top.variable.clone(), Expr::symbol(wrt.variable.clone()))
                    }
                };
                let order = match top.order_text {
                    Some(_) => self.differential_order(&top)?,
                    None => self.differential_order(wrt)?,
                };
                (head, order)
            }
            // Case 3: `\frac{d(x^2)}{dx}`
            _ => match (&first.exp, first.ops.is_empty(), wrt.marker) {
                (Exp::Comp(Comp::Func(func)), true, Marker::D) => match func.as_ref() {
                    Func::User {
                        name,
                        sub: None,
                        args,
                    } if name == "d" && args.len() == 1 => {
                        (self.expr(&args[0])?, self.differential_order(wrt)?)
                    }
                    _ => return Ok(None),
                },
                _ => return Ok(None),
            },
        };

        let target = if rest.is_empty() {
            head
        } else {
            Expr::mul_expr(head, self.postfix_list(rest)?)
        };
        Ok(Some(Term::Expr(Expr::derivative(
            target,
            wrt.variable.clone(),
            order,
        ))))
    }

    /// `Some(order)` when `item` is the bare marker, possibly raised to a power
    fn bare_marker(&self, item: &Postfix, marker: Marker) -> Result<Option<Option<Expr>>, LatexError> {
        if !item.ops.is_empty() {
            return Ok(None);
        }
        match &item.exp {
            Exp::Comp(Comp::Atom(atom)) if is_marker(atom, marker) => Ok(Some(None)),
            Exp::Power { base, exponent } => match base.as_ref() {
                Exp::Comp(Comp::Atom(atom)) if is_marker(atom, marker) => {
                    Ok(Some(Some(self.script(exponent)?)))
                }
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }
}

fn is_marker(atom: &Atom, marker: Marker) -> bool {
    match (atom, marker) {
        (Atom::Letter { name, sub: None }, Marker::D) => name == "d",
        (Atom::Symbol { name, sub: None }, Marker::Partial) => name == "partial",
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::parse_latex;

    fn token(text: &str) -> (Marker, String, Option<String>) {
        let d = Differential::from_token(text);
        (d.marker, d.variable, d.order_text)
    }

    #[test]
    fn test_token_shapes() {
        assert_eq!(token("dx"), (Marker::D, "x".into(), None));
        assert_eq!(token("d x"), (Marker::D, "x".into(), None));
        assert_eq!(token("d^2x"), (Marker::D, "x".into(), Some("2".into())));
        assert_eq!(token("dx^{n+1}"), (Marker::D, "x".into(), Some("n+1".into())));
        assert_eq!(token("d\\theta"), (Marker::D, "theta".into(), None));
        assert_eq!(
            token("\\partial^3 y"),
            (Marker::Partial, "y".into(), Some("3".into()))
        );
        assert_eq!(
            token("\\partial^{2}x"),
            (Marker::Partial, "x".into(), Some("2".into()))
        );
    }

    #[test]
    fn test_operator_fraction() {
        assert_eq!(
            parse_latex("\\frac{d}{dx} x^2").unwrap().to_string(),
            "Derivative(x^2, x)"
        );
        assert_eq!(
            parse_latex("\\frac{d^2}{dx^2} f").unwrap().to_string(),
            "Derivative(f, (x, 2))"
        );
        assert_eq!(
            parse_latex("\\frac{\\partial}{\\partial t} u").unwrap().to_string(),
            "Derivative(u, t)"
        );
        assert_eq!(
            parse_latex("\\frac{d \\sin x}{dx}").unwrap().to_string(),
            "Derivative(sin(x), x)"
        );
    }

    #[test]
    fn test_leibniz_quotient() {
        assert_eq!(
            parse_latex("\\frac{dy}{dx}").unwrap().to_string(),
            "Derivative(y, x)"
        );
        assert_eq!(
            parse_latex("\\frac{d^2 y}{dx^2}").unwrap().to_string(),
            "Derivative(y, (x, 2))"
        );
        assert_eq!(
            parse_latex("\\frac{\\partial f}{\\partial x}").unwrap().to_string(),
            "Derivative(f(x), x)"
        );
        assert_eq!(
            parse_latex("\\frac{d(x^2)}{dx}").unwrap().to_string(),
            "Derivative(x^2, x)"
        );
    }

    #[test]
    fn test_symbolic_order() {
        assert_eq!(
            parse_latex("\\frac{d^n}{dx^n} f").unwrap().to_string(),
            "Derivative(f, (x, n))"
        );
    }

    #[test]
    fn test_plain_fractions() {
        assert_eq!(parse_latex("\\frac{1}{x}").unwrap().to_string(), "1/x");
        assert_eq!(parse_latex("\\frac{a}{b}").unwrap().to_string(), "a/b");
        assert_eq!(parse_latex("\\frac{1}{dx}").unwrap().to_string(), "1/dx");
        // Mixed markers are an ordinary quotient
        assert_eq!(
            parse_latex("\\frac{dy}{\\partial x}").unwrap().to_string(),
            "dy/dx"
        );
    }
}
