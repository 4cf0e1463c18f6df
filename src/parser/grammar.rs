//! Recursive-descent grammar producing the concrete syntax tree
//!
//! Precedence, loosest first: relation, additive, multiplicative, unary
//! (implicit products), postfix, power, component.
//!
//! The parser commits to the first alternative its current token selects.
//! Backtracking is limited to three spots: a `|` that may close an enclosing
//! absolute value, a letter that may start a user function call, and the
//! `f^{(n)}(x)` derivative form, which otherwise reads as a power.

use super::cst::*;
use super::diagnostics::SyntaxFailure;
use super::tokens::{COMPONENT_START, Token, TokenKind};
use crate::ast::RelOp;

/// Why the grammar stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseFailure {
    Syntax {
        failure: SyntaxFailure,
        offset: usize,
    },
    TooDeep,
}

type PResult<T> = Result<T, ParseFailure>;

fn rel_op(kind: TokenKind) -> Option<RelOp> {
    match kind {
        TokenKind::Equal => Some(RelOp::Eq),
        TokenKind::Neq => Some(RelOp::Ne),
        TokenKind::Lt => Some(RelOp::Lt),
        TokenKind::Lte => Some(RelOp::Le),
        TokenKind::Gt => Some(RelOp::Gt),
        TokenKind::Gte => Some(RelOp::Ge),
        _ => None,
    }
}

fn is_closing(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen
            | TokenKind::RBrace
            | TokenKind::RBracket
            | TokenKind::RBraceLiteral
            | TokenKind::Bar
            | TokenKind::RAngle
            | TokenKind::RFloor
            | TokenKind::RCeil
    )
}

struct Grammar<'t, 's> {
    tokens: &'t [Token<'s>],
    source: &'s str,
    pos: usize,
    depth: usize,
    max_depth: usize,
    /// Set while reading an integrand: a differential ends the implicit product
    stop_at_differential: bool,
}

impl<'t, 's> Grammar<'t, 's> {
    // ===== Token access =====

    fn current(&self) -> Token<'s> {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", self.source.len(), self.source.len()))
    }

    fn peek(&self, ahead: usize) -> TokenKind {
        self.tokens
            .get(self.pos + ahead)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().is(kind)
    }

    fn advance(&mut self) -> Token<'s> {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Source text from token `start` through the last consumed token
    fn text_since(&self, start: usize) -> String {
        let begin = self.tokens.get(start).map_or(0, |t| t.offset);
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|last| self.tokens.get(last))
            .map_or(begin, |t| t.end);
        self.source.get(begin..end).unwrap_or_default().to_string()
    }

    // ===== Failures =====

    fn fail<T>(&self, failure: SyntaxFailure) -> PResult<T> {
        Err(ParseFailure::Syntax {
            failure,
            offset: self.current().offset,
        })
    }

    fn mismatched<T>(&self, expected: &[TokenKind]) -> PResult<T> {
        self.fail(SyntaxFailure::MismatchedInput {
            expected: expected.iter().map(TokenKind::display_name).collect(),
        })
    }

    fn no_viable<T>(&self) -> PResult<T> {
        if self.at(TokenKind::Eof) {
            self.mismatched(&COMPONENT_START)
        } else {
            self.fail(SyntaxFailure::NoViableAlternative)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token<'s>> {
        if self.at(kind) {
            return Ok(self.advance());
        }
        if self.at(TokenKind::Eof) && is_closing(kind) {
            return self.fail(SyntaxFailure::MissingToken {
                message: format!("missing {} at '<EOF>'", kind.display_name()),
            });
        }
        self.mismatched(&[kind])
    }

    // ===== Combinators =====

    /// Run `f`, rewinding on a syntax failure
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        let saved = (self.pos, self.depth, self.stop_at_differential);
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(ParseFailure::TooDeep) => Err(ParseFailure::TooDeep),
            Err(ParseFailure::Syntax { .. }) => {
                (self.pos, self.depth, self.stop_at_differential) = saved;
                Ok(None)
            }
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.max_depth {
            return Err(ParseFailure::TooDeep);
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    /// One more operand in a chain (`a + b`, `a b`, `n!`). The converted tree
    /// grows a level per link, so links share the nesting budget.
    fn link(&mut self) -> PResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseFailure::TooDeep);
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `f` where a differential does not end the implicit product
    fn isolated<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = std::mem::replace(&mut self.stop_at_differential, false);
        let out = f(self);
        self.stop_at_differential = saved;
        out
    }

    fn delimited<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.expect(open)?;
        let inner = self.isolated(f)?;
        self.expect(close)?;
        Ok(inner)
    }

    fn braced_expr(&mut self) -> PResult<Additive> {
        self.delimited(TokenKind::LBrace, TokenKind::RBrace, |g| g.expr())
    }

    fn paren_expr(&mut self) -> PResult<Additive> {
        self.delimited(TokenKind::LParen, TokenKind::RParen, |g| g.expr())
    }

    fn arg_list(&mut self) -> PResult<Vec<Additive>> {
        let mut args = vec![self.expr()?];
        while self.eat(TokenKind::Comma) {
            args.push(self.expr()?);
        }
        Ok(args)
    }

    // ===== Operator levels =====

    fn relation(&mut self) -> PResult<Relation> {
        let base = self.depth;
        let mut lhs = Relation::Expr(self.expr()?);
        while self.current().kind.is_relation() {
            let Some(op) = rel_op(self.advance().kind) else {
                break;
            };
            self.link()?;
            let rhs = Relation::Expr(self.expr()?);
            lhs = Relation::Compare {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        self.depth = base;
        Ok(lhs)
    }

    fn equality(&mut self) -> PResult<Equality> {
        let lhs = self.expr()?;
        self.expect(TokenKind::Equal)?;
        let rhs = self.expr()?;
        Ok(Equality { lhs, rhs })
    }

    fn expr(&mut self) -> PResult<Additive> {
        let base = self.depth;
        let mut lhs = Additive::Mp(self.mp(false)?);
        loop {
            let op = match self.current().kind {
                TokenKind::Add => AddOp::Add,
                TokenKind::Sub => AddOp::Sub,
                _ => break,
            };
            self.advance();
            self.link()?;
            let rhs = Additive::Mp(self.mp(false)?);
            lhs = Additive::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        self.depth = base;
        Ok(lhs)
    }

    fn mp(&mut self, nofunc: bool) -> PResult<Mp> {
        let base = self.depth;
        let mut lhs = Mp::Unary(self.unary(nofunc)?);
        loop {
            let op = match self.current().kind {
                TokenKind::Mul | TokenKind::CmdTimes | TokenKind::CmdCdot => MulOp::Mul,
                TokenKind::Div | TokenKind::CmdDiv | TokenKind::Colon => MulOp::Div,
                _ => break,
            };
            self.advance();
            self.link()?;
            let rhs = Mp::Unary(self.unary(nofunc)?);
            lhs = Mp::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        self.depth = base;
        Ok(lhs)
    }

    fn continues_product(&self, nofunc: bool) -> bool {
        let kind = self.current().kind;
        if self.stop_at_differential && kind == TokenKind::Differential {
            return false;
        }
        if nofunc {
            kind.starts_component_nofunc()
        } else {
            kind.starts_component()
        }
    }

    fn unary(&mut self, nofunc: bool) -> PResult<Unary> {
        self.nested(|g| match g.current().kind {
            TokenKind::Add => {
                g.advance();
                Ok(Unary::Plus(Box::new(g.unary(nofunc)?)))
            }
            TokenKind::Sub => {
                g.advance();
                Ok(Unary::Minus(Box::new(g.unary(nofunc)?)))
            }
            _ => {
                // The first term may always be a function, even in `\sin x y`
                let base = g.depth;
                let mut items = vec![g.postfix(false)?];
                while g.continues_product(nofunc) {
                    if g.at(TokenKind::Bar) {
                        match g.attempt(|g| g.postfix(nofunc))? {
                            Some(item) => items.push(item),
                            None => break,
                        }
                    } else {
                        items.push(g.postfix(nofunc)?);
                    }
                    g.link()?;
                }
                g.depth = base;
                Ok(Unary::Postfix(items))
            }
        })
    }

    fn postfix(&mut self, nofunc: bool) -> PResult<Postfix> {
        let base = self.depth;
        let exp = self.exp(nofunc)?;
        let mut ops = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Bang => {
                    self.advance();
                    self.link()?;
                    ops.push(PostfixOp::Bang);
                }
                TokenKind::Bar
                    if matches!(self.peek(1), TokenKind::Underscore | TokenKind::Caret) =>
                {
                    self.link()?;
                    ops.push(self.eval_at()?);
                }
                _ => break,
            }
        }
        self.depth = base;
        Ok(Postfix { exp, ops })
    }

    fn eval_at(&mut self) -> PResult<PostfixOp> {
        self.expect(TokenKind::Bar)?;
        let mut sup = None;
        let mut sub = None;
        loop {
            if sup.is_none() && self.eat(TokenKind::Caret) {
                sup = Some(self.eval_at_bound()?);
            } else if sub.is_none() && self.eat(TokenKind::Underscore) {
                sub = Some(self.eval_at_bound()?);
            } else {
                break;
            }
        }
        Ok(PostfixOp::EvalAt { sup, sub })
    }

    fn eval_at_bound(&mut self) -> PResult<EvalAtBound> {
        if !self.at(TokenKind::LBrace) {
            return Ok(EvalAtBound::Atom(self.atom()?));
        }
        self.delimited(TokenKind::LBrace, TokenKind::RBrace, |g| {
            let lhs = g.expr()?;
            if g.eat(TokenKind::Equal) {
                let rhs = g.expr()?;
                Ok(EvalAtBound::Equality(Equality { lhs, rhs }))
            } else {
                Ok(EvalAtBound::Expr(lhs))
            }
        })
    }

    /// `^+`, `^-`, `^{+}` or `^{-}` closing a limit subscript
    fn at_limit_direction(&self) -> bool {
        match self.peek(1) {
            TokenKind::Add | TokenKind::Sub => true,
            TokenKind::LBrace => {
                matches!(self.peek(2), TokenKind::Add | TokenKind::Sub)
                    && self.peek(3) == TokenKind::RBrace
            }
            _ => false,
        }
    }

    fn exp(&mut self, nofunc: bool) -> PResult<Exp> {
        let base = self.depth;
        let mut exp = Exp::Comp(self.comp(nofunc)?);
        while self.at(TokenKind::Caret) && !self.at_limit_direction() {
            self.advance();
            self.link()?;
            let exponent = self.script()?;
            exp = Exp::Power {
                base: Box::new(exp),
                exponent,
            };
        }
        self.depth = base;
        Ok(exp)
    }

    fn script(&mut self) -> PResult<Script> {
        if self.at(TokenKind::LBrace) {
            Ok(Script::Expr(Box::new(self.braced_expr()?)))
        } else {
            Ok(Script::Atom(Box::new(self.atom()?)))
        }
    }

    /// Optional `_` and `^` scripts in either order
    fn scripts(&mut self) -> PResult<(Option<Script>, Option<Script>)> {
        let mut sub = None;
        let mut sup = None;
        loop {
            if sub.is_none() && self.eat(TokenKind::Underscore) {
                sub = Some(self.script()?);
            } else if sup.is_none() && self.at(TokenKind::Caret) && !self.at_limit_direction() {
                self.advance();
                sup = Some(self.script()?);
            } else {
                break;
            }
        }
        Ok((sub, sup))
    }

    // ===== Components =====

    fn comp(&mut self, nofunc: bool) -> PResult<Comp> {
        let group = |g: &mut Self, delim, open, close| {
            let expr = g.delimited(open, close, |g| g.expr())?;
            Ok(Comp::Group {
                delim,
                expr: Box::new(expr),
            })
        };
        match self.current().kind {
            TokenKind::LParen => group(self, Delimiter::Paren, TokenKind::LParen, TokenKind::RParen),
            TokenKind::LBracket => group(
                self,
                Delimiter::Bracket,
                TokenKind::LBracket,
                TokenKind::RBracket,
            ),
            TokenKind::LBrace => group(self, Delimiter::Brace, TokenKind::LBrace, TokenKind::RBrace),
            TokenKind::LBraceLiteral => group(
                self,
                Delimiter::BraceLiteral,
                TokenKind::LBraceLiteral,
                TokenKind::RBraceLiteral,
            ),
            TokenKind::Bar => self.abs_or_ket(),
            TokenKind::CmdFrac => {
                self.advance();
                let upper = self.braced_expr()?;
                let lower = self.braced_expr()?;
                Ok(Comp::Frac {
                    upper: Box::new(upper),
                    lower: Box::new(lower),
                })
            }
            TokenKind::CmdBinom => {
                self.advance();
                let n = self.braced_expr()?;
                let k = self.braced_expr()?;
                Ok(Comp::Binom {
                    n: Box::new(n),
                    k: Box::new(k),
                })
            }
            TokenKind::LFloor => {
                let inner = self.delimited(TokenKind::LFloor, TokenKind::RFloor, |g| g.expr())?;
                Ok(Comp::Floor(Box::new(inner)))
            }
            TokenKind::LCeil => {
                let inner = self.delimited(TokenKind::LCeil, TokenKind::RCeil, |g| g.expr())?;
                Ok(Comp::Ceil(Box::new(inner)))
            }
            TokenKind::FuncNormal
            | TokenKind::FuncInt
            | TokenKind::FuncSum
            | TokenKind::FuncProd
            | TokenKind::FuncLim
            | TokenKind::FuncSqrt
                if !nofunc =>
            {
                Ok(Comp::Func(Box::new(self.func()?)))
            }
            TokenKind::Letter | TokenKind::Symbol if !nofunc => {
                match self.attempt(|g| g.user_func_head())? {
                    Some((name, sub)) => {
                        let args = self.delimited(TokenKind::LParen, TokenKind::RParen, |g| {
                            g.arg_list()
                        })?;
                        Ok(Comp::Func(Box::new(Func::User { name, sub, args })))
                    }
                    None => Ok(Comp::Atom(self.atom()?)),
                }
            }
            _ => Ok(Comp::Atom(self.atom()?)),
        }
    }

    fn abs_or_ket(&mut self) -> PResult<Comp> {
        self.expect(TokenKind::Bar)?;
        let inner = self.isolated(|g| g.expr())?;
        if self.eat(TokenKind::RAngle) {
            return Ok(Comp::Atom(Atom::Ket(Box::new(inner))));
        }
        self.expect(TokenKind::Bar)?;
        Ok(Comp::Abs(Box::new(inner)))
    }

    // ===== Named constructs =====

    /// `name _sub? (` without consuming the parenthesis
    fn user_func_head(&mut self) -> PResult<(String, Option<Script>)> {
        let token = self.advance();
        let name = match token.kind {
            TokenKind::Symbol => token.text.trim_start_matches('\\').to_string(),
            _ => token.text.to_string(),
        };
        let sub = if self.eat(TokenKind::Underscore) {
            Some(self.script()?)
        } else {
            None
        };
        if !self.at(TokenKind::LParen) {
            return self.mismatched(&[TokenKind::LParen]);
        }
        Ok((name, sub))
    }

    fn func(&mut self) -> PResult<Func> {
        let token = self.advance();
        match token.kind {
            TokenKind::FuncNormal => {
                let name = token.text.trim_start_matches('\\').to_string();
                let (sub, sup) = self.scripts()?;
                let args = if self.at(TokenKind::LParen) {
                    FuncArgs::Paren(self.delimited(TokenKind::LParen, TokenKind::RParen, |g| {
                        g.arg_list()
                    })?)
                } else {
                    FuncArgs::Bare(Box::new(self.mp(true)?))
                };
                Ok(Func::Normal {
                    name,
                    sub,
                    sup,
                    args,
                })
            }
            TokenKind::FuncInt => self.integral(),
            TokenKind::FuncSqrt => {
                let root = if self.at(TokenKind::LBracket) {
                    let root = self.delimited(TokenKind::LBracket, TokenKind::RBracket, |g| g.expr())?;
                    Some(Box::new(root))
                } else {
                    None
                };
                let base = self.braced_expr()?;
                Ok(Func::Sqrt {
                    root,
                    base: Box::new(base),
                })
            }
            TokenKind::FuncSum => self.big_op(BigOp::Sum),
            TokenKind::FuncProd => self.big_op(BigOp::Prod),
            TokenKind::FuncLim => self.limit(),
            _ => self.no_viable(),
        }
    }

    fn integral(&mut self) -> PResult<Func> {
        let bounds = if self.eat(TokenKind::Underscore) {
            let lower = self.script()?;
            self.expect(TokenKind::Caret)?;
            Some((lower, self.script()?))
        } else if self.eat(TokenKind::Caret) {
            let upper = self.script()?;
            self.expect(TokenKind::Underscore)?;
            Some((self.script()?, upper))
        } else {
            None
        };

        if self.at(TokenKind::Differential) {
            let differential = self.advance().text.to_string();
            return Ok(Func::Integral {
                bounds,
                integrand: None,
                differential: Some(differential),
            });
        }

        let saved = std::mem::replace(&mut self.stop_at_differential, true);
        let integrand = self.expr();
        self.stop_at_differential = saved;
        let integrand = integrand?;

        let differential = if self.at(TokenKind::Differential) {
            Some(self.advance().text.to_string())
        } else {
            None
        };
        Ok(Func::Integral {
            bounds,
            integrand: Some(Box::new(integrand)),
            differential,
        })
    }

    fn sub_equality(&mut self) -> PResult<Equality> {
        self.expect(TokenKind::Underscore)?;
        self.delimited(TokenKind::LBrace, TokenKind::RBrace, |g| g.equality())
    }

    fn big_op(&mut self, op: BigOp) -> PResult<Func> {
        let (sub, sup) = if self.at(TokenKind::Underscore) {
            let sub = self.sub_equality()?;
            self.expect(TokenKind::Caret)?;
            (sub, self.script()?)
        } else {
            self.expect(TokenKind::Caret)?;
            let sup = self.script()?;
            (self.sub_equality()?, sup)
        };
        let body = self.mp(false)?;
        Ok(Func::BigOp {
            op,
            sub,
            sup,
            body: Box::new(body),
        })
    }

    fn limit(&mut self) -> PResult<Func> {
        self.expect(TokenKind::Underscore)?;
        let (var, approach, direction) =
            self.delimited(TokenKind::LBrace, TokenKind::RBrace, |g| {
                let var = match g.current().kind {
                    TokenKind::Letter => Some(g.advance().text.to_string()),
                    TokenKind::Symbol => {
                        Some(g.advance().text.trim_start_matches('\\').to_string())
                    }
                    _ => None,
                };
                g.expect(TokenKind::LimApproach)?;
                let approach = g.expr()?;
                let direction = if g.eat(TokenKind::Caret) {
                    let braced = g.eat(TokenKind::LBrace);
                    let direction = match g.current().kind {
                        TokenKind::Add => AddOp::Add,
                        TokenKind::Sub => AddOp::Sub,
                        _ => return g.mismatched(&[TokenKind::Add, TokenKind::Sub]),
                    };
                    g.advance();
                    if braced {
                        g.expect(TokenKind::RBrace)?;
                    }
                    Some(direction)
                } else {
                    None
                };
                Ok((var, approach, direction))
            })?;
        let body = self.mp(false)?;
        Ok(Func::Limit {
            var,
            approach: Box::new(approach),
            direction,
            body: Box::new(body),
        })
    }

    // ===== Atoms =====

    fn atom(&mut self) -> PResult<Atom> {
        self.nested(|g| match g.current().kind {
            TokenKind::Letter | TokenKind::Symbol => g.named_atom(),
            TokenKind::Number => g.number_atom(),
            TokenKind::Differential => Ok(Atom::Differential(g.advance().text.to_string())),
            TokenKind::CmdMathit => g.mathit(),
            TokenKind::CmdDot | TokenKind::CmdDdot => {
                let order = if g.advance().is(TokenKind::CmdDot) { 1 } else { 2 };
                let target = g.script()?;
                Ok(Atom::Dot { order, target })
            }
            TokenKind::Begin => g.grid(),
            TokenKind::LAngle => {
                g.advance();
                let inner = g.isolated(|g| g.expr())?;
                g.expect(TokenKind::Bar)?;
                Ok(Atom::Bra(Box::new(inner)))
            }
            TokenKind::Bar => {
                g.advance();
                let inner = g.isolated(|g| g.expr())?;
                g.expect(TokenKind::RAngle)?;
                Ok(Atom::Ket(Box::new(inner)))
            }
            _ => g.no_viable(),
        })
    }

    fn prime_argument(&mut self) -> PResult<Option<Box<Additive>>> {
        if self.at(TokenKind::LParen) {
            Ok(Some(Box::new(self.paren_expr()?)))
        } else {
            Ok(None)
        }
    }

    /// `f^{(n)}(x)`; without the argument this is an ordinary power
    fn prime_order(&mut self, name: String, start: usize) -> PResult<Atom> {
        self.expect(TokenKind::Caret)?;
        let order = self.delimited(TokenKind::LBrace, TokenKind::RBrace, |g| g.paren_expr())?;
        let text = self.text_since(start);
        if !self.at(TokenKind::LParen) {
            return self.mismatched(&[TokenKind::LParen]);
        }
        let arg = self.paren_expr()?;
        Ok(Atom::Prime {
            name,
            marks: PrimeMarks::Order(Box::new(order)),
            arg: Some(Box::new(arg)),
            text,
        })
    }

    fn named_atom(&mut self) -> PResult<Atom> {
        let start = self.pos;
        let token = self.advance();
        let is_symbol = token.is(TokenKind::Symbol);
        let name = token.text.trim_start_matches('\\').to_string();

        if self.at(TokenKind::Prime) {
            let mut count = 0;
            while self.eat(TokenKind::Prime) {
                count += 1;
            }
            let text = self.text_since(start);
            let arg = self.prime_argument()?;
            return Ok(Atom::Prime {
                name,
                marks: PrimeMarks::Count(count),
                arg,
                text,
            });
        }

        if self.at(TokenKind::Caret) {
            let braced_prime =
                self.peek(1) == TokenKind::LBrace && self.peek(2) == TokenKind::CmdPrime;
            if braced_prime || self.peek(1) == TokenKind::CmdPrime {
                self.advance();
                let count = if self.eat(TokenKind::LBrace) {
                    let mut count = 0;
                    while self.eat(TokenKind::CmdPrime) {
                        count += 1;
                    }
                    self.expect(TokenKind::RBrace)?;
                    count
                } else {
                    self.advance();
                    1
                };
                let text = self.text_since(start);
                let arg = self.prime_argument()?;
                return Ok(Atom::Prime {
                    name,
                    marks: PrimeMarks::Count(count),
                    arg,
                    text,
                });
            }
            if self.peek(1) == TokenKind::LBrace
                && self.peek(2) == TokenKind::LParen
                && let Some(atom) = self.attempt(|g| g.prime_order(name.clone(), start))?
            {
                return Ok(atom);
            }
        }

        let sub = if self.eat(TokenKind::Underscore) {
            Some(self.script()?)
        } else {
            None
        };
        if is_symbol {
            Ok(Atom::Symbol { name, sub })
        } else {
            Ok(Atom::Letter { name, sub })
        }
    }

    fn number_atom(&mut self) -> PResult<Atom> {
        let text = self.advance().text.to_string();
        if self.eat(TokenKind::Degree) {
            return Ok(Atom::AngularUnit(text));
        }
        if self.at(TokenKind::Caret) {
            if self.peek(1) == TokenKind::CmdCirc {
                self.advance();
                self.advance();
                return Ok(Atom::AngularUnit(text));
            }
            if self.peek(1) == TokenKind::LBrace
                && self.peek(2) == TokenKind::CmdCirc
                && self.peek(3) == TokenKind::RBrace
            {
                for _ in 0..4 {
                    self.advance();
                }
                return Ok(Atom::AngularUnit(text));
            }
        }
        Ok(Atom::Number(text))
    }

    fn mathit(&mut self) -> PResult<Atom> {
        self.expect(TokenKind::CmdMathit)?;
        let text = self.delimited(TokenKind::LBrace, TokenKind::RBrace, |g| {
            let mut text = String::new();
            while matches!(
                g.current().kind,
                TokenKind::Letter | TokenKind::Differential | TokenKind::Number
            ) {
                text.extend(g.advance().text.chars().filter(|c| !c.is_whitespace()));
            }
            if text.is_empty() {
                return g.mismatched(&[TokenKind::Letter]);
            }
            Ok(text)
        })?;
        Ok(Atom::Mathit(text))
    }

    fn grid(&mut self) -> PResult<Atom> {
        let begin = self.current();
        let kind = match begin.text {
            "array" => GridKind::Array,
            "matrix" | "pmatrix" | "bmatrix" | "Bmatrix" | "Vmatrix" | "smallmatrix" => {
                GridKind::Matrix
            }
            "vmatrix" => GridKind::Determinant,
            _ => return self.fail(SyntaxFailure::NoViableAlternative),
        };
        self.advance();

        let rows = self.isolated(|g| {
            let mut rows = Vec::new();
            loop {
                let mut row = vec![g.relation()?];
                while g.eat(TokenKind::Ampersand) {
                    row.push(g.relation()?);
                }
                rows.push(row);
                // A trailing `\\` before `\end` is allowed
                if !g.eat(TokenKind::RowSep) || g.at(TokenKind::End) {
                    break;
                }
            }
            Ok(rows)
        })?;

        let end = self.current();
        if end.is(TokenKind::End) && end.text == begin.text {
            self.advance();
            return Ok(Atom::Grid { kind, rows });
        }
        if end.is(TokenKind::Eof) {
            return self.fail(SyntaxFailure::MissingToken {
                message: format!("missing '\\end{{{}}}' at '<EOF>'", begin.text),
            });
        }
        self.mismatched(&[TokenKind::End])
    }
}

/// Parse a whole token stream as `math: relation EOF`
pub(crate) fn parse_math(
    tokens: &[Token<'_>],
    source: &str,
    max_depth: usize,
) -> Result<Relation, ParseFailure> {
    let mut grammar = Grammar {
        tokens,
        source,
        pos: 0,
        depth: 0,
        max_depth,
        stop_at_differential: false,
    };
    let relation = grammar.relation()?;
    if !grammar.at(TokenKind::Eof) {
        return grammar.mismatched(&[TokenKind::Eof]);
    }
    Ok(relation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::parser::diagnostics::ErrorListener;
    use crate::parser::lexer;

    fn parse(source: &str) -> Result<Relation, ParseFailure> {
        let tokens = lexer::tokenize(&ErrorListener::new(source)).unwrap();
        parse_math(&tokens, source, 100)
    }

    fn single_expr(source: &str) -> Additive {
        match parse(source).unwrap() {
            Relation::Expr(expr) => expr,
            other => panic!("expected a plain expression, got {:?}", other),
        }
    }

    #[test]
    fn test_additive_is_left_associative() {
        let expr = single_expr("a-b+c");
        let Additive::Binary { lhs, op, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, AddOp::Add);
        assert!(matches!(*lhs, Additive::Binary { op: AddOp::Sub, .. }));
    }

    #[test]
    fn test_juxtaposition_builds_postfix_list() {
        let expr = single_expr("2xy");
        assert_eq!(expr.as_postfix_list().unwrap().len(), 3);
    }

    #[test]
    fn test_relation_chain() {
        let rel = parse("a < b \\leq c").unwrap();
        let Relation::Compare { lhs, op, .. } = rel else {
            panic!("expected comparison");
        };
        assert_eq!(op, RelOp::Le);
        assert!(matches!(*lhs, Relation::Compare { op: RelOp::Lt, .. }));
    }

    #[test]
    fn test_bare_function_argument_stops_at_next_function() {
        // \sin x \cos y is sin(x) * cos(y)
        let expr = single_expr("\\sin x \\cos y");
        assert_eq!(expr.as_postfix_list().unwrap().len(), 2);
    }

    #[test]
    fn test_integral_stops_at_differential() {
        let expr = single_expr("\\int_0^1 x^2 dx + 1");
        let Additive::Binary { lhs, .. } = expr else {
            panic!("expected sum");
        };
        let items = lhs.as_postfix_list().unwrap();
        let Exp::Comp(Comp::Func(func)) = &items[0].exp else {
            panic!("expected integral");
        };
        let Func::Integral { differential, .. } = func.as_ref() else {
            panic!("expected integral");
        };
        assert_eq!(differential.as_deref(), Some("dx"));
    }

    #[test]
    fn test_abs_and_ket() {
        assert!(matches!(
            single_expr("|x|").as_postfix_list().unwrap()[0].exp,
            Exp::Comp(Comp::Abs(_))
        ));
        assert!(matches!(
            single_expr("|\\psi\\rangle").as_single_atom(),
            Some(Atom::Ket(_))
        ));
        assert!(matches!(
            single_expr("\\langle\\phi|").as_single_atom(),
            Some(Atom::Bra(_))
        ));
        // Two adjacent absolute values
        assert_eq!(single_expr("|x||y|").as_postfix_list().unwrap().len(), 2);
    }

    #[test]
    fn test_prime_forms() {
        for source in ["f'(x)", "f''", "f^{\\prime\\prime}(x)", "f^{(3)}(x)"] {
            assert!(
                matches!(single_expr(source).as_single_atom(), Some(Atom::Prime { .. })),
                "{source}"
            );
        }
        // Without an argument `x^{(2)}` is a power
        assert!(matches!(
            single_expr("x^{(2)}").as_postfix_list().unwrap()[0].exp,
            Exp::Power { .. }
        ));
    }

    #[test]
    fn test_limit_direction_is_not_a_power() {
        let expr = single_expr("\\lim_{x \\to 0^-} f");
        let items = expr.as_postfix_list().unwrap();
        let Exp::Comp(Comp::Func(func)) = &items[0].exp else {
            panic!("expected limit");
        };
        assert!(matches!(
            func.as_ref(),
            Func::Limit {
                direction: Some(AddOp::Sub),
                ..
            }
        ));
    }

    #[test]
    fn test_grid_rows() {
        let expr = single_expr("\\begin{pmatrix}1&0\\\\0&1\\\\\\end{pmatrix}");
        let Some(Atom::Grid { kind, rows }) = expr.as_single_atom() else {
            panic!("expected grid");
        };
        assert_eq!(*kind, GridKind::Matrix);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 2);
    }

    #[test]
    fn test_failures() {
        assert!(matches!(
            parse("\\frac{1}{2"),
            Err(ParseFailure::Syntax {
                failure: SyntaxFailure::MissingToken { .. },
                offset: 10
            })
        ));
        assert!(matches!(
            parse("x}"),
            Err(ParseFailure::Syntax {
                failure: SyntaxFailure::MismatchedInput { .. },
                offset: 1
            })
        ));
        assert!(matches!(
            parse("\\begin{pmatrix}1\\end{bmatrix}"),
            Err(ParseFailure::Syntax { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let source = format!("{}x{}", "(".repeat(150), ")".repeat(150));
        let tokens = lexer::tokenize(&ErrorListener::new(&source)).unwrap();
        assert_eq!(
            parse_math(&tokens, &source, 100),
            Err(ParseFailure::TooDeep)
        );
    }
}
