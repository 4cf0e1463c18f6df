//! LaTeX lexer
//!
//! Produces a flat token vector terminated by `Eof`. Spacing commands,
//! `\left`/`\right` and the `\big` family are dropped here so the grammar
//! never sees them.

use super::diagnostics::{ErrorListener, SyntaxFailure};
use super::tokens::{Token, TokenKind};
use crate::error::LatexError;
use crate::functions::families;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::LazyLock;

/// Backslash commands with a fixed token kind
static COMMANDS: LazyLock<FxHashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    use TokenKind::*;
    [
        ("times", CmdTimes),
        ("cdot", CmdCdot),
        ("div", CmdDiv),
        ("frac", CmdFrac),
        ("dfrac", CmdFrac),
        ("tfrac", CmdFrac),
        ("binom", CmdBinom),
        ("dbinom", CmdBinom),
        ("tbinom", CmdBinom),
        ("mathit", CmdMathit),
        ("dot", CmdDot),
        ("ddot", CmdDdot),
        ("prime", CmdPrime),
        ("circ", CmdCirc),
        ("int", FuncInt),
        ("sum", FuncSum),
        ("prod", FuncProd),
        ("lim", FuncLim),
        ("sqrt", FuncSqrt),
        ("to", LimApproach),
        ("rightarrow", LimApproach),
        ("Rightarrow", LimApproach),
        ("longrightarrow", LimApproach),
        ("Longrightarrow", LimApproach),
        ("neq", Neq),
        ("ne", Neq),
        ("lt", Lt),
        ("leq", Lte),
        ("le", Lte),
        ("leqslant", Lte),
        ("gt", Gt),
        ("geq", Gte),
        ("ge", Gte),
        ("geqslant", Gte),
        ("lfloor", LFloor),
        ("rfloor", RFloor),
        ("lceil", LCeil),
        ("rceil", RCeil),
        ("langle", LAngle),
        ("rangle", RAngle),
        ("vert", Bar),
        ("mid", Bar),
        ("lvert", Bar),
        ("rvert", Bar),
    ]
    .into_iter()
    .collect()
});

/// Layout commands with no mathematical content
static SKIPPED_COMMANDS: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        "left",
        "right",
        "big",
        "Big",
        "bigg",
        "Bigg",
        "bigl",
        "bigr",
        "Bigl",
        "Bigr",
        "biggl",
        "biggr",
        "Biggl",
        "Biggr",
        "quad",
        "qquad",
        "thinspace",
        "medspace",
        "thickspace",
        "negthinspace",
        "negmedspace",
        "negthickspace",
    ]
    .into_iter()
    .collect()
});

/// True when `\name` lexes as a plain SYMBOL
pub(crate) fn is_plain_symbol_command(name: &str) -> bool {
    !name.is_empty()
        && !COMMANDS.contains_key(name)
        && !SKIPPED_COMMANDS.contains(name)
        && !families::is_function_command(name)
        && !matches!(name, "begin" | "end" | "partial")
}

fn command_name_len(rest: &str) -> usize {
    rest.bytes().take_while(u8::is_ascii_alphabetic).count()
}

/// Skip an optional `^c` or `^{...}` order annotation starting at `i`
fn skip_order(source: &str, i: usize) -> usize {
    let bytes = source.as_bytes();
    if bytes.get(i) != Some(&b'^') {
        return i;
    }
    match bytes.get(i + 1) {
        Some(b'{') => match matching_brace(source, i + 1) {
            Some(close) => close + 1,
            None => i,
        },
        Some(c) if c.is_ascii_alphanumeric() => i + 2,
        _ => i,
    }
}

/// Byte index of the `}` closing the `{` at `open`
pub(crate) fn matching_brace(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in source.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// End of a differential starting at `start` whose marker is `marker_len` bytes.
///
/// Shape: marker, optional `^order`, optional whitespace, a variable (a
/// letter or a plain `\command`), optional `^order`.
pub(crate) fn scan_differential(source: &str, start: usize, marker_len: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = skip_order(source, start + marker_len);
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    match bytes.get(i) {
        Some(c) if c.is_ascii_alphabetic() => i += 1,
        Some(b'\\') => {
            let len = command_name_len(&source[i + 1..]);
            if !is_plain_symbol_command(&source[i + 1..i + 1 + len]) {
                return None;
            }
            i += 1 + len;
        }
        _ => return None,
    }
    Some(skip_order(source, i))
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    tokens: Vec<Token<'s>>,
}

impl<'s> Lexer<'s> {
    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, end: usize) {
        let text = &self.source[self.pos..end];
        self.tokens.push(Token::new(kind, text, self.pos, end));
        self.pos = end;
    }

    fn number_end(&self) -> usize {
        let bytes = self.source.as_bytes();
        let digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);
        let mut i = self.pos;
        while digit_at(i) {
            i += 1;
        }
        // Thousands groups: exactly three digits after each comma
        if i > self.pos {
            while bytes.get(i) == Some(&b',')
                && digit_at(i + 1)
                && digit_at(i + 2)
                && digit_at(i + 3)
                && !digit_at(i + 4)
            {
                i += 4;
            }
        }
        if bytes.get(i) == Some(&b'.') && digit_at(i + 1) {
            i += 1;
            while digit_at(i) {
                i += 1;
            }
        }
        i
    }

    /// `\begin{name}` or `\end{name}`; for arrays the column spec is consumed too
    fn environment(&mut self, kind: TokenKind, after_command: usize) -> Option<()> {
        let bytes = self.source.as_bytes();
        let mut i = after_command;
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        if bytes.get(i) != Some(&b'{') {
            return None;
        }
        let close = matching_brace(self.source, i)?;
        let name = self.source[i + 1..close].trim();
        let mut end = close + 1;
        if kind == TokenKind::Begin && name == "array" {
            let mut j = end;
            while bytes.get(j).is_some_and(u8::is_ascii_whitespace) {
                j += 1;
            }
            if bytes.get(j) == Some(&b'{') {
                end = matching_brace(self.source, j)? + 1;
            }
        }
        self.tokens.push(Token::new(kind, name, self.pos, end));
        self.pos = end;
        Some(())
    }

    fn command(&mut self) -> Option<()> {
        let after_slash = self.pos + 1;
        let len = command_name_len(&self.source[after_slash..]);
        if len == 0 {
            let c = self.source[after_slash..].chars().next()?;
            let end = after_slash + c.len_utf8();
            match c {
                '\\' => self.push(TokenKind::RowSep, end),
                '{' => self.push(TokenKind::LBraceLiteral, end),
                '}' => self.push(TokenKind::RBraceLiteral, end),
                ',' | ':' | ';' | '!' | '>' | ' ' => self.pos = end,
                _ => return None,
            }
            return Some(());
        }

        let end = after_slash + len;
        let name = &self.source[after_slash..end];
        if SKIPPED_COMMANDS.contains(name) {
            self.pos = end;
            // `\left.` and `\right.` are invisible delimiters
            if matches!(name, "left" | "right") && self.peek_byte(0) == Some(b'.') {
                self.pos += 1;
            }
            return Some(());
        }
        match name {
            "begin" => self.environment(TokenKind::Begin, end),
            "end" => self.environment(TokenKind::End, end),
            "partial" => {
                match scan_differential(self.source, self.pos, 1 + len) {
                    Some(diff_end) => self.push(TokenKind::Differential, diff_end),
                    None => self.push(TokenKind::Symbol, end),
                }
                Some(())
            }
            _ => {
                let kind = match COMMANDS.get(name) {
                    Some(kind) => *kind,
                    None if families::is_function_command(name) => TokenKind::FuncNormal,
                    None => TokenKind::Symbol,
                };
                self.push(kind, end);
                Some(())
            }
        }
    }

    fn next_token(&mut self) -> Option<()> {
        let c = self.rest().chars().next()?;
        let single = self.pos + c.len_utf8();
        let kind = match c {
            c if c.is_whitespace() => {
                self.pos = single;
                return Some(());
            }
            '\\' => return self.command(),
            'd' => {
                match scan_differential(self.source, self.pos, 1) {
                    Some(end) => self.push(TokenKind::Differential, end),
                    None => self.push(TokenKind::Letter, single),
                }
                return Some(());
            }
            c if c.is_ascii_alphabetic() => TokenKind::Letter,
            c if c.is_ascii_digit() => {
                let end = self.number_end();
                self.push(TokenKind::Number, end);
                return Some(());
            }
            '.' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => {
                let end = self.number_end();
                self.push(TokenKind::Number, end);
                return Some(());
            }
            '+' => TokenKind::Add,
            '-' => TokenKind::Sub,
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '|' => TokenKind::Bar,
            '_' => TokenKind::Underscore,
            '^' => TokenKind::Caret,
            ',' => TokenKind::Comma,
            '!' => TokenKind::Bang,
            '&' => TokenKind::Ampersand,
            '=' => TokenKind::Equal,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '\'' | '\u{2019}' => TokenKind::Prime,
            '°' => TokenKind::Degree,
            '×' => TokenKind::CmdTimes,
            '·' => TokenKind::CmdCdot,
            '÷' => TokenKind::CmdDiv,
            '≠' => TokenKind::Neq,
            '≤' => TokenKind::Lte,
            '≥' => TokenKind::Gte,
            _ => return None,
        };
        self.push(kind, single);
        Some(())
    }
}

/// Split `listener`'s source into tokens, ending with `Eof`
pub(crate) fn tokenize<'s>(listener: &ErrorListener<'s>) -> Result<Vec<Token<'s>>, LatexError> {
    let source = listener.source();
    let mut lexer = Lexer {
        source,
        pos: 0,
        tokens: Vec::with_capacity(source.len() / 2 + 1),
    };
    while lexer.pos < source.len() {
        if lexer.next_token().is_none() {
            return Err(listener.syntax_error(SyntaxFailure::Unrecognized, lexer.pos));
        }
    }
    let end = source.len();
    lexer
        .tokens
        .push(Token::new(TokenKind::Eof, "", end, end));
    Ok(lexer.tokens)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(&ErrorListener::new(source))
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(&ErrorListener::new(source))
            .unwrap()
            .into_iter()
            .map(|t| t.text.to_string())
            .collect()
    }

    #[test]
    fn test_simple_expression() {
        use TokenKind::*;
        assert_eq!(kinds("1+x"), vec![Number, Add, Letter, Eof]);
        assert_eq!(kinds("\\frac{a}{b}"), vec![CmdFrac, LBrace, Letter, RBrace, LBrace, Letter, RBrace, Eof]);
    }

    #[test]
    fn test_numbers_with_separators() {
        assert_eq!(texts("1,000,000.5"), vec!["1,000,000.5", ""]);
        // A comma not followed by exactly three digits separates arguments
        assert_eq!(texts("1,23"), vec!["1", ",", "23", ""]);
        assert_eq!(texts(".5"), vec![".5", ""]);
    }

    #[test]
    fn test_differentials() {
        use TokenKind::*;
        assert_eq!(kinds("dx"), vec![Differential, Eof]);
        assert_eq!(texts("d x"), vec!["d x", ""]);
        assert_eq!(texts("dx^2"), vec!["dx^2", ""]);
        assert_eq!(texts("d^{2}y"), vec!["d^{2}y", ""]);
        assert_eq!(texts("\\partial x"), vec!["\\partial x", ""]);
        assert_eq!(texts("d\\theta"), vec!["d\\theta", ""]);
        // No variable: plain letter or symbol
        assert_eq!(kinds("d"), vec![Letter, Eof]);
        assert_eq!(kinds("d^2"), vec![Letter, Caret, Number, Eof]);
        assert_eq!(kinds("\\partial"), vec![Symbol, Eof]);
        assert_eq!(kinds("d\\sin"), vec![Letter, FuncNormal, Eof]);
    }

    #[test]
    fn test_layout_commands_are_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("\\left( x \\right)"), vec![LParen, Letter, RParen, Eof]);
        assert_eq!(kinds("x\\,\\quad y"), vec![Letter, Letter, Eof]);
        assert_eq!(kinds("\\left. x \\right|"), vec![Letter, Bar, Eof]);
        assert_eq!(kinds("\\Big| x"), vec![Bar, Letter, Eof]);
    }

    #[test]
    fn test_commands() {
        use TokenKind::*;
        assert_eq!(kinds("\\sin\\alpha"), vec![FuncNormal, Symbol, Eof]);
        assert_eq!(kinds("\\leq\\ne\\geqslant"), vec![Lte, Neq, Gte, Eof]);
        assert_eq!(kinds("\\{\\}\\\\"), vec![LBraceLiteral, RBraceLiteral, RowSep, Eof]);
        assert_eq!(kinds("\\lvert\\mid"), vec![Bar, Bar, Eof]);
        assert_eq!(kinds("x'"), vec![Letter, Prime, Eof]);
        assert_eq!(kinds("90°"), vec![Number, Degree, Eof]);
    }

    #[test]
    fn test_environments() {
        let tokens = tokenize(&ErrorListener::new("\\begin{array}{cc}1\\end{array}")).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Begin);
        assert_eq!(tokens[0].text, "array");
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[2].kind, TokenKind::End);
        assert_eq!(tokens[2].text, "array");
    }

    #[test]
    fn test_unrecognized_character() {
        let err = tokenize(&ErrorListener::new("x + ?")).unwrap_err();
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.message, "I don't understand what's here");
        assert_eq!(diagnostic.column, 4);
    }
}
