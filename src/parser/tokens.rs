/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TokenKind {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Colon,
    CmdTimes,
    CmdCdot,
    CmdDiv,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBraceLiteral,
    RBraceLiteral,
    LBracket,
    RBracket,
    Bar,
    LAngle,
    RAngle,
    LFloor,
    RFloor,
    LCeil,
    RCeil,

    // Scripts and separators
    Underscore,
    Caret,
    Comma,
    Bang,
    Ampersand,
    RowSep,

    // Relations
    Equal,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,

    // Leaves
    Letter,
    Number,
    Differential,
    Symbol,

    // Named constructs
    FuncNormal,
    FuncInt,
    FuncSum,
    FuncProd,
    FuncLim,
    FuncSqrt,
    CmdFrac,
    CmdBinom,
    CmdMathit,
    CmdDot,
    CmdDdot,
    CmdPrime,
    Prime,
    CmdCirc,
    Degree,
    LimApproach,

    // Environments; the token text is the environment name
    Begin,
    End,

    Eof,
}

impl TokenKind {
    /// Name used when listing expected tokens in a diagnostic
    pub(crate) fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Add => "'+'",
            TokenKind::Sub => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Colon => "':'",
            TokenKind::CmdTimes => "'\\times'",
            TokenKind::CmdCdot => "'\\cdot'",
            TokenKind::CmdDiv => "'\\div'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBraceLiteral => "'\\{'",
            TokenKind::RBraceLiteral => "'\\}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Bar => "'|'",
            TokenKind::LAngle => "'\\langle'",
            TokenKind::RAngle => "'\\rangle'",
            TokenKind::LFloor => "'\\lfloor'",
            TokenKind::RFloor => "'\\rfloor'",
            TokenKind::LCeil => "'\\lceil'",
            TokenKind::RCeil => "'\\rceil'",
            TokenKind::Underscore => "'_'",
            TokenKind::Caret => "'^'",
            TokenKind::Comma => "','",
            TokenKind::Bang => "'!'",
            TokenKind::Ampersand => "'&'",
            TokenKind::RowSep => "'\\\\'",
            TokenKind::Equal => "'='",
            TokenKind::Neq => "'\\neq'",
            TokenKind::Lt => "'<'",
            TokenKind::Lte => "'\\leq'",
            TokenKind::Gt => "'>'",
            TokenKind::Gte => "'\\geq'",
            TokenKind::Letter => "LETTER",
            TokenKind::Number => "NUMBER",
            TokenKind::Differential => "DIFFERENTIAL",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::FuncNormal => "FUNC",
            TokenKind::FuncInt => "'\\int'",
            TokenKind::FuncSum => "'\\sum'",
            TokenKind::FuncProd => "'\\prod'",
            TokenKind::FuncLim => "'\\lim'",
            TokenKind::FuncSqrt => "'\\sqrt'",
            TokenKind::CmdFrac => "'\\frac'",
            TokenKind::CmdBinom => "'\\binom'",
            TokenKind::CmdMathit => "'\\mathit'",
            TokenKind::CmdDot => "'\\dot'",
            TokenKind::CmdDdot => "'\\ddot'",
            TokenKind::CmdPrime => "'\\prime'",
            TokenKind::Prime => "'''",
            TokenKind::CmdCirc => "'\\circ'",
            TokenKind::Degree => "'°'",
            TokenKind::LimApproach => "'\\to'",
            TokenKind::Begin => "'\\begin'",
            TokenKind::End => "'\\end'",
            TokenKind::Eof => "<EOF>",
        }
    }

    /// Relation operators, loosest level of the grammar
    pub(crate) fn is_relation(&self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::Neq
                | TokenKind::Lt
                | TokenKind::Lte
                | TokenKind::Gt
                | TokenKind::Gte
        )
    }

    /// Tokens that may open a postfix term when no function may start it
    pub(crate) fn starts_component_nofunc(&self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::LBraceLiteral
                | TokenKind::Bar
                | TokenKind::LAngle
                | TokenKind::LFloor
                | TokenKind::LCeil
                | TokenKind::Letter
                | TokenKind::Number
                | TokenKind::Differential
                | TokenKind::Symbol
                | TokenKind::CmdFrac
                | TokenKind::CmdBinom
                | TokenKind::CmdMathit
                | TokenKind::CmdDot
                | TokenKind::CmdDdot
                | TokenKind::Begin
        )
    }

    /// Tokens that may open a postfix term
    pub(crate) fn starts_component(&self) -> bool {
        self.starts_component_nofunc()
            || matches!(
                self,
                TokenKind::FuncNormal
                    | TokenKind::FuncInt
                    | TokenKind::FuncSum
                    | TokenKind::FuncProd
                    | TokenKind::FuncLim
                    | TokenKind::FuncSqrt
            )
    }
}

/// Everything that may start a component, in diagnostic order
pub(crate) const COMPONENT_START: [TokenKind; 24] = [
    TokenKind::Add,
    TokenKind::Sub,
    TokenKind::LParen,
    TokenKind::LBracket,
    TokenKind::LBrace,
    TokenKind::LBraceLiteral,
    TokenKind::Bar,
    TokenKind::LAngle,
    TokenKind::LFloor,
    TokenKind::LCeil,
    TokenKind::Letter,
    TokenKind::Number,
    TokenKind::Differential,
    TokenKind::Symbol,
    TokenKind::CmdFrac,
    TokenKind::CmdBinom,
    TokenKind::CmdMathit,
    TokenKind::CmdDot,
    TokenKind::CmdDdot,
    TokenKind::Begin,
    TokenKind::FuncNormal,
    TokenKind::FuncInt,
    TokenKind::FuncSum,
    TokenKind::FuncSqrt,
];

/// A lexed token borrowing its text from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'s> {
    pub kind: TokenKind,
    pub text: &'s str,
    /// Byte offset of the token start in the source
    pub offset: usize,
    /// Byte offset one past the token end
    pub end: usize,
}

impl<'s> Token<'s> {
    pub(crate) fn new(kind: TokenKind, text: &'s str, offset: usize, end: usize) -> Self {
        Token {
            kind,
            text,
            offset,
            end,
        }
    }

    pub(crate) fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
