use std::fmt;

pub use crate::parser::diagnostics::Diagnostic;

/// Source location span for error reporting
/// Represents a range of bytes in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Slice the spanned text out of `source`, if the span lies on char boundaries
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

/// Errors that can occur while converting LaTeX into an expression
#[derive(Debug, Clone, PartialEq)]
pub enum LatexError {
    // Input validation errors
    EmptyInput,
    /// Lexer or grammar rejected the input; carries the rendered report
    Syntax(Diagnostic),
    InvalidNumber {
        value: String,
        span: Option<Span>,
    },

    // Semantic errors raised while building the expression
    CannotApplyPostfix,
    CannotRaiseDerivative,
    MissingDerivativeTarget,
    IndexOutOfBounds,
    InvalidBinder {
        construct: &'static str,
        reason: String,
    },
    ArityMismatch {
        function: String,
        expected: &'static str,
        found: usize,
    },
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    NonSquareMatrix {
        rows: usize,
        cols: usize,
    },

    // Safety limits
    MaxDepthExceeded,
    MaxNodesExceeded,
}

impl LatexError {
    /// Create InvalidNumber without span
    pub fn invalid_number(value: impl Into<String>) -> Self {
        LatexError::InvalidNumber {
            value: value.into(),
            span: None,
        }
    }

    /// Create InvalidBinder for a big operator, integral or limit
    pub fn invalid_binder(construct: &'static str, reason: impl Into<String>) -> Self {
        LatexError::InvalidBinder {
            construct,
            reason: reason.into(),
        }
    }

    /// The diagnostic attached to a syntax failure, if any
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            LatexError::Syntax(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

impl fmt::Display for LatexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatexError::EmptyInput => write!(f, "Input cannot be empty"),
            LatexError::Syntax(diagnostic) => write!(f, "{}", diagnostic),
            LatexError::InvalidNumber { value, span } => {
                write!(f, "Invalid number format: '{}'", value)?;
                if let Some(span) = span.filter(Span::is_valid) {
                    write!(f, " at positions {}-{}", span.start + 1, span.end)?;
                }
                Ok(())
            }
            LatexError::CannotApplyPostfix => write!(f, "Cannot apply postfix to derivative"),
            LatexError::CannotRaiseDerivative => write!(f, "Cannot raise derivative to power"),
            LatexError::MissingDerivativeTarget => {
                write!(f, "Expected expression for derivative")
            }
            LatexError::IndexOutOfBounds => write!(f, "Index out of bounds"),
            LatexError::InvalidBinder { construct, reason } => {
                write!(f, "Invalid {}: {}", construct, reason)
            }
            LatexError::ArityMismatch {
                function,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Function '{}' expects {} argument(s), got {}",
                    function, expected, found
                )
            }
            LatexError::RaggedMatrix {
                row,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Matrix row {} has {} entries, expected {}",
                    row + 1,
                    found,
                    expected
                )
            }
            LatexError::NonSquareMatrix { rows, cols } => {
                write!(f, "Determinant of a non-square {}x{} matrix", rows, cols)
            }
            LatexError::MaxDepthExceeded => {
                write!(f, "Expression nesting depth exceeds maximum limit")
            }
            LatexError::MaxNodesExceeded => {
                write!(f, "Expression size exceeds maximum node count")
            }
        }
    }
}

impl std::error::Error for LatexError {}
