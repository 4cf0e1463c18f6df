//! Syntax error reporting
//!
//! One listener per parse attempt, shared by the lexer and the grammar. The
//! first failure it receives becomes the terminal `LatexError::Syntax`; there
//! is no recovery and no accumulation.

use crate::error::{LatexError, Span};
use std::fmt;

/// More expected tokens than this and the list is not worth printing
const MAX_LISTED_EXPECTED: usize = 10;

/// The four shapes of syntax failure the lexer and grammar can raise
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SyntaxFailure {
    /// A closing token is absent; the message names it, e.g. `missing '}' at '<EOF>'`
    MissingToken { message: String },
    /// No grammar alternative can start here
    NoViableAlternative,
    /// A specific token was required and something else was found
    MismatchedInput { expected: Vec<&'static str> },
    /// The lexer could not classify the input
    Unrecognized,
}

impl SyntaxFailure {
    fn message(&self) -> String {
        match self {
            SyntaxFailure::MissingToken { message } => message.clone(),
            SyntaxFailure::NoViableAlternative => "I expected something else here".to_string(),
            SyntaxFailure::MismatchedInput { expected } if expected.len() < MAX_LISTED_EXPECTED => {
                format!("I expected one of these: {} here", expected.join(" "))
            }
            SyntaxFailure::MismatchedInput { .. } => "I expected something else here".to_string(),
            SyntaxFailure::Unrecognized => "I don't understand what's here".to_string(),
        }
    }
}

/// A rendered syntax error: message, offending source line and a marker line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub source: String,
    /// Zero-based character column within the failing line
    pub column: usize,
    pub span: Span,
}

impl Diagnostic {
    /// `~` repeated up to the column, then `^`
    pub fn marker(&self) -> String {
        let mut marker = "~".repeat(self.column);
        marker.push('^');
        marker
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.message, self.source, self.marker())
    }
}

/// Error hook attached to the lexer and the grammar
#[derive(Debug, Clone, Copy)]
pub(crate) struct ErrorListener<'s> {
    source: &'s str,
}

impl<'s> ErrorListener<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        ErrorListener { source }
    }

    pub(crate) fn source(&self) -> &'s str {
        self.source
    }

    /// Turn a failure at byte `offset` into the terminal syntax error
    pub(crate) fn syntax_error(&self, failure: SyntaxFailure, offset: usize) -> LatexError {
        let offset = offset.min(self.source.len());
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let column = self.source[line_start..offset].chars().count();
        log::debug!("syntax error at byte {}: {:?}", offset, failure);
        LatexError::Syntax(Diagnostic {
            message: failure.message(),
            source: self.source.to_string(),
            column,
            span: Span::at(offset),
        })
    }
}
