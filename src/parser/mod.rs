//! Parser module - converts LaTeX strings to expressions
//!
//! Pipeline: validate -> lex -> grammar (concrete syntax tree) -> convert
//!
//! The lexer and the grammar report through one [`ErrorListener`]; the first
//! syntax failure ends the parse. Conversion errors are semantic and carry no
//! source position.

pub(crate) mod cst;
pub(crate) mod diagnostics;
pub(crate) mod grammar;
pub(crate) mod lexer;
pub(crate) mod tokens;

use crate::builder::Latex;
use crate::convert::Converter;
use crate::{Expr, LatexError};
use diagnostics::ErrorListener;
use grammar::ParseFailure;

/// Run the whole pipeline on `input` with the settings in `config`
pub(crate) fn parse(input: &str, config: &Latex) -> Result<Expr, LatexError> {
    // Step 1: Validate input
    if input.trim().is_empty() {
        return Err(LatexError::EmptyInput);
    }

    // Step 2: Lexing
    let listener = ErrorListener::new(input);
    let tokens = lexer::tokenize(&listener)?;
    log::debug!("lexed {} tokens from {:?}", tokens.len(), input);

    // Step 3: Grammar
    let root = grammar::parse_math(&tokens, input, config.depth_limit()).map_err(|failure| {
        match failure {
            ParseFailure::Syntax { failure, offset } => listener.syntax_error(failure, offset),
            ParseFailure::TooDeep => LatexError::MaxDepthExceeded,
        }
    })?;

    // Step 4: Conversion
    let expr = Converter::new(config).math(&root)?;
    log::debug!("converted {:?} to {}", input, expr);
    Ok(expr)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("", &Latex::new()), Err(LatexError::EmptyInput));
        assert_eq!(parse("  \n", &Latex::new()), Err(LatexError::EmptyInput));
    }

    #[test]
    fn test_lexer_failure_is_positioned() {
        let err = parse("x + ?", &Latex::new()).unwrap_err();
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.message, "I don't understand what's here");
        assert_eq!(diagnostic.column, 4);
    }

    #[test]
    fn test_grammar_failure_is_positioned() {
        let err = parse("\\frac{1}{2", &Latex::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing '}' at '<EOF>'\n\\frac{1}{2\n~~~~~~~~~~^"
        );
    }
}
