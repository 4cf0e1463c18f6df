//! Builder pattern API for configuring a conversion
//!
//! Provides a fluent interface over the knobs that change how LaTeX is read.
//!
//! # Example
//! ```
//! use symb_latex::Latex;
//!
//! let expr = Latex::new()
//!     .solve_assignments(false)
//!     .parse("x = 5")
//!     .unwrap();
//! assert_eq!(expr.to_string(), "x = 5");
//! ```

use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr, LatexError, parser};

/// Builder for LaTeX conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latex {
    max_depth: usize,
    max_nodes: Option<usize>,
    times_sign_heuristic: bool,
    solve_assignments: bool,
}

impl Default for Latex {
    fn default() -> Self {
        Latex {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: Some(DEFAULT_MAX_NODES),
            times_sign_heuristic: true,
            solve_assignments: true,
        }
    }
}

impl Latex {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum nesting depth accepted by the grammar.
    ///
    /// Every operand after the first in a chain (`a + b + c`, `a b c`,
    /// `n!!`, `x^2^3`) counts as one more level, since the converted tree
    /// nests one level per operator. Long flat sums need a larger limit.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set maximum node count of the produced expression
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    /// Lift the node count limit
    pub fn unlimited_nodes(mut self) -> Self {
        self.max_nodes = None;
        self
    }

    /// Read a lone `x` between two numeric terms as a times sign (`2 x 3` is `2*3`)
    pub fn times_sign_heuristic(mut self, enabled: bool) -> Self {
        self.times_sign_heuristic = enabled;
        self
    }

    /// Solve `x = 5`, `x^2 = 4` or `v = \begin{pmatrix}...\end{pmatrix}` for
    /// the unknown instead of keeping an equation
    pub fn solve_assignments(mut self, enabled: bool) -> Self {
        self.solve_assignments = enabled;
        self
    }

    pub(crate) fn depth_limit(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn uses_times_sign_heuristic(&self) -> bool {
        self.times_sign_heuristic
    }

    pub(crate) fn solves_assignments(&self) -> bool {
        self.solve_assignments
    }

    /// Convert a LaTeX string into an unevaluated expression
    ///
    /// # Errors
    /// Returns `LatexError` if:
    /// - The input is empty
    /// - The lexer or grammar rejects it (`LatexError::Syntax`)
    /// - The parse tree has no meaning (e.g. `\frac{d}{dx}` with nothing after it)
    /// - A depth or size limit is exceeded
    pub fn parse(&self, input: &str) -> Result<Expr, LatexError> {
        let expr = parser::parse(input, self)?;
        if let Some(max_n) = self.max_nodes
            && expr.node_count() > max_n
        {
            return Err(LatexError::MaxNodesExceeded);
        }
        Ok(expr)
    }

    /// Parse and render the result as text
    pub fn parse_to_string(&self, input: &str) -> Result<String, LatexError> {
        Ok(self.parse(input)?.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let latex = Latex::new();
        assert_eq!(latex.depth_limit(), DEFAULT_MAX_DEPTH);
        assert!(latex.uses_times_sign_heuristic());
        assert!(latex.solves_assignments());
    }

    #[test]
    fn test_assignment_toggle() {
        assert_eq!(Latex::new().parse_to_string("x = 5").unwrap(), "5");
        assert_eq!(
            Latex::new()
                .solve_assignments(false)
                .parse_to_string("x = 5")
                .unwrap(),
            "x = 5"
        );
    }

    #[test]
    fn test_times_sign_toggle() {
        assert_eq!(Latex::new().parse_to_string("2 x 3").unwrap(), "2*3");
        assert_eq!(
            Latex::new()
                .times_sign_heuristic(false)
                .parse_to_string("2 x 3")
                .unwrap(),
            "2*x*3"
        );
    }

    #[test]
    fn test_limits() {
        assert_eq!(
            Latex::new().max_nodes(3).parse("a+b+c"),
            Err(LatexError::MaxNodesExceeded)
        );
        assert!(Latex::new().unlimited_nodes().parse("a+b+c").is_ok());
        assert_eq!(
            Latex::new().max_depth(3).parse("((((x))))"),
            Err(LatexError::MaxDepthExceeded)
        );
    }
}
