//! Dense row-major matrix of expressions

use crate::Expr;
use crate::error::LatexError;
use crate::functions::{add_opt, mul_opt, neg};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    entries: Vec<Expr>,
}

impl Matrix {
    /// Build from rows; every row must have the length of the first one
    pub fn from_rows(rows: Vec<Vec<Expr>>) -> Result<Self, LatexError> {
        let cols = rows.first().map_or(0, Vec::len);
        let n_rows = rows.len();
        let mut entries = Vec::with_capacity(n_rows * cols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(LatexError::RaggedMatrix {
                    row: index,
                    expected: cols,
                    found: row.len(),
                });
            }
            entries.extend(row);
        }
        Ok(Matrix {
            rows: n_rows,
            cols,
            entries,
        })
    }

    /// Single-column matrix
    pub fn column(items: Vec<Expr>) -> Self {
        Matrix {
            rows: items.len(),
            cols: 1,
            entries: items,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        if row < self.rows && col < self.cols {
            self.entries.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Entries in row-major order
    pub fn entries(&self) -> &[Expr] {
        &self.entries
    }

    pub fn row_slices(&self) -> impl Iterator<Item = &[Expr]> {
        self.entries.chunks(self.cols.max(1)).take(self.rows)
    }

    pub fn map(&self, f: impl FnMut(&Expr) -> Expr) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            entries: self.entries.iter().map(f).collect(),
        }
    }

    /// Determinant by cofactor expansion along the first row.
    ///
    /// Numeric products and sums are folded, so the determinant of a numeric
    /// matrix is a single number.
    pub fn determinant(&self) -> Result<Expr, LatexError> {
        if !self.is_square() {
            return Err(LatexError::NonSquareMatrix {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.cofactor_expansion())
    }

    fn cofactor_expansion(&self) -> Expr {
        match self.rows {
            0 => Expr::integer(1),
            1 => self.entries[0].clone(),
            _ => {
                let mut total = Expr::integer(0);
                for col in 0..self.cols {
                    let term = mul_opt(
                        self.entries[col].clone(),
                        self.minor(0, col).cofactor_expansion(),
                    );
                    let term = if col % 2 == 0 { term } else { neg(term) };
                    total = add_opt(total, term);
                }
                total
            }
        }
    }

    fn minor(&self, skip_row: usize, skip_col: usize) -> Matrix {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| i / self.cols != skip_row && i % self.cols != skip_col)
            .map(|(_, e)| e.clone())
            .collect();
        Matrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            entries,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    fn ints(rows: &[&[i64]]) -> Matrix {
        Matrix::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|&v| Expr::integer(v)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_identity_determinant() {
        assert_eq!(ints(&[&[1, 0], &[0, 1]]).determinant().unwrap(), Expr::integer(1));
    }

    #[test]
    fn test_three_by_three_determinant() {
        let m = ints(&[&[2, 0, 1], &[1, 3, 2], &[1, 1, 1]]);
        // 2(3-2) - 0 + 1(1-3) = 0
        assert_eq!(m.determinant().unwrap(), Expr::integer(0));
        let m = ints(&[&[6, 1, 1], &[4, -2, 5], &[2, 8, 7]]);
        assert_eq!(m.determinant().unwrap(), Expr::integer(-306));
    }

    #[test]
    fn test_symbolic_determinant_is_unevaluated() {
        let m = Matrix::from_rows(vec![
            vec![Expr::symbol("a"), Expr::symbol("b")],
            vec![Expr::symbol("c"), Expr::symbol("d")],
        ])
        .unwrap();
        let det = m.determinant().unwrap();
        let names: Vec<String> = det.free_symbols().into_iter().collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Matrix::from_rows(vec![
            vec![Expr::integer(1), Expr::integer(2)],
            vec![Expr::integer(3)],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            LatexError::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_non_square_determinant() {
        let m = ints(&[&[1, 2, 3]]);
        assert!(matches!(
            m.determinant(),
            Err(LatexError::NonSquareMatrix { rows: 1, cols: 3 })
        ));
        assert_eq!(m.get(0, 2), Some(&Expr::integer(3)));
        assert_eq!(m.get(1, 0), None);
    }
}
