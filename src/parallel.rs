//! Parallel batch conversion and evaluation using Rayon
//!
//! Enable with the `parallel` feature:
//! ```toml
//! symb_latex = { version = "0.1", features = ["parallel"] }
//! ```

use crate::{Expr, Latex, LatexError};
use rayon::prelude::*;
use std::collections::HashMap;

/// Convert many LaTeX strings with the default configuration.
///
/// Inputs are independent; results come back in input order.
///
/// # Example
/// ```
/// use symb_latex::parallel::parse_latex_batch;
///
/// let results = parse_latex_batch(&["x^2", "\\frac{1}{2}", "x +"]);
/// assert!(results[0].is_ok());
/// assert!(results[2].is_err());
/// ```
pub fn parse_latex_batch(inputs: &[&str]) -> Vec<Result<Expr, LatexError>> {
    parse_latex_batch_with(&Latex::new(), inputs)
}

/// Convert many LaTeX strings with a shared configuration
pub fn parse_latex_batch_with(config: &Latex, inputs: &[&str]) -> Vec<Result<Expr, LatexError>> {
    inputs.par_iter().map(|input| config.parse(input)).collect()
}

/// Evaluate several expressions over several points in parallel.
///
/// # Arguments
/// * `exprs` - Expressions to evaluate
/// * `var_names` - For each expression, its variable names
/// * `values` - `values[expr_idx][var_idx][point_idx]`
///
/// Points are zipped across variables. A variable whose column is shorter than
/// the longest one stays unbound at the missing points, which evaluates to
/// `None` unless the expression does not depend on it.
/// Mismatched dimensions give an empty result for that expression.
pub fn evaluate_parallel(
    exprs: &[&Expr],
    var_names: &[&[&str]],
    values: &[&[&[f64]]],
) -> Vec<Vec<Option<f64>>> {
    let n_exprs = exprs.len();
    if var_names.len() != n_exprs || values.len() != n_exprs {
        return vec![vec![]; n_exprs];
    }

    exprs
        .par_iter()
        .zip(var_names.par_iter())
        .zip(values.par_iter())
        .map(|((expr, vars), vals)| {
            if vars.len() != vals.len() {
                return vec![];
            }
            if vars.is_empty() {
                return vec![expr.evaluate(&HashMap::new())];
            }

            let n_points = vals.iter().map(|column| column.len()).max().unwrap_or(0);
            (0..n_points)
                .into_par_iter()
                .map(|point_idx| {
                    let var_map: HashMap<&str, f64> = vars
                        .iter()
                        .zip(vals.iter())
                        .filter_map(|(var, column)| column.get(point_idx).map(|v| (*var, *v)))
                        .collect();
                    expr.evaluate(&var_map)
                })
                .collect()
        })
        .collect()
}
