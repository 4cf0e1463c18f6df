//! Name tables for LaTeX commands
//!
//! Process-wide, built once, never mutated.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::LazyLock;

/// Commands lexed as built-in function names (without the backslash)
pub const FUNCTION_COMMANDS: [&str; 30] = [
    "exp", "log", "ln", "sin", "cos", "tan", "csc", "sec", "cot", "arcsin", "arccos", "arctan",
    "arccsc", "arcsec", "arccot", "sinh", "cosh", "tanh", "csch", "sech", "coth", "arsinh",
    "arcosh", "artanh", "arcsch", "arsech", "arcoth", "Gamma", "gamma", "zeta",
];

/// Trigonometric and hyperbolic functions whose `^{-1}` means the inverse
pub const INVERTIBLE_BY_POWER: [&str; 12] = [
    "sin", "cos", "tan", "csc", "sec", "cot", "sinh", "cosh", "tanh", "csch", "sech", "coth",
];

/// Greek letter commands (without the backslash)
pub const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "omicron", "pi", "varpi", "rho",
    "varrho", "sigma", "varsigma", "tau", "upsilon", "phi", "varphi", "chi", "psi", "omega",
    "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

static GREEK_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| GREEK_LETTERS.iter().copied().collect());

static FUNCTION_COMMAND_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| FUNCTION_COMMANDS.iter().copied().collect());

static INVERTIBLE_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| INVERTIBLE_BY_POWER.iter().copied().collect());

/// `arcsin` -> `asin`, `arsinh` -> `asinh`
static CANONICAL: LazyLock<FxHashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("arcsin", "asin"),
        ("arccos", "acos"),
        ("arctan", "atan"),
        ("arccsc", "acsc"),
        ("arcsec", "asec"),
        ("arccot", "acot"),
        ("arsinh", "asinh"),
        ("arcosh", "acosh"),
        ("artanh", "atanh"),
        ("arcsch", "acsch"),
        ("arsech", "asech"),
        ("arcoth", "acoth"),
    ]
    .into_iter()
    .collect()
});

/// Single-argument functions and their inverses, both directions
static INVERSES: LazyLock<FxHashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let pairs = [
        ("sin", "asin"),
        ("cos", "acos"),
        ("tan", "atan"),
        ("csc", "acsc"),
        ("sec", "asec"),
        ("cot", "acot"),
        ("sinh", "asinh"),
        ("cosh", "acosh"),
        ("tanh", "atanh"),
        ("csch", "acsch"),
        ("sech", "asech"),
        ("coth", "acoth"),
        ("exp", "log"),
    ];
    pairs
        .iter()
        .flat_map(|&(f, g)| [(f, g), (g, f)])
        .collect()
});

pub fn is_function_command(name: &str) -> bool {
    FUNCTION_COMMAND_SET.contains(name)
}

pub fn is_invertible_by_power(name: &str) -> bool {
    INVERTIBLE_SET.contains(name)
}

pub fn is_greek_letter(name: &str) -> bool {
    GREEK_SET.contains(name)
}

/// Canonical registry name for a function command
pub fn canonical_name(name: &str) -> &str {
    CANONICAL.get(name).copied().unwrap_or(name)
}

/// Inverse of a single-argument function, if it has one
pub fn inverse_of(name: &str) -> Option<&'static str> {
    INVERSES.get(name).copied()
}
