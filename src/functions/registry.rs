use crate::Expr;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Signature of a derivative rule: (call arguments, their derivatives) -> total derivative
pub(crate) type DerivativeRule = fn(&[Expr], &[Expr]) -> Expr;

/// Definition of a mathematical function including its evaluation and differentiation logic
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "lowergamma")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation function
    pub eval: fn(&[f64]) -> Option<f64>,

    /// Symbolic differentiation rule.
    /// `None` leaves an unevaluated `Derivative` node, as for user functions.
    pub derivative: Option<DerivativeRule>,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let definitions = crate::functions::definitions::all_definitions();
    let mut map = FxHashMap::with_capacity_and_hasher(definitions.len(), Default::default());
    for def in definitions {
        map.insert(def.name, def);
    }
    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by name
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    /// Definition only when `args` is an accepted argument count
    pub(crate) fn get_with_arity(name: &str, args: usize) -> Option<&'static FunctionDefinition> {
        Self::get(name).filter(|def| def.validate_arity(args))
    }
}
