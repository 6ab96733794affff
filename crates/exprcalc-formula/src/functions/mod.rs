//! Function registry and built-in functions

pub mod date;
pub mod logical;
pub mod math;

use crate::error::{EvalResult, EvaluationError};
use crate::variables::name_key;
use ahash::AHashMap;
use exprcalc_core::{Variant, VariantOperations};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// Function implementation signature
///
/// Arguments arrive in source order. The operation table is the one the
/// evaluator was configured with, so functions compare and combine values
/// the same way operators do.
pub type FunctionImpl =
    Arc<dyn Fn(&[Variant], &VariantOperations) -> EvalResult<Variant> + Send + Sync>;

/// Function definition
#[derive(Clone)]
pub struct FunctionDef {
    /// Function name (as registered; lookups ignore case)
    pub name: String,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    pub fn new<F>(name: impl Into<String>, min_args: usize, max_args: Option<usize>, f: F) -> Self
    where
        F: Fn(&[Variant], &VariantOperations) -> EvalResult<Variant> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            min_args,
            max_args,
            implementation: Arc::new(f),
        }
    }

    /// Function taking exactly `count` arguments
    pub fn fixed<F>(name: impl Into<String>, count: usize, f: F) -> Self
    where
        F: Fn(&[Variant], &VariantOperations) -> EvalResult<Variant> + Send + Sync + 'static,
    {
        Self::new(name, count, Some(count), f)
    }

    /// Function taking `min_args` or more arguments
    pub fn variadic<F>(name: impl Into<String>, min_args: usize, f: F) -> Self
    where
        F: Fn(&[Variant], &VariantOperations) -> EvalResult<Variant> + Send + Sync + 'static,
    {
        Self::new(name, min_args, None, f)
    }

    /// Check an argument count against the declared bounds
    pub fn check_arity(&self, actual: usize) -> EvalResult<()> {
        let within = actual >= self.min_args && self.max_args.map_or(true, |max| actual <= max);
        if within {
            return Ok(());
        }

        let expected = match self.max_args {
            Some(max) if max == self.min_args => format!("exactly {}", max),
            Some(max) => format!("between {} and {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        };
        Err(EvaluationError::ArgumentCount {
            function: self.name.clone(),
            expected,
            actual,
        })
    }

    /// Call the implementation
    pub fn call(&self, args: &[Variant], ops: &VariantOperations) -> EvalResult<Variant> {
        (self.implementation)(args, ops)
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// Built-in function library, shared read-only
static DEFAULT_FUNCTIONS: Lazy<FunctionRegistry> = Lazy::new(|| {
    let mut registry = FunctionRegistry::new();
    registry.register_math_functions();
    registry.register_logical_functions();
    registry.register_date_functions();
    registry
});

/// Function registry
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: AHashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in functions
    pub fn with_defaults() -> Self {
        DEFAULT_FUNCTIONS.clone()
    }

    /// The shared built-in library
    pub fn defaults() -> &'static FunctionRegistry {
        &DEFAULT_FUNCTIONS
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name_key(name))
    }

    /// Register a function, replacing any function with the same name
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(name_key(&def.name), def);
    }

    /// Register a closure
    pub fn register_fn<F>(&mut self, name: &str, min_args: usize, max_args: Option<usize>, f: F)
    where
        F: Fn(&[Variant], &VariantOperations) -> EvalResult<Variant> + Send + Sync + 'static,
    {
        self.register(FunctionDef::new(name, min_args, max_args, f));
    }

    pub fn remove(&mut self, name: &str) -> Option<FunctionDef> {
        self.functions.remove(&name_key(name))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.values().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn register_math_functions(&mut self) {
        self.register(FunctionDef::fixed("ABS", 1, math::fn_abs));
        self.register(FunctionDef::fixed("ACOS", 1, math::fn_acos));
        self.register(FunctionDef::fixed("ASIN", 1, math::fn_asin));
        self.register(FunctionDef::fixed("ATAN", 1, math::fn_atan));
        self.register(FunctionDef::fixed("CEIL", 1, math::fn_ceil));
        self.register(FunctionDef::fixed("COS", 1, math::fn_cos));
        self.register(FunctionDef::fixed("E", 0, math::fn_e));
        self.register(FunctionDef::fixed("EXP", 1, math::fn_exp));
        self.register(FunctionDef::fixed("FLOOR", 1, math::fn_floor));
        self.register(FunctionDef::fixed("LOG", 1, math::fn_log));
        self.register(FunctionDef::fixed("LOG10", 1, math::fn_log10));
        self.register(FunctionDef::variadic("MAX", 1, math::fn_max));
        self.register(FunctionDef::variadic("MIN", 1, math::fn_min));
        self.register(FunctionDef::fixed("PI", 0, math::fn_pi));

        // RND (volatile)
        self.register(FunctionDef::fixed("RND", 0, math::fn_rnd));

        self.register(FunctionDef::new("ROUND", 1, Some(2), math::fn_round));
        self.register(FunctionDef::fixed("SIN", 1, math::fn_sin));
        self.register(FunctionDef::fixed("SQR", 1, math::fn_sqr));
        self.register(FunctionDef::fixed("SQRT", 1, math::fn_sqrt));
        self.register(FunctionDef::variadic("SUM", 1, math::fn_sum));
        self.register(FunctionDef::fixed("TAN", 1, math::fn_tan));
        self.register(FunctionDef::fixed("TRUNC", 1, math::fn_trunc));
    }

    fn register_logical_functions(&mut self) {
        self.register(FunctionDef::fixed("IF", 3, logical::fn_if));
        self.register(FunctionDef::variadic("CHOOSE", 2, logical::fn_choose));
        self.register(FunctionDef::fixed("EMPTY", 1, logical::fn_empty));
        self.register(FunctionDef::fixed("NULL", 0, logical::fn_null));
        self.register(FunctionDef::fixed("CONTAINS", 2, logical::fn_contains));
    }

    fn register_date_functions(&mut self) {
        // NOW (volatile)
        self.register(FunctionDef::fixed("NOW", 0, date::fn_now));

        self.register(FunctionDef::new("DATE", 1, Some(7), date::fn_date));
        self.register(FunctionDef::fixed("DAYOFWEEK", 1, date::fn_dayofweek));
        self.register(FunctionDef::new("TICKS", 0, Some(1), date::fn_ticks));
        self.register(FunctionDef::new("TIMESPAN", 1, Some(5), date::fn_timespan));
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Argument at `index`, or Null when absent
pub(crate) fn arg(args: &[Variant], index: usize) -> &Variant {
    static NULL: Variant = Variant::Null;
    args.get(index).unwrap_or(&NULL)
}

/// Numeric argument as a double
pub(crate) fn number_arg(function: &str, args: &[Variant], index: usize) -> EvalResult<f64> {
    let value = arg(args, index);
    match value {
        Variant::Array(_) | Variant::Object(_) => None,
        other => other.to_double(),
    }
    .ok_or_else(|| {
        EvaluationError::Argument(format!(
            "{}: argument {} ({}) is not a number",
            function,
            index + 1,
            value.type_name()
        ))
    })
}

/// Integral argument as an i64
pub(crate) fn integer_arg(function: &str, args: &[Variant], index: usize) -> EvalResult<i64> {
    let value = arg(args, index);
    match value {
        Variant::Array(_) | Variant::Object(_) => None,
        other => other.to_long(),
    }
    .ok_or_else(|| {
        EvaluationError::Argument(format!(
            "{}: argument {} ({}) is not an integer",
            function,
            index + 1,
            value.type_name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = FunctionRegistry::with_defaults();
        assert!(registry.get("max").is_some());
        assert!(registry.get("Max").is_some());
        assert!(registry.get("nosuch").is_none());

        let mut registry = FunctionRegistry::new();
        registry.register(FunctionDef::fixed("Öl", 0, |_, _| Ok(Variant::Null)));
        assert!(registry.contains("öL"));
        assert_eq!(registry.names(), vec!["Öl"]);
    }

    #[test]
    fn test_default_library_names() {
        let registry = FunctionRegistry::defaults();
        for name in [
            "ABS", "ACOS", "ASIN", "ATAN", "CEIL", "COS", "E", "EXP", "FLOOR", "LOG", "LOG10",
            "MAX", "MIN", "PI", "RND", "ROUND", "SIN", "SQR", "SQRT", "SUM", "TAN", "TRUNC", "IF",
            "CHOOSE", "EMPTY", "NULL", "CONTAINS", "NOW", "DATE", "DAYOFWEEK", "TICKS",
            "TIMESPAN",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert_eq!(registry.len(), 32);
    }

    #[test]
    fn test_new_registry_is_empty() {
        assert!(FunctionRegistry::new().is_empty());
    }

    #[test]
    fn test_register_closure() {
        let mut registry = FunctionRegistry::new();
        registry.register_fn("Double", 1, Some(1), |args, ops| {
            Ok(ops.add(&args[0], &args[0])?)
        });
        let def = registry.get("DOUBLE").unwrap();
        assert_eq!(def.name, "Double");
        assert_eq!(
            def.call(&[Variant::Integer(21)], &VariantOperations::new()),
            Ok(Variant::Integer(42))
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = FunctionRegistry::with_defaults();
        registry.register(FunctionDef::fixed("pi", 0, |_, _| Ok(Variant::Integer(3))));
        assert_eq!(
            registry.get("PI").unwrap().call(&[], &VariantOperations::new()),
            Ok(Variant::Integer(3))
        );
        // The shared library is untouched
        assert_eq!(
            FunctionRegistry::defaults()
                .get("PI")
                .unwrap()
                .call(&[], &VariantOperations::new()),
            Ok(Variant::Double(std::f64::consts::PI))
        );
    }

    #[test]
    fn test_check_arity_messages() {
        let fixed = FunctionDef::fixed("F", 2, |_, _| Ok(Variant::Null));
        let range = FunctionDef::new("G", 1, Some(3), |_, _| Ok(Variant::Null));
        let variadic = FunctionDef::variadic("H", 1, |_, _| Ok(Variant::Null));

        assert!(fixed.check_arity(2).is_ok());
        assert_eq!(
            fixed.check_arity(1),
            Err(EvaluationError::ArgumentCount {
                function: "F".into(),
                expected: "exactly 2".into(),
                actual: 1,
            })
        );
        assert_eq!(
            range.check_arity(4).map_err(|e| e.to_string()),
            Err("Wrong number of arguments for G: expected between 1 and 3, got 4".to_string())
        );
        assert!(variadic.check_arity(10).is_ok());
        assert_eq!(variadic.check_arity(0).map_err(|e| e.code()), Err("WRONG_ARGUMENT_COUNT"));
    }
}
