//! Logical and general-purpose functions

use super::{arg, integer_arg};
use crate::error::{EvalResult, EvaluationError};
use exprcalc_core::{Variant, VariantOperations};

/// IF function
pub fn fn_if(args: &[Variant], ops: &VariantOperations) -> EvalResult<Variant> {
    Ok(ops.ternary(arg(args, 0), arg(args, 1), arg(args, 2))?)
}

/// CHOOSE function: `CHOOSE(index, value1, value2, ...)` with a 1-based index
pub fn fn_choose(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    let index = integer_arg("CHOOSE", args, 0)?;
    let choices = args.get(1..).unwrap_or_default();

    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| choices.get(i))
        .cloned()
        .ok_or_else(|| {
            EvaluationError::Argument(format!(
                "CHOOSE: index {} is out of range 1..{}",
                index,
                choices.len()
            ))
        })
}

/// EMPTY function: true for Null, empty strings and empty arrays
pub fn fn_empty(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    let empty = match arg(args, 0) {
        Variant::Null => true,
        Variant::String(s) => s.is_empty(),
        Variant::Array(items) => items.is_empty(),
        _ => false,
    };
    Ok(Variant::Boolean(empty))
}

/// NULL function
pub fn fn_null(_args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    Ok(Variant::Null)
}

/// CONTAINS function: `CONTAINS(container, value)`, the reverse of `IN`
pub fn fn_contains(args: &[Variant], ops: &VariantOperations) -> EvalResult<Variant> {
    Ok(Variant::Boolean(ops.contains(arg(args, 1), arg(args, 0))?))
}
