//! Math functions

use super::{arg, integer_arg, number_arg};
use crate::error::{EvalResult, EvaluationError};
use exprcalc_core::{Variant, VariantOperations};
use std::cmp::Ordering;

fn unary_double(function: &str, args: &[Variant], f: fn(f64) -> f64) -> EvalResult<Variant> {
    Ok(Variant::Double(f(number_arg(function, args, 0)?)))
}

/// Flatten array arguments one level
fn flatten(args: &[Variant]) -> impl Iterator<Item = &Variant> {
    args.iter().flat_map(|arg| match arg {
        Variant::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    })
}

/// ABS function
pub fn fn_abs(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    match arg(args, 0) {
        Variant::Integer(n) => Ok(n
            .checked_abs()
            .map(Variant::Integer)
            .unwrap_or(Variant::Long(i64::from(*n).abs()))),
        Variant::Long(n) => Ok(n
            .checked_abs()
            .map(Variant::Long)
            .unwrap_or(Variant::Double((*n as f64).abs()))),
        Variant::Float(n) => Ok(Variant::Float(n.abs())),
        _ => unary_double("ABS", args, f64::abs),
    }
}

/// ACOS function
pub fn fn_acos(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("ACOS", args, f64::acos)
}

/// ASIN function
pub fn fn_asin(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("ASIN", args, f64::asin)
}

/// ATAN function
pub fn fn_atan(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("ATAN", args, f64::atan)
}

/// COS function
pub fn fn_cos(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("COS", args, f64::cos)
}

/// SIN function
pub fn fn_sin(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("SIN", args, f64::sin)
}

/// TAN function
pub fn fn_tan(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("TAN", args, f64::tan)
}

/// EXP function
pub fn fn_exp(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("EXP", args, f64::exp)
}

/// LOG function (natural logarithm)
pub fn fn_log(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("LOG", args, f64::ln)
}

/// LOG10 function
pub fn fn_log10(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("LOG10", args, f64::log10)
}

/// SQRT function
pub fn fn_sqrt(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    unary_double("SQRT", args, f64::sqrt)
}

/// SQR function (square)
pub fn fn_sqr(args: &[Variant], ops: &VariantOperations) -> EvalResult<Variant> {
    let x = arg(args, 0);
    Ok(ops.multiply(x, x)?)
}

/// Rounding helpers keep integral inputs as they are
fn rounded(function: &str, args: &[Variant], f: fn(f64) -> f64) -> EvalResult<Variant> {
    match arg(args, 0) {
        Variant::Integer(_) | Variant::Long(_) => Ok(arg(args, 0).clone()),
        _ => unary_double(function, args, f),
    }
}

/// CEIL function
pub fn fn_ceil(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    rounded("CEIL", args, f64::ceil)
}

/// FLOOR function
pub fn fn_floor(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    rounded("FLOOR", args, f64::floor)
}

/// TRUNC function
pub fn fn_trunc(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    rounded("TRUNC", args, f64::trunc)
}

/// ROUND function
///
/// `ROUND(x)` rounds to an integer value, `ROUND(x, digits)` to the given
/// number of decimals (negative digits round left of the decimal point).
/// Halves round away from zero.
pub fn fn_round(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    let digits = if args.len() > 1 {
        integer_arg("ROUND", args, 1)?
    } else {
        0
    };

    if digits >= 0 && matches!(arg(args, 0), Variant::Integer(_) | Variant::Long(_)) {
        return Ok(arg(args, 0).clone());
    }

    let x = number_arg("ROUND", args, 0)?;
    let digits = digits.clamp(-308, 308) as i32;
    let factor = 10f64.powi(digits.abs());
    let result = if digits >= 0 {
        (x * factor).round() / factor
    } else {
        (x / factor).round() * factor
    };
    Ok(Variant::Double(result))
}

/// E function
pub fn fn_e(_args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    Ok(Variant::Double(std::f64::consts::E))
}

/// PI function
pub fn fn_pi(_args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    Ok(Variant::Double(std::f64::consts::PI))
}

/// RND function: uniform in [0, 1)
pub fn fn_rnd(_args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    Ok(Variant::Double(rand::random::<f64>()))
}

fn extreme(function: &str, args: &[Variant], ops: &VariantOperations, keep: Ordering) -> EvalResult<Variant> {
    let mut best: Option<&Variant> = None;

    for value in flatten(args) {
        if matches!(value, Variant::Object(_)) {
            return Err(EvaluationError::Argument(format!(
                "{}: cannot compare {} values",
                function,
                value.type_name()
            )));
        }
        best = match best {
            None => Some(value),
            Some(current) if ops.compare(value, current)? == Some(keep) => Some(value),
            Some(current) => Some(current),
        };
    }

    Ok(best.cloned().unwrap_or_default())
}

/// MAX function
pub fn fn_max(args: &[Variant], ops: &VariantOperations) -> EvalResult<Variant> {
    extreme("MAX", args, ops, Ordering::Greater)
}

/// MIN function
pub fn fn_min(args: &[Variant], ops: &VariantOperations) -> EvalResult<Variant> {
    extreme("MIN", args, ops, Ordering::Less)
}

/// SUM function
///
/// Arrays are summed element by element; Null values are skipped.
pub fn fn_sum(args: &[Variant], ops: &VariantOperations) -> EvalResult<Variant> {
    let mut total: Option<Variant> = None;

    for value in flatten(args) {
        let value = match value {
            Variant::Null => continue,
            Variant::String(s) => value.to_double().map(Variant::Double).ok_or_else(|| {
                EvaluationError::Argument(format!("SUM: '{}' is not a number", s))
            })?,
            Variant::Array(_) | Variant::Object(_) => {
                return Err(EvaluationError::Argument(format!(
                    "SUM: cannot add {} values",
                    value.type_name()
                )))
            }
            other => other.clone(),
        };
        total = Some(match total {
            None => value,
            Some(sum) => ops.add(&sum, &value)?,
        });
    }

    Ok(total.unwrap_or(Variant::Integer(0)))
}
