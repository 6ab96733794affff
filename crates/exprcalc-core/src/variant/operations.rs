//! Operator semantics over [`Variant`] values

use super::value::{millis, Variant, VariantType};
use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::fmt;

/// Operators understood by [`VariantOperations`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Negate,

    // Comparison
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Logical
    And,
    Or,
    Xor,
    Not,

    // Bit shifts
    ShiftLeft,
    ShiftRight,

    // Pattern and membership
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,

    /// `x[i]`
    Element,

    /// `c ? a : b`
    Ternary,
}

impl Operator {
    /// Source symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
            Operator::Negate => "-",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Not => "NOT",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Element => "[]",
            Operator::Ternary => "?:",
        }
    }

    /// Number of operands consumed from the stack
    pub fn arity(&self) -> usize {
        match self {
            Operator::Negate | Operator::Not | Operator::IsNull | Operator::IsNotNull => 1,
            Operator::Ternary => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How strings are compared by relational operators and `IN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringComparison {
    /// Code point order
    #[default]
    Ordinal,
    /// Code point order after lowercasing both sides
    IgnoreCase,
}

/// Operator table applied by the evaluator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantOperations {
    pub string_comparison: StringComparison,
}

/// Arithmetic kernel shared by the numeric lattice
#[derive(Debug, Clone, Copy)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Arith {
    fn operator(self) -> Operator {
        match self {
            Arith::Add => Operator::Add,
            Arith::Sub => Operator::Subtract,
            Arith::Mul => Operator::Multiply,
            Arith::Div => Operator::Divide,
            Arith::Mod => Operator::Modulo,
            Arith::Pow => Operator::Power,
        }
    }

    /// `Ok(None)` means the result does not fit in an i64
    fn integral(self, x: i64, y: i64) -> Result<Option<i64>> {
        Ok(match self {
            Arith::Add => x.checked_add(y),
            Arith::Sub => x.checked_sub(y),
            Arith::Mul => x.checked_mul(y),
            Arith::Div => {
                if y == 0 {
                    return Err(Error::DivisionByZero);
                }
                x.checked_div(y)
            }
            Arith::Mod => {
                if y == 0 {
                    return Err(Error::DivisionByZero);
                }
                x.checked_rem(y)
            }
            Arith::Pow => u32::try_from(y).ok().and_then(|e| x.checked_pow(e)),
        })
    }

    fn floating(self, x: f64, y: f64) -> Result<f64> {
        Ok(match self {
            Arith::Add => x + y,
            Arith::Sub => x - y,
            Arith::Mul => x * y,
            Arith::Div => {
                if y == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                x / y
            }
            Arith::Mod => {
                if y == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                x % y
            }
            Arith::Pow => x.powf(y),
        })
    }
}

/// Operand lifted onto the numeric lattice
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Numeric {
    fn of(value: &Variant) -> Option<Numeric> {
        match value {
            Variant::Null => Some(Numeric::Integer(0)),
            Variant::Integer(n) => Some(Numeric::Integer(*n)),
            Variant::Long(n) => Some(Numeric::Long(*n)),
            Variant::Float(n) => Some(Numeric::Float(*n)),
            Variant::Double(n) => Some(Numeric::Double(*n)),
            Variant::Boolean(b) => Some(Numeric::Integer(i32::from(*b))),
            // A string that does not parse is Null, which counts as zero
            Variant::String(_) => Some(
                value
                    .to_double()
                    .map(Numeric::Double)
                    .unwrap_or(Numeric::Integer(0)),
            ),
            _ => None,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Numeric::Integer(_) => 0,
            Numeric::Long(_) => 1,
            Numeric::Float(_) => 2,
            Numeric::Double(_) => 3,
        }
    }

    fn widen(self, rank: u8) -> Numeric {
        match (self, rank) {
            (Numeric::Integer(n), 1) => Numeric::Long(i64::from(n)),
            (Numeric::Integer(n), 2) => Numeric::Float(n as f32),
            (Numeric::Long(n), 2) => Numeric::Float(n as f32),
            (Numeric::Float(n), 3) => Numeric::Double(f64::from(n)),
            (other, 3) => Numeric::Double(other.as_f64()),
            (other, _) => other,
        }
    }

    fn promote(a: Numeric, b: Numeric) -> (Numeric, Numeric) {
        let rank = a.rank().max(b.rank());
        (a.widen(rank), b.widen(rank))
    }

    fn as_f64(self) -> f64 {
        match self {
            Numeric::Integer(n) => f64::from(n),
            Numeric::Long(n) => n as f64,
            Numeric::Float(n) => f64::from(n),
            Numeric::Double(n) => n,
        }
    }
}

fn unsupported(op: Operator, left: &Variant, right: &Variant) -> Error {
    Error::UnsupportedOperation {
        operator: op.symbol(),
        left: left.variant_type(),
        right: right.variant_type(),
    }
}

fn unsupported_unary(op: Operator, operand: &Variant) -> Error {
    Error::UnsupportedUnaryOperation {
        operator: op.symbol(),
        operand: operand.variant_type(),
    }
}

fn is_integral(value: &Variant) -> bool {
    matches!(
        value,
        Variant::Null
            | Variant::Integer(_)
            | Variant::Long(_)
            | Variant::Boolean(_)
            | Variant::DateTime(_)
            | Variant::TimeSpan(_)
    )
}

fn is_structured(value: &Variant) -> bool {
    matches!(value, Variant::Array(_) | Variant::Object(_))
}

/// Boolean view used by logical operators and the ternary condition
fn logical(value: &Variant) -> Option<bool> {
    match value {
        Variant::Null
        | Variant::Boolean(_)
        | Variant::Integer(_)
        | Variant::Long(_)
        | Variant::Float(_)
        | Variant::Double(_)
        | Variant::String(_) => value.to_boolean(),
        _ => None,
    }
}

/// Translate a SQL LIKE pattern into an anchored regex
fn like_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            c => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    source.push('$');

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|_| Error::InvalidPattern(pattern.to_string()))
}

impl VariantOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an operation table with the given string comparison
    pub fn with_string_comparison(string_comparison: StringComparison) -> Self {
        Self { string_comparison }
    }

    /// Apply an operator to operands given in push order
    pub fn apply(&self, op: Operator, operands: &[Variant]) -> Result<Variant> {
        match operands {
            [operand] => self.unary(op, operand),
            [left, right] => self.binary(op, left, right),
            [condition, if_true, if_false] if op == Operator::Ternary => {
                self.ternary(condition, if_true, if_false)
            }
            [first, ..] => Err(unsupported_unary(op, first)),
            [] => Err(Error::UnsupportedUnaryOperation {
                operator: op.symbol(),
                operand: VariantType::Null,
            }),
        }
    }

    /// Apply a unary operator
    pub fn unary(&self, op: Operator, operand: &Variant) -> Result<Variant> {
        match op {
            Operator::Negate => self.negate(operand),
            Operator::Not => self.not(operand),
            Operator::IsNull => Ok(Variant::Boolean(operand.is_null())),
            Operator::IsNotNull => Ok(Variant::Boolean(!operand.is_null())),
            _ => Err(unsupported_unary(op, operand)),
        }
    }

    /// Apply a binary operator
    pub fn binary(&self, op: Operator, left: &Variant, right: &Variant) -> Result<Variant> {
        match op {
            Operator::Add => self.add(left, right),
            Operator::Subtract => self.subtract(left, right),
            Operator::Multiply => self.multiply(left, right),
            Operator::Divide => self.divide(left, right),
            Operator::Modulo => self.arithmetic(Arith::Mod, left, right),
            Operator::Power => self.arithmetic(Arith::Pow, left, right),
            Operator::Equal => self.equal(left, right).map(Variant::Boolean),
            Operator::NotEqual => self.equal(left, right).map(|eq| Variant::Boolean(!eq)),
            Operator::Less => self.relational(op, left, right, Ordering::is_lt),
            Operator::LessEqual => self.relational(op, left, right, Ordering::is_le),
            Operator::Greater => self.relational(op, left, right, Ordering::is_gt),
            Operator::GreaterEqual => self.relational(op, left, right, Ordering::is_ge),
            Operator::And => self.logical_binary(op, left, right, |a, b| a && b),
            Operator::Or => self.logical_binary(op, left, right, |a, b| a || b),
            Operator::Xor => self.logical_binary(op, left, right, |a, b| a != b),
            Operator::ShiftLeft | Operator::ShiftRight => self.shift(op, left, right),
            Operator::Like => self.like(left, right).map(Variant::Boolean),
            Operator::NotLike => self.like(left, right).map(|m| Variant::Boolean(!m)),
            Operator::In => self.contains(left, right).map(Variant::Boolean),
            Operator::NotIn => self.contains(left, right).map(|m| Variant::Boolean(!m)),
            Operator::Element => self.element(left, right),
            _ => Err(unsupported(op, left, right)),
        }
    }

    /// `condition ? if_true : if_false`
    pub fn ternary(
        &self,
        condition: &Variant,
        if_true: &Variant,
        if_false: &Variant,
    ) -> Result<Variant> {
        match logical(condition) {
            Some(true) => Ok(if_true.clone()),
            Some(false) => Ok(if_false.clone()),
            None => Err(unsupported_unary(Operator::Ternary, condition)),
        }
    }

    pub fn add(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        match (left, right) {
            (Variant::String(_), _) | (_, Variant::String(_)) => {
                let mut text = left.as_string();
                text.push_str(&right.as_string());
                Ok(Variant::String(text))
            }
            (Variant::DateTime(dt), Variant::TimeSpan(span))
            | (Variant::TimeSpan(span), Variant::DateTime(dt)) => dt
                .checked_add_signed(*span)
                .map(Variant::DateTime)
                .ok_or_else(|| unsupported(Operator::Add, left, right)),
            (Variant::TimeSpan(a), Variant::TimeSpan(b)) => a
                .checked_add(b)
                .map(Variant::TimeSpan)
                .ok_or_else(|| unsupported(Operator::Add, left, right)),
            _ => self.arithmetic(Arith::Add, left, right),
        }
    }

    pub fn subtract(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        match (left, right) {
            (Variant::DateTime(dt), Variant::TimeSpan(span)) => dt
                .checked_sub_signed(*span)
                .map(Variant::DateTime)
                .ok_or_else(|| unsupported(Operator::Subtract, left, right)),
            (Variant::DateTime(a), Variant::DateTime(b)) => {
                Ok(Variant::TimeSpan(a.signed_duration_since(*b)))
            }
            (Variant::TimeSpan(a), Variant::TimeSpan(b)) => a
                .checked_sub(b)
                .map(Variant::TimeSpan)
                .ok_or_else(|| unsupported(Operator::Subtract, left, right)),
            _ => self.arithmetic(Arith::Sub, left, right),
        }
    }

    pub fn multiply(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        match (left, right) {
            (Variant::TimeSpan(span), factor) | (factor, Variant::TimeSpan(span))
                if Numeric::of(factor).is_some() && !factor.is_null() =>
            {
                let ms = span.num_milliseconds() as f64 * factor.as_double();
                Ok(Variant::TimeSpan(millis(ms as i64)))
            }
            _ => self.arithmetic(Arith::Mul, left, right),
        }
    }

    pub fn divide(&self, left: &Variant, right: &Variant) -> Result<Variant> {
        match (left, right) {
            (Variant::TimeSpan(a), Variant::TimeSpan(b)) => {
                let divisor = b.num_milliseconds();
                if divisor == 0 {
                    return Err(Error::DivisionByZero);
                }
                Ok(Variant::Double(a.num_milliseconds() as f64 / divisor as f64))
            }
            (Variant::TimeSpan(span), divisor) if Numeric::of(divisor).is_some() => {
                let divisor = divisor.as_double();
                if divisor == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                let ms = span.num_milliseconds() as f64 / divisor;
                Ok(Variant::TimeSpan(millis(ms as i64)))
            }
            _ => self.arithmetic(Arith::Div, left, right),
        }
    }

    fn arithmetic(&self, arith: Arith, left: &Variant, right: &Variant) -> Result<Variant> {
        let (a, b) = match (Numeric::of(left), Numeric::of(right)) {
            (Some(a), Some(b)) => Numeric::promote(a, b),
            _ => return Err(unsupported(arith.operator(), left, right)),
        };

        match (a, b) {
            (Numeric::Integer(x), Numeric::Integer(y)) => {
                match arith.integral(i64::from(x), i64::from(y))? {
                    Some(n) => Ok(i32::try_from(n)
                        .map(Variant::Integer)
                        .unwrap_or(Variant::Long(n))),
                    None => Ok(Variant::Double(arith.floating(f64::from(x), f64::from(y))?)),
                }
            }
            (Numeric::Long(x), Numeric::Long(y)) => match arith.integral(x, y)? {
                Some(n) => Ok(Variant::Long(n)),
                None => Ok(Variant::Double(arith.floating(x as f64, y as f64)?)),
            },
            (Numeric::Float(x), Numeric::Float(y)) => Ok(Variant::Float(
                arith.floating(f64::from(x), f64::from(y))? as f32,
            )),
            (a, b) => Ok(Variant::Double(arith.floating(a.as_f64(), b.as_f64())?)),
        }
    }

    pub fn negate(&self, operand: &Variant) -> Result<Variant> {
        match operand {
            Variant::Null => Ok(Variant::Null),
            Variant::Integer(n) => Ok(n
                .checked_neg()
                .map(Variant::Integer)
                .unwrap_or(Variant::Long(-i64::from(*n)))),
            Variant::Long(n) => Ok(n
                .checked_neg()
                .map(Variant::Long)
                .unwrap_or(Variant::Double(-(*n as f64)))),
            Variant::Float(n) => Ok(Variant::Float(-n)),
            Variant::Double(n) => Ok(Variant::Double(-n)),
            Variant::Boolean(b) => Ok(Variant::Integer(-i32::from(*b))),
            Variant::TimeSpan(span) => Ok(Variant::TimeSpan(-*span)),
            Variant::String(_) => Ok(operand
                .to_double()
                .map(|n| Variant::Double(-n))
                .unwrap_or(Variant::Null)),
            _ => Err(unsupported_unary(Operator::Negate, operand)),
        }
    }

    pub fn not(&self, operand: &Variant) -> Result<Variant> {
        logical(operand)
            .map(|b| Variant::Boolean(!b))
            .ok_or_else(|| unsupported_unary(Operator::Not, operand))
    }

    fn logical_binary(
        &self,
        op: Operator,
        left: &Variant,
        right: &Variant,
        f: fn(bool, bool) -> bool,
    ) -> Result<Variant> {
        match (logical(left), logical(right)) {
            (Some(a), Some(b)) => Ok(Variant::Boolean(f(a, b))),
            _ => Err(unsupported(op, left, right)),
        }
    }

    /// Structural equality for `=` and `<>`
    pub fn equal(&self, left: &Variant, right: &Variant) -> Result<bool> {
        match (left, right) {
            (Variant::Array(a), Variant::Array(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b) {
                    if !self.equal(x, y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Variant::Object(a), Variant::Object(b)) => Ok(a == b),
            _ => Ok(self.order(Operator::Equal, left, right)? == Some(Ordering::Equal)),
        }
    }

    /// Ordering of two values, `None` when they are unordered (NaN)
    pub fn compare(&self, left: &Variant, right: &Variant) -> Result<Option<Ordering>> {
        self.order(Operator::Less, left, right)
    }

    fn order(&self, op: Operator, left: &Variant, right: &Variant) -> Result<Option<Ordering>> {
        if is_structured(left) || is_structured(right) {
            return Err(unsupported(op, left, right));
        }

        if matches!(left, Variant::String(_)) || matches!(right, Variant::String(_)) {
            return Ok(Some(
                self.compare_strings(&left.as_string(), &right.as_string()),
            ));
        }

        if is_integral(left) && is_integral(right) {
            if let (Some(a), Some(b)) = (left.to_long(), right.to_long()) {
                return Ok(Some(a.cmp(&b)));
            }
        }

        match (left.to_double(), right.to_double()) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(unsupported(op, left, right)),
        }
    }

    fn relational(
        &self,
        op: Operator,
        left: &Variant,
        right: &Variant,
        accept: fn(Ordering) -> bool,
    ) -> Result<Variant> {
        let ordering = self.order(op, left, right)?;
        Ok(Variant::Boolean(ordering.map_or(false, accept)))
    }

    /// Compare strings according to the configured [`StringComparison`]
    pub fn compare_strings(&self, a: &str, b: &str) -> Ordering {
        match self.string_comparison {
            StringComparison::Ordinal => a.cmp(b),
            StringComparison::IgnoreCase => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }

    fn contains_str(&self, haystack: &str, needle: &str) -> bool {
        match self.string_comparison {
            StringComparison::Ordinal => haystack.contains(needle),
            StringComparison::IgnoreCase => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }

    fn shift(&self, op: Operator, left: &Variant, right: &Variant) -> Result<Variant> {
        let integral = |v: &Variant| {
            matches!(
                v,
                Variant::Null | Variant::Integer(_) | Variant::Long(_) | Variant::Boolean(_)
            )
        };
        if !integral(left) || !integral(right) {
            return Err(unsupported(op, left, right));
        }

        // Shift amounts wrap to the operand width
        let amount = right.as_long() as u32;
        let left_shift = op == Operator::ShiftLeft;
        match left {
            Variant::Long(n) => Ok(Variant::Long(if left_shift {
                n.wrapping_shl(amount)
            } else {
                n.wrapping_shr(amount)
            })),
            other => {
                let n = other.as_integer();
                Ok(Variant::Integer(if left_shift {
                    n.wrapping_shl(amount)
                } else {
                    n.wrapping_shr(amount)
                }))
            }
        }
    }

    /// SQL `LIKE` with `%` and `_` wildcards, case-insensitive
    pub fn like(&self, text: &Variant, pattern: &Variant) -> Result<bool> {
        if is_structured(text) || is_structured(pattern) {
            return Err(unsupported(Operator::Like, text, pattern));
        }
        let regex = like_regex(&pattern.as_string())?;
        Ok(regex.is_match(&text.as_string()))
    }

    /// `IN`: membership in an array, or substring of a string
    pub fn contains(&self, value: &Variant, container: &Variant) -> Result<bool> {
        match container {
            Variant::Array(items) => Ok(items
                .iter()
                .any(|item| self.equal(value, item).unwrap_or(false))),
            Variant::String(text) => {
                if is_structured(value) {
                    return Err(unsupported(Operator::In, value, container));
                }
                Ok(self.contains_str(text, &value.as_string()))
            }
            Variant::Null => Ok(false),
            Variant::Object(_) => Err(unsupported(Operator::In, value, container)),
            _ => self.equal(value, container),
        }
    }

    /// Element access: array index, string character, or object key/index
    pub fn element(&self, container: &Variant, index: &Variant) -> Result<Variant> {
        match (container, index) {
            (Variant::Object(object), Variant::String(key)) => {
                Ok(object.get(key).cloned().map(Variant::from).unwrap_or_default())
            }
            (Variant::Array(items), _) => {
                let i = self.index(container, index, items.len())?;
                Ok(items[i].clone())
            }
            (Variant::String(text), _) => {
                let len = text.chars().count();
                let i = self.index(container, index, len)?;
                Ok(text
                    .chars()
                    .nth(i)
                    .map(|c| Variant::String(c.to_string()))
                    .unwrap_or_default())
            }
            (Variant::Object(object), _) => match object {
                serde_json::Value::Array(items) => {
                    let i = self.index(container, index, items.len())?;
                    Ok(Variant::from(items[i].clone()))
                }
                _ => Err(unsupported(Operator::Element, container, index)),
            },
            _ => Err(unsupported(Operator::Element, container, index)),
        }
    }

    fn index(&self, container: &Variant, index: &Variant, len: usize) -> Result<usize> {
        if is_structured(index) {
            return Err(unsupported(Operator::Element, container, index));
        }
        let i = index
            .to_long()
            .ok_or_else(|| unsupported(Operator::Element, container, index))?;
        usize::try_from(i)
            .ok()
            .filter(|&i| i < len)
            .ok_or(Error::IndexOutOfRange { index: i, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ops() -> VariantOperations {
        VariantOperations::new()
    }

    fn bin(op: Operator, left: impl Into<Variant>, right: impl Into<Variant>) -> Result<Variant> {
        ops().binary(op, &left.into(), &right.into())
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(bin(Operator::Add, 2, 3), Ok(Variant::Integer(5)));
        assert_eq!(bin(Operator::Subtract, 2, 3), Ok(Variant::Integer(-1)));
        assert_eq!(bin(Operator::Multiply, 4, 3), Ok(Variant::Integer(12)));
        assert_eq!(bin(Operator::Divide, 7, 2), Ok(Variant::Integer(3)));
        assert_eq!(bin(Operator::Divide, -7, 2), Ok(Variant::Integer(-3)));
        assert_eq!(bin(Operator::Modulo, 7, 3), Ok(Variant::Integer(1)));
        assert_eq!(bin(Operator::Power, 2, 10), Ok(Variant::Integer(1024)));
    }

    #[test]
    fn test_promotion() {
        assert_eq!(bin(Operator::Add, 1, 2.5), Ok(Variant::Double(3.5)));
        assert_eq!(bin(Operator::Add, 1, 2i64), Ok(Variant::Long(3)));
        assert_eq!(bin(Operator::Add, 1i64, 0.5f32), Ok(Variant::Float(1.5)));
        assert_eq!(bin(Operator::Add, true, 1), Ok(Variant::Integer(2)));
        assert_eq!(bin(Operator::Add, Variant::Null, 1), Ok(Variant::Integer(1)));
        assert_eq!(bin(Operator::Power, 2, -1), Ok(Variant::Double(0.5)));
    }

    #[test]
    fn test_overflow_widens() {
        assert_eq!(
            bin(Operator::Multiply, 100_000, 100_000),
            Ok(Variant::Long(10_000_000_000))
        );
        assert_eq!(
            bin(Operator::Add, i32::MAX, 1),
            Ok(Variant::Long(i64::from(i32::MAX) + 1))
        );
        assert_eq!(
            bin(Operator::Add, i64::MAX, 1i64),
            Ok(Variant::Double(i64::MAX as f64 + 1.0))
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(bin(Operator::Divide, 1, 0), Err(Error::DivisionByZero));
        assert_eq!(bin(Operator::Modulo, 1, 0), Err(Error::DivisionByZero));
        assert_eq!(bin(Operator::Divide, 1.0, 0.0), Err(Error::DivisionByZero));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(bin(Operator::Add, "a", "b"), Ok(Variant::string("ab")));
        assert_eq!(bin(Operator::Add, "n=", 5), Ok(Variant::string("n=5")));
        assert_eq!(bin(Operator::Add, 1.5, "x"), Ok(Variant::string("1.5x")));
    }

    #[test]
    fn test_numeric_strings_in_arithmetic() {
        assert_eq!(bin(Operator::Multiply, "3", 2), Ok(Variant::Double(6.0)));
        assert_eq!(bin(Operator::Subtract, "abc", 1), Ok(Variant::Integer(-1)));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(bin(Operator::Less, 5, 10), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::Greater, "5", "10"), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::Equal, 1, 1.0), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::NotEqual, 1, 2i64), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::GreaterEqual, 3.5, 3), Ok(Variant::Boolean(true)));
        assert_eq!(
            bin(Operator::Equal, f64::NAN, f64::NAN),
            Ok(Variant::Boolean(false))
        );
        assert_eq!(
            bin(Operator::Less, f64::NAN, 1.0),
            Ok(Variant::Boolean(false))
        );
    }

    #[test]
    fn test_string_comparison_modes() {
        let ordinal = VariantOperations::new();
        let ignore_case = VariantOperations::with_string_comparison(StringComparison::IgnoreCase);
        let (a, b) = (Variant::string("abc"), Variant::string("ABC"));

        assert_eq!(ordinal.binary(Operator::Equal, &a, &b), Ok(Variant::Boolean(false)));
        assert_eq!(ignore_case.binary(Operator::Equal, &a, &b), Ok(Variant::Boolean(true)));
    }

    #[test]
    fn test_structural_equality() {
        let a = Variant::Array(vec![Variant::Integer(1), Variant::string("x")]);
        let b = Variant::Array(vec![Variant::Double(1.0), Variant::string("x")]);
        assert_eq!(ops().binary(Operator::Equal, &a, &b), Ok(Variant::Boolean(true)));

        let o = Variant::Object(json!({"k": 1}));
        assert_eq!(ops().binary(Operator::Equal, &o, &o), Ok(Variant::Boolean(true)));

        assert!(matches!(
            ops().binary(Operator::Less, &a, &b),
            Err(Error::UnsupportedOperation { operator: "<", .. })
        ));
    }

    #[test]
    fn test_logical() {
        assert_eq!(bin(Operator::And, true, false), Ok(Variant::Boolean(false)));
        assert_eq!(bin(Operator::Or, true, false), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::Xor, true, true), Ok(Variant::Boolean(false)));
        assert_eq!(bin(Operator::And, 1, "true"), Ok(Variant::Boolean(true)));
        assert_eq!(
            ops().unary(Operator::Not, &Variant::Boolean(false)),
            Ok(Variant::Boolean(true))
        );
        assert_eq!(
            bin(Operator::And, true, "maybe"),
            Err(Error::UnsupportedOperation {
                operator: "AND",
                left: VariantType::Boolean,
                right: VariantType::String,
            })
        );
    }

    #[test]
    fn test_unsupported_names_operator_and_types() {
        let err = bin(Operator::Subtract, Variant::Array(vec![]), 1).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
        assert_eq!(
            err.to_string(),
            "Operation '-' is not supported for Array and Integer"
        );
    }

    #[test]
    fn test_negate() {
        assert_eq!(ops().negate(&Variant::Integer(5)), Ok(Variant::Integer(-5)));
        assert_eq!(
            ops().negate(&Variant::Integer(i32::MIN)),
            Ok(Variant::Long(-i64::from(i32::MIN)))
        );
        assert_eq!(ops().negate(&Variant::Null), Ok(Variant::Null));
        assert!(ops().negate(&Variant::Array(vec![])).is_err());
    }

    #[test]
    fn test_shifts() {
        assert_eq!(bin(Operator::ShiftLeft, 1, 4), Ok(Variant::Integer(16)));
        assert_eq!(bin(Operator::ShiftRight, -16, 2), Ok(Variant::Integer(-4)));
        assert_eq!(bin(Operator::ShiftLeft, 1i64, 40), Ok(Variant::Long(1 << 40)));
        assert!(bin(Operator::ShiftLeft, 1.5, 1).is_err());
    }

    #[test]
    fn test_like() {
        assert_eq!(bin(Operator::Like, "Hello", "h%"), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::Like, "Hello", "h_llo"), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::Like, "Hello", "%x%"), Ok(Variant::Boolean(false)));
        assert_eq!(bin(Operator::Like, "a.c", "a.c"), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::Like, "abc", "a.c"), Ok(Variant::Boolean(false)));
        assert_eq!(bin(Operator::NotLike, "abc", "b%"), Ok(Variant::Boolean(true)));
    }

    #[test]
    fn test_in() {
        let list = Variant::Array(vec![Variant::Integer(1), Variant::Integer(2)]);
        assert_eq!(
            ops().binary(Operator::In, &Variant::Double(2.0), &list),
            Ok(Variant::Boolean(true))
        );
        assert_eq!(
            ops().binary(Operator::NotIn, &Variant::Integer(3), &list),
            Ok(Variant::Boolean(true))
        );
        assert_eq!(bin(Operator::In, "ell", "Hello"), Ok(Variant::Boolean(true)));
        assert_eq!(bin(Operator::In, "x", Variant::Null), Ok(Variant::Boolean(false)));
    }

    #[test]
    fn test_element_access() {
        let list = Variant::Array(vec![Variant::string("a"), Variant::string("b")]);
        assert_eq!(
            ops().element(&list, &Variant::Integer(1)),
            Ok(Variant::string("b"))
        );
        assert_eq!(
            ops().element(&list, &Variant::Integer(2)),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            ops().element(&Variant::string("héllo"), &Variant::Integer(1)),
            Ok(Variant::string("é"))
        );

        let object = Variant::Object(json!({"name": "Bob", "tags": [1, 2]}));
        assert_eq!(
            ops().element(&object, &Variant::string("name")),
            Ok(Variant::string("Bob"))
        );
        assert_eq!(
            ops().element(&object, &Variant::string("missing")),
            Ok(Variant::Null)
        );
        assert!(ops().element(&Variant::Integer(5), &Variant::Integer(0)).is_err());
    }

    #[test]
    fn test_is_null() {
        assert_eq!(
            ops().unary(Operator::IsNull, &Variant::Null),
            Ok(Variant::Boolean(true))
        );
        assert_eq!(
            ops().unary(Operator::IsNotNull, &Variant::string("")),
            Ok(Variant::Boolean(true))
        );
    }

    #[test]
    fn test_ternary() {
        let (a, b) = (Variant::Integer(1), Variant::Integer(2));
        assert_eq!(ops().ternary(&Variant::Boolean(true), &a, &b), Ok(a.clone()));
        assert_eq!(ops().ternary(&Variant::Integer(0), &a, &b), Ok(b.clone()));
        assert!(ops()
            .ternary(&Variant::Array(vec![]), &a, &b)
            .is_err());
    }

    #[test]
    fn test_date_arithmetic() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single().unwrap();
        let day = Variant::time_span_millis(86_400_000);

        assert_eq!(
            ops().add(&Variant::DateTime(start), &day),
            Ok(Variant::DateTime(end))
        );
        assert_eq!(
            ops().subtract(&Variant::DateTime(end), &Variant::DateTime(start)),
            Ok(day.clone())
        );
        assert_eq!(
            ops().multiply(&day, &Variant::Integer(2)),
            Ok(Variant::time_span_millis(172_800_000))
        );
        assert_eq!(
            ops().divide(&day, &Variant::Integer(4)),
            Ok(Variant::time_span_millis(21_600_000))
        );
        assert!(ops().add(&Variant::DateTime(start), &Variant::Integer(1)).is_err());
    }

    #[test]
    fn test_apply_by_arity() {
        assert_eq!(
            ops().apply(Operator::Add, &[Variant::Integer(1), Variant::Integer(2)]),
            Ok(Variant::Integer(3))
        );
        assert_eq!(
            ops().apply(Operator::Negate, &[Variant::Integer(1)]),
            Ok(Variant::Integer(-1))
        );
        assert_eq!(
            ops().apply(
                Operator::Ternary,
                &[Variant::Boolean(false), Variant::Integer(1), Variant::Integer(2)]
            ),
            Ok(Variant::Integer(2))
        );
    }

    #[test]
    fn test_operator_arity() {
        assert_eq!(Operator::Negate.arity(), 1);
        assert_eq!(Operator::IsNotNull.arity(), 1);
        assert_eq!(Operator::Like.arity(), 2);
        assert_eq!(Operator::Ternary.arity(), 3);
    }
}
