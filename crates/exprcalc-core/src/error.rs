//! Error types for exprcalc-core

use crate::variant::VariantType;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by variant operators
///
/// Conversions never fail; these are only produced when an operator cannot
/// proceed with the operands it was given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Binary operator applied to an unsupported pair of types
    #[error("Operation '{operator}' is not supported for {left} and {right}")]
    UnsupportedOperation {
        operator: &'static str,
        left: VariantType,
        right: VariantType,
    },

    /// Unary operator applied to an unsupported type
    #[error("Operation '{operator}' is not supported for {operand}")]
    UnsupportedUnaryOperation {
        operator: &'static str,
        operand: VariantType,
    },

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Element access outside of the collection bounds
    #[error("Index {index} is out of range (length: {len})")]
    IndexOutOfRange { index: i64, len: usize },

    /// Invalid LIKE pattern
    #[error("Invalid pattern '{0}'")]
    InvalidPattern(String),
}

impl Error {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedOperation { .. } | Error::UnsupportedUnaryOperation { .. } => {
                "UNSUPPORTED_OPERATION"
            }
            Error::DivisionByZero => "DIVISION_BY_ZERO",
            Error::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            Error::InvalidPattern(_) => "BAD_ARGUMENT",
        }
    }
}
