//! Formula error types

use std::fmt;
use thiserror::Error;

/// Result type for parsing
pub type ParseResult<T> = std::result::Result<T, SyntaxError>;

/// Result type for evaluation
pub type EvalResult<T> = std::result::Result<T, EvaluationError>;

/// Stable classification of syntax errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorCode {
    Unknown,
    Internal,
    UnexpectedEnd,
    ErrorNear,
    ErrorAt,
    UnknownSymbol,
    MissedCloseParenthesis,
    MissedCloseSquareBracket,
}

impl SyntaxErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxErrorCode::Unknown => "UNKNOWN",
            SyntaxErrorCode::Internal => "INTERNAL",
            SyntaxErrorCode::UnexpectedEnd => "UNEXPECTED_END",
            SyntaxErrorCode::ErrorNear => "ERROR_NEAR",
            SyntaxErrorCode::ErrorAt => "ERROR_AT",
            SyntaxErrorCode::UnknownSymbol => "UNKNOWN_SYMBOL",
            SyntaxErrorCode::MissedCloseParenthesis => "MISSED_CLOSE_PARENTHESIS",
            SyntaxErrorCode::MissedCloseSquareBracket => "MISSED_CLOSE_SQUARE_BRACKET",
        }
    }
}

impl fmt::Display for SyntaxErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse failure with the position of the offending token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    pub code: SyntaxErrorCode,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(code: SyntaxErrorCode, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            code,
            message: message.into(),
            line,
            column,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        self.code.as_str()
    }
}

/// Errors that can occur while evaluating a program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The variable resolver has no value for this name
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// The function resolver has no function with this name
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Operator failure
    #[error(transparent)]
    Operation(#[from] exprcalc_core::Error),

    /// Pop from an empty stack
    #[error("Stack underflow")]
    StackUnderflow,

    /// The program left the wrong number of values on the stack
    #[error("Expected exactly one result, found {0} values on the stack")]
    StackImbalance(usize),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EvaluationError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationError::UnknownVariable(_) => "UNKNOWN_VARIABLE",
            EvaluationError::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            EvaluationError::ArgumentCount { .. } => "WRONG_ARGUMENT_COUNT",
            EvaluationError::Argument(_) => "BAD_ARGUMENT",
            EvaluationError::Operation(e) => e.code(),
            EvaluationError::StackUnderflow
            | EvaluationError::StackImbalance(_)
            | EvaluationError::Internal(_) => "INTERNAL",
        }
    }
}
