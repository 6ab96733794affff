//! # exprcalc
//!
//! An embeddable expression calculator.
//!
//! Expressions are compiled once into a postfix program and can then be
//! evaluated many times against different variable values. Values are
//! dynamically typed [`Variant`]s: numbers, strings, booleans, dates, time
//! spans, arrays and JSON objects.
//!
//! ## Features
//!
//! - Arithmetic, comparison, logical, bit-shift and pattern operators
//! - `LIKE`, `IN`, `IS NULL`, element access and the ternary operator
//! - Case-insensitive variables and functions
//! - A default function library (math, logical and date functions)
//! - Custom functions and variable sources
//!
//! ## Example
//!
//! ```rust
//! use exprcalc::prelude::*;
//!
//! let mut calc = ExpressionCalculator::new();
//! calc.set_expression("IF(qty > 10, price * qty * 0.9, price * qty)").unwrap();
//! assert_eq!(calc.variable_names(), vec!["qty", "price"]);
//!
//! calc.variables_mut().set("price", 2);
//! calc.variables_mut().set("qty", 20);
//! assert_eq!(calc.evaluate().unwrap(), Variant::Double(36.0));
//! ```

pub mod calculator;
pub mod prelude;

pub use calculator::{CalcError, CalcResult, CalculatorOptions, ExpressionCalculator};

// Re-export core types
pub use exprcalc_core::{
    parse_decimal, Error, Operator, Result, StringComparison, Variant, VariantOperations,
    VariantType,
};

// Re-export engine types
pub use exprcalc_formula::{
    evaluate, parse, parse_tokens, CalculationStack, EvalResult, EvaluationError, Evaluator,
    ExpressionToken, ExpressionTokenizer, FunctionDef, FunctionRegistry, FunctionResolver,
    ParseResult, Program, SyntaxError, SyntaxErrorCode, TokenKind, Tokenizer, TokenizerConfig,
    VariableResolver, Variables,
};
