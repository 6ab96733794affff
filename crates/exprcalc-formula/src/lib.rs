//! # exprcalc-formula
//!
//! Expression engine for exprcalc.
//!
//! This crate provides:
//! - A configurable character-class tokenizer
//! - Expression lexing and parsing (text → postfix [`Program`])
//! - A stack evaluator driven by pluggable variable and function resolvers
//! - The default function library
//!
//! ## Example
//!
//! ```rust
//! use exprcalc_formula::{evaluate, parse, FunctionRegistry, Variables};
//! use exprcalc_core::Variant;
//!
//! let program = parse("price * (1 + tax)").unwrap();
//! assert_eq!(program.to_string(), "price 1 tax + *");
//!
//! let mut vars = Variables::new();
//! vars.set("price", 100);
//! vars.set("tax", 0.25);
//! let result = evaluate(&program, &vars, FunctionRegistry::defaults()).unwrap();
//! assert_eq!(result, Variant::Double(125.0));
//! ```

pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod scanner;
pub mod stack;
pub mod tokenizer;
pub mod variables;

pub use error::{EvalResult, EvaluationError, ParseResult, SyntaxError, SyntaxErrorCode};
pub use evaluator::{evaluate, Evaluator, FunctionResolver, VariableResolver};
pub use functions::{FunctionDef, FunctionImpl, FunctionRegistry};
pub use lexer::{ExpressionToken, ExpressionTokenizer, TokenKind};
pub use parser::{parse, parse_tokens};
pub use program::Program;
pub use stack::CalculationStack;
pub use tokenizer::{Token, TokenType, Tokenizer, TokenizerConfig};
pub use variables::{name_key, Variables};

pub use exprcalc_core;
