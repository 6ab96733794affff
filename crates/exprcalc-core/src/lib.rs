//! # exprcalc-core
//!
//! Core value types for the exprcalc expression engine.
//!
//! This crate provides:
//! - [`Variant`]: the dynamically-typed operand and result value
//! - Lenient conversions between variant types
//! - [`VariantOperations`]: the operator table used by the evaluator
//! - [`Error`]: failures raised by operators

pub mod error;
pub mod variant;

pub use error::{Error, Result};
pub use variant::{
    parse_decimal, Operator, StringComparison, Variant, VariantOperations, VariantType,
};
