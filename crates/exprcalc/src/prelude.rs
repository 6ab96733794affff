//! Prelude module - common imports for exprcalc users
//!
//! ```rust
//! use exprcalc::prelude::*;
//! ```

pub use crate::{
    // Calculator
    CalcError,
    CalcResult,
    CalculatorOptions,
    ExpressionCalculator,

    // Values
    StringComparison,
    Variant,
    VariantType,

    // Engine
    EvaluationError,
    FunctionDef,
    FunctionRegistry,
    FunctionResolver,
    Program,
    SyntaxError,
    VariableResolver,
    Variables,
};
