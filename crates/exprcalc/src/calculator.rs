//! Expression calculator
//!
//! Bundles an expression, its compiled program, a default set of variables
//! and a function library behind one object.
//!
//! # Example
//!
//! ```rust
//! use exprcalc::prelude::*;
//!
//! let mut calc = ExpressionCalculator::new();
//! calc.set_expression("name LIKE 'a%'").unwrap();
//!
//! let resolver = |name: &str| name.eq_ignore_ascii_case("name").then(|| Variant::from("Alice"));
//! assert_eq!(calc.evaluate_with(&resolver).unwrap(), Variant::Boolean(true));
//! ```

use crate::{
    parse, EvaluationError, Evaluator, FunctionRegistry, Program, StringComparison, SyntaxError,
    Variant, VariantOperations, VariableResolver, Variables,
};
use thiserror::Error;
use tracing::debug;

/// Any error the calculator can report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl CalcError {
    /// Stable error code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            CalcError::Syntax(e) => e.code(),
            CalcError::Evaluation(e) => e.code(),
        }
    }
}

/// Result type for calculator operations
pub type CalcResult<T> = std::result::Result<T, CalcError>;

/// Options for an [`ExpressionCalculator`]
#[derive(Debug, Clone)]
pub struct CalculatorOptions {
    /// How string operands are compared (default: ordinal)
    pub string_comparison: StringComparison,
    /// Start with the default function library (default: true)
    pub builtin_functions: bool,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            string_comparison: StringComparison::Ordinal,
            builtin_functions: true,
        }
    }
}

/// A compiled expression with its own variables and functions
#[derive(Debug, Clone)]
pub struct ExpressionCalculator {
    expression: String,
    program: Program,
    variables: Variables,
    functions: FunctionRegistry,
    evaluator: Evaluator,
    options: CalculatorOptions,
}

impl Default for ExpressionCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionCalculator {
    /// Create a calculator with default options
    pub fn new() -> Self {
        Self::with_options(CalculatorOptions::default())
    }

    /// Create a calculator with custom options
    pub fn with_options(options: CalculatorOptions) -> Self {
        let functions = if options.builtin_functions {
            FunctionRegistry::with_defaults()
        } else {
            FunctionRegistry::new()
        };
        let evaluator = Evaluator::with_operations(VariantOperations::with_string_comparison(
            options.string_comparison,
        ));

        Self {
            expression: String::new(),
            program: Program::default(),
            variables: Variables::new(),
            functions,
            evaluator,
            options,
        }
    }

    /// Compile and store an expression
    ///
    /// On a syntax error the previous expression and program are kept.
    pub fn set_expression(&mut self, expression: impl Into<String>) -> CalcResult<()> {
        let expression = expression.into();
        let program = parse(&expression)?;
        debug!(expression = %expression, program = %program, "expression compiled");
        self.expression = expression;
        self.program = program;
        Ok(())
    }

    /// The current expression text (empty until one is set)
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The compiled program of the current expression
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Variables referenced by the current expression, in order of first use
    pub fn variable_names(&self) -> Vec<String> {
        self.program.variable_names()
    }

    pub fn options(&self) -> &CalculatorOptions {
        &self.options
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Evaluate the current program against the calculator's own variables
    pub fn evaluate(&self) -> CalcResult<Variant> {
        self.evaluate_with(&self.variables)
    }

    /// Evaluate the current program against another variable source
    ///
    /// Evaluating before any expression was set fails with an `INTERNAL`
    /// error, since an empty program produces no value.
    pub fn evaluate_with(&self, variables: &dyn VariableResolver) -> CalcResult<Variant> {
        Ok(self
            .evaluator
            .evaluate(&self.program, variables, &self.functions)?)
    }
}
