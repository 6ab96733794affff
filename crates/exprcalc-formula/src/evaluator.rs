//! Program evaluator
//!
//! Runs a postfix [`Program`] on a fresh [`CalculationStack`]. Names are
//! looked up through the resolver traits, so the same program can be
//! evaluated against any variable source or function library.

use crate::error::{EvalResult, EvaluationError};
use crate::functions::{FunctionDef, FunctionRegistry};
use crate::lexer::{ExpressionToken, TokenKind};
use crate::program::Program;
use crate::stack::CalculationStack;
use crate::variables::Variables;
use exprcalc_core::{Variant, VariantOperations};
use tracing::{debug, error, trace};

/// Source of variable values
pub trait VariableResolver {
    /// Value of the named variable, or `None` if it is not defined
    fn resolve_variable(&self, name: &str) -> Option<Variant>;
}

impl<F> VariableResolver for F
where
    F: Fn(&str) -> Option<Variant>,
{
    fn resolve_variable(&self, name: &str) -> Option<Variant> {
        self(name)
    }
}

impl VariableResolver for Variables {
    fn resolve_variable(&self, name: &str) -> Option<Variant> {
        self.get(name).cloned()
    }
}

/// Source of function definitions
pub trait FunctionResolver {
    /// Function with the given name; implementations should compare names by [`crate::name_key`]
    fn resolve_function(&self, name: &str) -> Option<&FunctionDef>;
}

impl FunctionResolver for FunctionRegistry {
    fn resolve_function(&self, name: &str) -> Option<&FunctionDef> {
        self.get(name)
    }
}

/// Stack machine for compiled programs
///
/// Holds only the operation table; every call to [`Evaluator::evaluate`]
/// uses its own stack.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    operations: VariantOperations,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator that applies operators with `operations`
    pub fn with_operations(operations: VariantOperations) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &VariantOperations {
        &self.operations
    }

    /// Evaluate a program to a single value
    pub fn evaluate(
        &self,
        program: &Program,
        variables: &dyn VariableResolver,
        functions: &dyn FunctionResolver,
    ) -> EvalResult<Variant> {
        let mut stack = CalculationStack::with_capacity(program.len());

        for token in program {
            trace!(instruction = %token.kind, depth = stack.len(), "execute");
            match &token.kind {
                TokenKind::Constant(value) => stack.push(value.clone()),

                TokenKind::Variable(name) => {
                    let value = variables
                        .resolve_variable(name)
                        .ok_or_else(|| EvaluationError::UnknownVariable(name.clone()))?;
                    stack.push(value);
                }

                TokenKind::Function { name, arg_count } => {
                    let function = functions
                        .resolve_function(name)
                        .ok_or_else(|| EvaluationError::UnknownFunction(name.clone()))?;
                    function.check_arity(*arg_count)?;
                    let args = stack
                        .pop_many(*arg_count)
                        .map_err(|e| underflow(e, token, stack.len(), program))?;
                    stack.push(function.call(&args, &self.operations)?);
                }

                TokenKind::Operator(op) => {
                    let operands = stack
                        .pop_many(op.arity())
                        .map_err(|e| underflow(e, token, stack.len(), program))?;
                    stack.push(self.operations.apply(*op, &operands)?);
                }

                other => {
                    return Err(EvaluationError::Internal(format!(
                        "'{}' is not an instruction",
                        other
                    )))
                }
            }
        }

        if stack.len() != 1 {
            error!(
                values = stack.len(),
                program = %program,
                "evaluation did not leave exactly one value"
            );
            return Err(EvaluationError::StackImbalance(stack.len()));
        }

        let result = stack.pop()?;
        debug!(instructions = program.len(), result = %result, "evaluated program");
        Ok(result)
    }
}

fn underflow(
    err: EvaluationError,
    token: &ExpressionToken,
    depth: usize,
    program: &Program,
) -> EvaluationError {
    error!(
        instruction = %token.kind,
        depth,
        program = %program,
        "instruction needs more values than the stack holds"
    );
    err
}

/// Evaluate a program with the default operation table
pub fn evaluate(
    program: &Program,
    variables: &dyn VariableResolver,
    functions: &dyn FunctionResolver,
) -> EvalResult<Variant> {
    Evaluator::new().evaluate(program, variables, functions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use exprcalc_core::{Operator, StringComparison};
    use pretty_assertions::assert_eq;

    fn eval(text: &str) -> EvalResult<Variant> {
        let program = parse(text).unwrap();
        evaluate(&program, &Variables::new(), FunctionRegistry::defaults())
    }

    fn token(kind: TokenKind) -> ExpressionToken {
        ExpressionToken::new(kind, 1, 1)
    }

    #[test]
    fn test_constants_and_operators() {
        assert_eq!(eval("1 + 2 * 3"), Ok(Variant::Integer(7)));
        assert_eq!(eval("(1 + 2) * 3"), Ok(Variant::Integer(9)));
        assert_eq!(eval("'a' + 'b'"), Ok(Variant::string("ab")));
        assert_eq!(eval("true ? 1 : 2"), Ok(Variant::Integer(1)));
    }

    #[test]
    fn test_variables_from_collection() {
        let program = parse("price * qty").unwrap();
        let mut vars = Variables::new();
        vars.set("Price", 2.5);
        vars.set("QTY", 4);
        assert_eq!(
            evaluate(&program, &vars, FunctionRegistry::defaults()),
            Ok(Variant::Double(10.0))
        );
    }

    #[test]
    fn test_variables_from_closure() {
        let program = parse("x + 1").unwrap();
        let resolver = |name: &str| (name == "x").then(|| Variant::Long(41));
        assert_eq!(
            evaluate(&program, &resolver, FunctionRegistry::defaults()),
            Ok(Variant::Long(42))
        );
    }

    #[test]
    fn test_unknown_variable() {
        let err = eval("a + 1").unwrap_err();
        assert_eq!(err, EvaluationError::UnknownVariable("a".to_string()));
        assert_eq!(err.code(), "UNKNOWN_VARIABLE");
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(eval("NOSUCH(1)").unwrap_err().code(), "UNKNOWN_FUNCTION");
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = eval("SIN(1, 2)").unwrap_err();
        assert_eq!(err.code(), "WRONG_ARGUMENT_COUNT");
        assert_eq!(
            err.to_string(),
            "Wrong number of arguments for SIN: expected exactly 1, got 2"
        );
    }

    #[test]
    fn test_function_arguments_keep_source_order() {
        assert_eq!(eval("CHOOSE(1, 'first', 'second')"), Ok(Variant::string("first")));
        assert_eq!(eval("2 + CHOOSE(2, 10, 20) * 2"), Ok(Variant::Integer(42)));
    }

    #[test]
    fn test_custom_function_registry() {
        let mut functions = FunctionRegistry::new();
        functions.register_fn("twice", 1, Some(1), |args, ops| {
            Ok(ops.add(&args[0], &args[0])?)
        });
        let program = parse("TWICE(21)").unwrap();
        assert_eq!(
            evaluate(&program, &Variables::new(), &functions),
            Ok(Variant::Integer(42))
        );

        let program = parse("SIN(0)").unwrap();
        assert_eq!(
            evaluate(&program, &Variables::new(), &functions).unwrap_err().code(),
            "UNKNOWN_FUNCTION"
        );
    }

    #[test]
    fn test_operation_errors_propagate() {
        assert_eq!(eval("1 / 0").unwrap_err().code(), "DIVISION_BY_ZERO");
        assert_eq!(eval("'abc'[5]").unwrap_err().code(), "INDEX_OUT_OF_RANGE");
        assert_eq!(eval("DATE(2020, 1, 1) * 2").unwrap_err().code(), "UNSUPPORTED_OPERATION");
    }

    #[test]
    fn test_configured_operations() {
        let program = parse("'ABC' = 'abc'").unwrap();
        let vars = Variables::new();
        let functions = FunctionRegistry::defaults();

        assert_eq!(
            Evaluator::new().evaluate(&program, &vars, functions),
            Ok(Variant::Boolean(false))
        );
        let ignore_case = Evaluator::with_operations(VariantOperations::with_string_comparison(
            StringComparison::IgnoreCase,
        ));
        assert_eq!(
            ignore_case.evaluate(&program, &vars, functions),
            Ok(Variant::Boolean(true))
        );
    }

    #[test]
    fn test_program_reused() {
        let program = parse("n * n").unwrap();
        let functions = FunctionRegistry::defaults();
        for n in 1..5 {
            let vars: Variables = [("n", n)].into_iter().collect();
            assert_eq!(evaluate(&program, &vars, functions), Ok(Variant::Integer(n * n)));
        }
    }

    #[test]
    fn test_leftover_values_are_reported() {
        let program = Program::from_tokens(vec![
            token(TokenKind::Constant(Variant::Integer(1))),
            token(TokenKind::Constant(Variant::Integer(2))),
        ])
        .unwrap();
        let err = evaluate(&program, &Variables::new(), FunctionRegistry::defaults()).unwrap_err();
        assert_eq!(err, EvaluationError::StackImbalance(2));
        assert_eq!(err.code(), "INTERNAL");
    }

    #[test]
    fn test_empty_program_is_reported() {
        let err = evaluate(&Program::default(), &Variables::new(), FunctionRegistry::defaults())
            .unwrap_err();
        assert_eq!(err, EvaluationError::StackImbalance(0));
    }

    #[test]
    fn test_operator_underflow() {
        let program = Program::from_tokens(vec![
            token(TokenKind::Constant(Variant::Integer(1))),
            token(TokenKind::Operator(Operator::Add)),
        ])
        .unwrap();
        assert_eq!(
            evaluate(&program, &Variables::new(), FunctionRegistry::defaults()),
            Err(EvaluationError::StackUnderflow)
        );
    }

    #[test]
    fn test_function_underflow() {
        let program = Program::from_tokens(vec![
            token(TokenKind::Constant(Variant::Integer(1))),
            token(TokenKind::Function {
                name: "MAX".to_string(),
                arg_count: 2,
            }),
        ])
        .unwrap();
        assert_eq!(
            evaluate(&program, &Variables::new(), FunctionRegistry::defaults()),
            Err(EvaluationError::StackUnderflow)
        );
    }
}
