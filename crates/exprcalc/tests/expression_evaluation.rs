//! End-to-end evaluation of expression text

use exprcalc::prelude::*;
use exprcalc::{evaluate, parse};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn eval(text: &str) -> Variant {
    eval_with(text, &Variables::new())
}

fn eval_with(text: &str, vars: &Variables) -> Variant {
    let program = parse(text).unwrap_or_else(|e| panic!("{}: {}", text, e));
    evaluate(&program, vars, FunctionRegistry::defaults())
        .unwrap_or_else(|e| panic!("{}: {}", text, e))
}

fn eval_err(text: &str) -> EvaluationError {
    let program = parse(text).unwrap();
    evaluate(&program, &Variables::new(), FunctionRegistry::defaults()).unwrap_err()
}

/// Test arithmetic and precedence
#[test]
fn test_arithmetic_precedence() {
    assert_eq!(eval("2+3*4"), Variant::Integer(14));
    assert_eq!(eval("(2+3)*4"), Variant::Integer(20));
    assert_eq!(eval("2*3+4"), Variant::Integer(10));
    assert_eq!(eval("2 ^ 3 ^ 2"), Variant::Integer(512));
    assert_eq!(eval("7 % 3 + 7 / 2"), Variant::Integer(4));
    assert_eq!(eval("1.5 * 2"), Variant::Double(3.0));
}

/// Test unary minus versus binary minus
#[test]
fn test_unary_binary_disambiguation() {
    assert_eq!(eval("-5+3"), Variant::Integer(-2));
    assert_eq!(eval("5 - -3"), Variant::Integer(8));
    assert_eq!(eval("-2 ^ 2"), Variant::Integer(4));
    assert_eq!(eval("+4 - 1"), Variant::Integer(3));
}

/// Test string concatenation
#[test]
fn test_string_concatenation() {
    assert_eq!(eval("\"AB\" + \"CD\""), Variant::string("ABCD"));
    assert_eq!(eval("\"A\" + 1"), Variant::string("A1"));
    assert_eq!(eval("'it''s' + ' ok'"), Variant::string("it's ok"));
}

/// Test comparisons between mixed types
#[test]
fn test_comparison_coercion() {
    assert_eq!(eval("1 = 1.0"), Variant::Boolean(true));
    assert_eq!(eval("\"5\" > \"10\""), Variant::Boolean(true));
    assert_eq!(eval("5 > 10"), Variant::Boolean(false));
    assert_eq!(eval("3 <> 4"), Variant::Boolean(true));
    assert_eq!(eval("2 <= 2 AND 2 >= 2"), Variant::Boolean(true));
}

/// Test logical and keyword operators
#[test]
fn test_logical_operators() {
    assert_eq!(eval("1 < 2 AND NOT (3 > 4)"), Variant::Boolean(true));
    assert_eq!(eval("TRUE XOR TRUE"), Variant::Boolean(false));
    assert_eq!(eval("false or true"), Variant::Boolean(true));
    assert_eq!(eval("1 << 4"), Variant::Integer(16));
    assert_eq!(eval("256 >> 2"), Variant::Integer(64));
}

/// Test LIKE, IN and IS NULL
#[test]
fn test_pattern_and_membership() {
    assert_eq!(eval("'Hello' LIKE 'h_llo%'"), Variant::Boolean(true));
    assert_eq!(eval("'Hello' NOT LIKE 'x%'"), Variant::Boolean(true));
    assert_eq!(eval("'ell' IN 'Hello'"), Variant::Boolean(true));
    assert_eq!(eval("NULL IS NULL"), Variant::Boolean(true));
    assert_eq!(eval("1 IS NOT NULL"), Variant::Boolean(true));

    let mut vars = Variables::new();
    vars.set("ids", vec![Variant::Integer(1), Variant::Integer(2), Variant::Integer(3)]);
    vars.set("missing", Variant::Null);
    assert_eq!(eval_with("2 IN ids", &vars), Variant::Boolean(true));
    assert_eq!(eval_with("5 NOT IN ids", &vars), Variant::Boolean(true));
    assert_eq!(eval_with("missing IS NULL", &vars), Variant::Boolean(true));
}

/// Test element access on arrays, strings and objects
#[test]
fn test_element_access() {
    let mut vars = Variables::new();
    vars.set("items", vec![Variant::string("a"), Variant::string("b")]);
    vars.set(
        "user",
        serde_json::json!({ "name": "Ada", "tags": ["x", "y"] }),
    );

    assert_eq!(eval_with("items[1]", &vars), Variant::string("b"));
    assert_eq!(eval_with("items[0] + items[1]", &vars), Variant::string("ab"));
    assert_eq!(eval("'abc'[2]"), Variant::string("c"));
    assert_eq!(eval_with("user['name']", &vars), Variant::string("Ada"));
    assert_eq!(eval_with("user['tags'][1]", &vars), Variant::string("y"));
    assert_eq!(eval_with("user['nope']", &vars), Variant::Null);
    assert_eq!(eval_err("'abc'[3]").code(), "INDEX_OUT_OF_RANGE");
}

/// Test the ternary operator
#[test]
fn test_ternary() {
    assert_eq!(eval("1 > 0 ? 'yes' : 'no'"), Variant::string("yes"));
    assert_eq!(eval("1 < 0 ? 'yes' : 1 = 1 ? 'maybe' : 'no'"), Variant::string("maybe"));
}

/// Test date and time span arithmetic
#[test]
fn test_date_arithmetic() {
    assert_eq!(
        eval("DATE(2024, 1, 31) + TIMESPAN(1, 0, 0, 0)"),
        eval("DATE(2024, 2, 1)")
    );
    assert_eq!(
        eval("DATE(2024, 3, 1) - DATE(2024, 2, 1)"),
        Variant::time_span_millis(29 * 24 * 60 * 60 * 1000)
    );
    assert_eq!(eval("DATE(2024, 1, 1) < DATE(2024, 1, 2)"), Variant::Boolean(true));
    assert_eq!(eval("DAYOFWEEK(DATE(2024, 1, 7))"), Variant::Integer(0));
    assert_eq!(eval("TICKS(DATE(1970, 1, 1, 0, 0, 1))"), Variant::Long(1000));
    assert_eq!(
        eval("TIMESPAN('01:00:00') * 2"),
        Variant::time_span_millis(2 * 60 * 60 * 1000)
    );
}

/// Test the default function library
#[test]
fn test_default_functions() {
    assert_eq!(eval("SUM(1, 2, 3, 4, 5)"), Variant::Integer(15));
    assert_eq!(eval("max(3, 9, 4)"), Variant::Integer(9));
    assert_eq!(eval("Min(3, 9, 4)"), Variant::Integer(3));
    assert_eq!(eval("ABS(-4)"), Variant::Integer(4));
    assert_eq!(eval("ROUND(2.5)"), Variant::Double(3.0));
    assert_eq!(eval("ROUND(-2.5)"), Variant::Double(-3.0));
    assert_eq!(eval("SQRT(16)"), Variant::Double(4.0));
    assert_eq!(eval("IF(1 > 0, 'Yes', 'No')"), Variant::string("Yes"));
    assert_eq!(eval("CHOOSE(3, 'a', 'b', 'c')"), Variant::string("c"));
    assert_eq!(eval("EMPTY('')"), Variant::Boolean(true));
    assert_eq!(eval("NULL()"), Variant::Null);
    assert_eq!(eval("CONTAINS('haystack', 'st')"), Variant::Boolean(true));
}

/// Test that conversions between values never fail
#[test]
fn test_lenient_conversions() {
    assert_eq!(eval("'3' * 2"), Variant::Double(6.0));
    assert_eq!(eval("'abc' * 2"), Variant::Integer(0));
    assert_eq!(eval("'nan' * 1"), Variant::Integer(0));
    assert_eq!(eval("'Infinity' - 1"), Variant::Integer(-1));
    assert_eq!(eval("' 1e2 ' * 1"), Variant::Double(100.0));
    assert_eq!(eval("NULL + 1"), Variant::Integer(1));
    assert_eq!(eval("TRUE + 1"), Variant::Integer(2));
    assert_eq!(eval("2147483647 + 1"), Variant::Long(2_147_483_648));
}

/// Test that name lookups are strict
#[test]
fn test_strict_lookups() {
    let err = eval_err("x + 1");
    assert_eq!(err, EvaluationError::UnknownVariable("x".into()));
    assert_eq!(eval_err("nosuch()").code(), "UNKNOWN_FUNCTION");
}

/// Test that a 2-argument function called with 1 argument is an error
#[test]
fn test_function_arity() {
    let mut functions = FunctionRegistry::new();
    functions.register(FunctionDef::fixed("pair", 2, |args, _ops| {
        Ok(Variant::Array(args.to_vec()))
    }));

    let program = parse("PAIR(1)").unwrap();
    let err = evaluate(&program, &Variables::new(), &functions).unwrap_err();
    assert_eq!(err.code(), "WRONG_ARGUMENT_COUNT");

    let program = parse("PAIR(1, 2)").unwrap();
    assert_eq!(
        evaluate(&program, &Variables::new(), &functions),
        Ok(Variant::Array(vec![Variant::Integer(1), Variant::Integer(2)]))
    );
}

/// Test that one program can be evaluated from several threads
#[test]
fn test_shared_program_across_threads() {
    let program = parse("n * 2").unwrap();
    std::thread::scope(|scope| {
        for n in 0..4 {
            let program = &program;
            scope.spawn(move || {
                let vars: Variables = [("n", n)].into_iter().collect();
                let result = evaluate(program, &vars, FunctionRegistry::defaults()).unwrap();
                assert_eq!(result, Variant::Integer(n * 2));
            });
        }
    });
}

/// Test that deeply nested input is parsed and evaluated without recursion
#[test]
fn test_deeply_nested_expressions() {
    let depth = 10_000;

    let text = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&text), Variant::Integer(1));

    assert_eq!(eval(&format!("{}1", "-".repeat(depth))), Variant::Integer(1));
    assert_eq!(eval(&format!("{}1", "-".repeat(depth + 1))), Variant::Integer(-1));

    let text = format!("{}1{}", "ABS(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval(&text), Variant::Integer(1));
}

proptest! {
    #[test]
    fn prop_integer_sum_matches(a in -10_000i32..10_000, b in -10_000i32..10_000) {
        let mut vars = Variables::new();
        vars.set("a", a);
        vars.set("b", b);
        prop_assert_eq!(eval_with("a + b", &vars), Variant::Integer(a + b));
    }

    #[test]
    fn prop_parse_is_deterministic(text in "[a-z0-9 +*/()<>=,'-]{0,32}") {
        match (parse(&text), parse(&text)) {
            (Ok(first), Ok(second)) => prop_assert_eq!(first.to_string(), second.to_string()),
            (Err(first), Err(second)) => prop_assert_eq!(first, second),
            _ => prop_assert!(false, "parse of {:?} was not deterministic", text),
        }
    }
}
