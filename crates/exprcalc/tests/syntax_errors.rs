//! Syntax error codes and positions

use exprcalc::prelude::*;
use exprcalc::{parse, SyntaxErrorCode};
use pretty_assertions::assert_eq;

fn syntax_error(text: &str) -> SyntaxError {
    match parse(text) {
        Ok(program) => panic!("{:?} parsed as {}", text, program),
        Err(e) => e,
    }
}

#[test]
fn test_missing_close_parenthesis() {
    let err = syntax_error("(1+2");
    assert_eq!(err.code(), "MISSED_CLOSE_PARENTHESIS");
    assert_eq!((err.line, err.column), (1, 5));
    assert_eq!(err.to_string(), format!("{} at line 1, column 5", err.message));
}

#[test]
fn test_missing_close_square_bracket() {
    assert_eq!(syntax_error("a[1 + 2").code, SyntaxErrorCode::MissedCloseSquareBracket);
}

#[test]
fn test_unexpected_end() {
    assert_eq!(syntax_error("").code, SyntaxErrorCode::UnexpectedEnd);
    assert_eq!(syntax_error("2 *").code, SyntaxErrorCode::UnexpectedEnd);
}

#[test]
fn test_error_near_token() {
    let err = syntax_error("1 + * 2");
    assert_eq!(err.code, SyntaxErrorCode::ErrorNear);
    assert_eq!((err.line, err.column), (1, 5));
}

#[test]
fn test_unknown_symbol() {
    let err = syntax_error("a # b");
    assert_eq!(err.code(), "UNKNOWN_SYMBOL");
    assert_eq!(err.column, 3);
}

#[test]
fn test_error_on_second_line() {
    let err = syntax_error("1 +\r\n  (2");
    assert_eq!(err.code, SyntaxErrorCode::MissedCloseParenthesis);
    assert_eq!((err.line, err.column), (2, 5));
}

#[test]
fn test_calculator_reports_syntax_errors() {
    let mut calc = ExpressionCalculator::new();
    let err = calc.set_expression("max(1, 2").unwrap_err();
    assert!(matches!(err, CalcError::Syntax(_)));
    assert_eq!(err.code(), "MISSED_CLOSE_PARENTHESIS");
}
