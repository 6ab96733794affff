//! Expression tokenizer
//!
//! Turns generic tokens into expression tokens: literals become constants,
//! keywords become operators, and words become variable or function names.

use crate::tokenizer::{Token, TokenType, Tokenizer, TokenizerConfig};
use exprcalc_core::{Operator, Variant};
use std::fmt;

/// What an [`ExpressionToken`] stands for
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Constant(Variant),
    Variable(String),
    /// `arg_count` is filled in by the parser
    Function {
        name: String,
        arg_count: usize,
    },
    Operator(Operator),
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Question,
    Colon,
    Unknown(String),
    Eof,
}

/// A token of an expression with the position where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionToken {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl ExpressionToken {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    /// Whether this token can end an operand (so a following `-` is binary)
    pub fn ends_operand(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Constant(_)
                | TokenKind::Variable(_)
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::Operator(Operator::IsNull | Operator::IsNotNull)
        )
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Constant(Variant::String(s)) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            TokenKind::Constant(Variant::Null) => f.write_str("NULL"),
            TokenKind::Constant(Variant::Boolean(true)) => f.write_str("TRUE"),
            TokenKind::Constant(Variant::Boolean(false)) => f.write_str("FALSE"),
            TokenKind::Constant(value) => write!(f, "{}", value),
            TokenKind::Variable(name) => f.write_str(name),
            TokenKind::Function { name, .. } => f.write_str(name),
            TokenKind::Operator(op) => f.write_str(op.symbol()),
            TokenKind::LeftParen => f.write_str("("),
            TokenKind::RightParen => f.write_str(")"),
            TokenKind::LeftBracket => f.write_str("["),
            TokenKind::RightBracket => f.write_str("]"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Question => f.write_str("?"),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Unknown(text) => f.write_str(text),
            TokenKind::Eof => f.write_str("end of expression"),
        }
    }
}

/// Tokenizer for expression text
#[derive(Debug, Clone)]
pub struct ExpressionTokenizer {
    tokenizer: Tokenizer,
}

impl Default for ExpressionTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionTokenizer {
    pub fn new() -> Self {
        Self::with_config(TokenizerConfig::expression())
    }

    /// Use a custom generic tokenizer configuration
    ///
    /// Whitespace, comments and `Eof` are handled here regardless of the
    /// skip flags.
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config),
        }
    }

    /// Tokenize `text`; the result always ends with an `Eof` token
    pub fn tokenize(&self, text: &str) -> Vec<ExpressionToken> {
        let raw: Vec<Token> = self
            .tokenizer
            .tokens(text)
            .filter(|t| !matches!(t.token_type, TokenType::Whitespace | TokenType::Comment))
            .collect();

        let mut out: Vec<ExpressionToken> = Vec::with_capacity(raw.len() + 1);
        let mut i = 0;
        while i < raw.len() {
            let token = &raw[i];
            let next = raw.get(i + 1);
            let after_operand = out.last().map_or(false, ExpressionToken::ends_operand);
            i += 1;

            let kind = match token.token_type {
                TokenType::Eof => TokenKind::Eof,
                TokenType::Integer => integer_constant(&token.value),
                TokenType::Float => match token.value.parse::<f64>() {
                    Ok(n) => TokenKind::Constant(Variant::Double(n)),
                    Err(_) => TokenKind::Unknown(token.value.clone()),
                },
                TokenType::HexDecimal => hex_constant(&token.value),
                TokenType::Quoted => TokenKind::Constant(Variant::String(token.value.clone())),
                TokenType::Word => {
                    let (kind, consumed) = word(token, next, raw.get(i + 1));
                    i += consumed;
                    kind
                }
                TokenType::Symbol => match symbol(&token.value, after_operand) {
                    Some(kind) => kind,
                    // Unary plus
                    None => continue,
                },
                TokenType::Unknown => TokenKind::Unknown(token.value.clone()),
                TokenType::Whitespace | TokenType::Comment => continue,
            };

            out.push(ExpressionToken::new(kind, token.line, token.column));
        }

        if !out.last().map_or(false, ExpressionToken::is_eof) {
            let (line, column) = raw.last().map_or((1, 1), |t| (t.line, t.column));
            out.push(ExpressionToken::new(TokenKind::Eof, line, column));
        }
        out
    }
}

fn integer_constant(text: &str) -> TokenKind {
    if let Ok(n) = text.parse::<i32>() {
        TokenKind::Constant(Variant::Integer(n))
    } else if let Ok(n) = text.parse::<i64>() {
        TokenKind::Constant(Variant::Long(n))
    } else if let Ok(n) = text.parse::<f64>() {
        TokenKind::Constant(Variant::Double(n))
    } else {
        TokenKind::Unknown(text.to_string())
    }
}

fn hex_constant(text: &str) -> TokenKind {
    let digits = &text[2..];
    match i64::from_str_radix(digits, 16) {
        Ok(n) => match i32::try_from(n) {
            Ok(small) => TokenKind::Constant(Variant::Integer(small)),
            Err(_) => TokenKind::Constant(Variant::Long(n)),
        },
        // Too large for a long: widen to a double, like decimal literals
        Err(_) => digits
            .chars()
            .try_fold(0.0f64, |acc, c| c.to_digit(16).map(|d| acc * 16.0 + f64::from(d)))
            .map_or_else(
                || TokenKind::Unknown(text.to_string()),
                |n| TokenKind::Constant(Variant::Double(n)),
            ),
    }
}

fn is_word(token: Option<&Token>, keyword: &str) -> bool {
    token.map_or(false, |t| {
        t.token_type == TokenType::Word && t.value.eq_ignore_ascii_case(keyword)
    })
}

/// Classify a word; returns the kind and how many following tokens it used
fn word(token: &Token, next: Option<&Token>, after_next: Option<&Token>) -> (TokenKind, usize) {
    let upper = token.value.to_ascii_uppercase();
    let operator = |op| (TokenKind::Operator(op), 0);

    match upper.as_str() {
        "AND" => operator(Operator::And),
        "OR" => operator(Operator::Or),
        "XOR" => operator(Operator::Xor),
        "LIKE" => operator(Operator::Like),
        "IN" => operator(Operator::In),
        "NOT" if is_word(next, "LIKE") => (TokenKind::Operator(Operator::NotLike), 1),
        "NOT" if is_word(next, "IN") => (TokenKind::Operator(Operator::NotIn), 1),
        "NOT" => operator(Operator::Not),
        "IS" if is_word(next, "NULL") => (TokenKind::Operator(Operator::IsNull), 1),
        "IS" if is_word(next, "NOT") && is_word(after_next, "NULL") => {
            (TokenKind::Operator(Operator::IsNotNull), 2)
        }
        "IS" => (TokenKind::Unknown(token.value.clone()), 0),
        _ if next.map_or(false, |t| t.is_symbol("(")) => (
            TokenKind::Function {
                name: token.value.clone(),
                arg_count: 0,
            },
            0,
        ),
        "TRUE" => (TokenKind::Constant(Variant::Boolean(true)), 0),
        "FALSE" => (TokenKind::Constant(Variant::Boolean(false)), 0),
        "NULL" => (TokenKind::Constant(Variant::Null), 0),
        _ => (TokenKind::Variable(token.value.clone()), 0),
    }
}

/// Map a symbol; `None` means the token is dropped (unary plus)
fn symbol(text: &str, after_operand: bool) -> Option<TokenKind> {
    let op = |op| Some(TokenKind::Operator(op));
    match text {
        "(" => Some(TokenKind::LeftParen),
        ")" => Some(TokenKind::RightParen),
        "[" => Some(TokenKind::LeftBracket),
        "]" => Some(TokenKind::RightBracket),
        "," => Some(TokenKind::Comma),
        "?" => Some(TokenKind::Question),
        ":" => Some(TokenKind::Colon),
        "+" if after_operand => op(Operator::Add),
        "+" => None,
        "-" if after_operand => op(Operator::Subtract),
        "-" => op(Operator::Negate),
        "*" => op(Operator::Multiply),
        "/" => op(Operator::Divide),
        "%" => op(Operator::Modulo),
        "^" => op(Operator::Power),
        "=" | "==" => op(Operator::Equal),
        "<>" | "!=" => op(Operator::NotEqual),
        "<" => op(Operator::Less),
        "<=" => op(Operator::LessEqual),
        ">" => op(Operator::Greater),
        ">=" => op(Operator::GreaterEqual),
        "<<" => op(Operator::ShiftLeft),
        ">>" => op(Operator::ShiftRight),
        "&&" => op(Operator::And),
        "||" => op(Operator::Or),
        "!" => op(Operator::Not),
        other => Some(TokenKind::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<TokenKind> {
        ExpressionTokenizer::new()
            .tokenize(text)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn constant(value: impl Into<Variant>) -> TokenKind {
        TokenKind::Constant(value.into())
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(
            kinds("1 3000000000 1e400 2.5 0xFF 0xFFFFFFFF"),
            vec![
                constant(1),
                constant(3_000_000_000i64),
                constant(f64::INFINITY),
                constant(2.5),
                constant(255),
                constant(0xFFFF_FFFFi64),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integer_too_large_for_long_is_double() {
        assert_eq!(
            kinds("99999999999999999999"),
            vec![constant(1e20), TokenKind::Eof]
        );
    }

    #[test]
    fn test_hex_too_large_for_long_is_double() {
        assert_eq!(
            kinds("0x8000000000000000 0x10000000000000000"),
            vec![
                constant(9_223_372_036_854_775_808.0),
                constant(18_446_744_073_709_551_616.0),
                TokenKind::Eof,
            ]
        );
        let huge = format!("0x1{}", "0".repeat(300));
        assert_eq!(kinds(&huge), vec![constant(f64::INFINITY), TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("true And False or null xor NOT x"),
            vec![
                constant(true),
                TokenKind::Operator(Operator::And),
                constant(false),
                TokenKind::Operator(Operator::Or),
                TokenKind::Constant(Variant::Null),
                TokenKind::Operator(Operator::Xor),
                TokenKind::Operator(Operator::Not),
                TokenKind::Variable("x".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_combined_keywords() {
        assert_eq!(
            kinds("a not like b not in c is null is not null"),
            vec![
                TokenKind::Variable("a".into()),
                TokenKind::Operator(Operator::NotLike),
                TokenKind::Variable("b".into()),
                TokenKind::Operator(Operator::NotIn),
                TokenKind::Variable("c".into()),
                TokenKind::Operator(Operator::IsNull),
                TokenKind::Operator(Operator::IsNotNull),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_function_vs_variable() {
        assert_eq!(
            kinds("max(a, b.c) null()"),
            vec![
                TokenKind::Function {
                    name: "max".into(),
                    arg_count: 0
                },
                TokenKind::LeftParen,
                TokenKind::Variable("a".into()),
                TokenKind::Comma,
                TokenKind::Variable("b.c".into()),
                TokenKind::RightParen,
                TokenKind::Function {
                    name: "null".into(),
                    arg_count: 0
                },
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unary_and_binary_minus() {
        assert_eq!(
            kinds("-a - -1 + +2"),
            vec![
                TokenKind::Operator(Operator::Negate),
                TokenKind::Variable("a".into()),
                TokenKind::Operator(Operator::Subtract),
                TokenKind::Operator(Operator::Negate),
                constant(1),
                TokenKind::Operator(Operator::Add),
                constant(2),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("(1)-x[0]-2"),
            vec![
                TokenKind::LeftParen,
                constant(1),
                TokenKind::RightParen,
                TokenKind::Operator(Operator::Subtract),
                TokenKind::Variable("x".into()),
                TokenKind::LeftBracket,
                constant(0),
                TokenKind::RightBracket,
                TokenKind::Operator(Operator::Subtract),
                constant(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_symbol_aliases() {
        assert_eq!(
            kinds("== != && || !"),
            vec![
                TokenKind::Operator(Operator::Equal),
                TokenKind::Operator(Operator::NotEqual),
                TokenKind::Operator(Operator::And),
                TokenKind::Operator(Operator::Or),
                TokenKind::Operator(Operator::Not),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unknown_symbols() {
        assert_eq!(
            kinds("1 # 2"),
            vec![
                constant(1),
                TokenKind::Unknown("#".into()),
                constant(2),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("a is b"),
            vec![
                TokenKind::Variable("a".into()),
                TokenKind::Unknown("is".into()),
                TokenKind::Variable("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_eof_position() {
        let tokens = ExpressionTokenizer::new().tokenize("(1+2");
        let eof = tokens.last().unwrap();
        assert!(eof.is_eof());
        assert_eq!((eof.line, eof.column), (1, 5));
    }
}
