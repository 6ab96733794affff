//! Compiled postfix programs

use crate::error::{SyntaxError, SyntaxErrorCode};
use crate::lexer::{ExpressionToken, TokenKind};
use crate::variables::name_key;
use ahash::AHashSet;
use exprcalc_core::Operator;
use std::fmt;
use std::str::FromStr;

/// A parsed expression as a postfix (RPN) instruction list
///
/// Only `Constant`, `Variable`, `Function` and `Operator` tokens appear in a
/// program. Programs hold no evaluation state and can be evaluated any
/// number of times, from any thread.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    tokens: Vec<ExpressionToken>,
}

impl Program {
    pub(crate) fn new(tokens: Vec<ExpressionToken>) -> Self {
        Self { tokens }
    }

    /// Build a program from an instruction list
    ///
    /// Punctuation, `Unknown` and `Eof` tokens are rejected. The list is not
    /// checked for stack balance; the evaluator reports that.
    pub fn from_tokens(tokens: Vec<ExpressionToken>) -> Result<Self, SyntaxError> {
        for token in &tokens {
            let valid = matches!(
                token.kind,
                TokenKind::Constant(_)
                    | TokenKind::Variable(_)
                    | TokenKind::Function { .. }
                    | TokenKind::Operator(_)
            );
            if !valid {
                return Err(SyntaxError::new(
                    SyntaxErrorCode::Internal,
                    format!("'{}' is not a valid instruction", token.kind),
                    token.line,
                    token.column,
                ));
            }
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[ExpressionToken] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExpressionToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Distinct variable names in order of first use (compared case-insensitively)
    pub fn variable_names(&self) -> Vec<String> {
        self.distinct_names(|kind| match kind {
            TokenKind::Variable(name) => Some(name),
            _ => None,
        })
    }

    /// Distinct function names in order of first use (compared case-insensitively)
    pub fn function_names(&self) -> Vec<String> {
        self.distinct_names(|kind| match kind {
            TokenKind::Function { name, .. } => Some(name),
            _ => None,
        })
    }

    fn distinct_names<'a>(&'a self, pick: impl Fn(&'a TokenKind) -> Option<&'a String>) -> Vec<String> {
        let mut seen = AHashSet::new();
        self.tokens
            .iter()
            .filter_map(|t| pick(&t.kind))
            .filter(|name| seen.insert(name_key(name)))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a ExpressionToken;
    type IntoIter = std::slice::Iter<'a, ExpressionToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Space-separated RPN; functions are written as `name/argc` and unary
/// minus as `NEG`
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match &token.kind {
                TokenKind::Function { name, arg_count } => write!(f, "{}/{}", name, arg_count)?,
                TokenKind::Operator(Operator::Negate) => f.write_str("NEG")?,
                kind => write!(f, "{}", kind)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Program {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}
