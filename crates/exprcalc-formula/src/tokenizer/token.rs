//! Tokens produced by the generic tokenizer

use std::fmt;

/// Lexical class of a [`Token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Unknown,
    Eof,
    Integer,
    Float,
    HexDecimal,
    Symbol,
    Quoted,
    Word,
    Whitespace,
    Comment,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Unknown => "Unknown",
            TokenType::Eof => "Eof",
            TokenType::Integer => "Integer",
            TokenType::Float => "Float",
            TokenType::HexDecimal => "HexDecimal",
            TokenType::Symbol => "Symbol",
            TokenType::Quoted => "Quoted",
            TokenType::Word => "Word",
            TokenType::Whitespace => "Whitespace",
            TokenType::Comment => "Comment",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified piece of source text and where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            token_type,
            value: value.into(),
            line,
            column,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }

    /// Check for a specific symbol
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.token_type == TokenType::Symbol && self.value == symbol
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({:?}) at {}:{}",
            self.token_type, self.value, self.line, self.column
        )
    }
}
