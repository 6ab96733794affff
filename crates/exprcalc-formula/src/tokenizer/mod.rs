//! Configurable lexical tokenizer
//!
//! Splits text into [`Token`]s according to a [`TokenizerConfig`]. The
//! tokenizer never fails: characters it cannot classify come out as
//! `Unknown` tokens and the caller decides what to do with them.

mod config;
mod symbols;
mod token;

pub use config::{CharCategory, NumberRules, TokenizerConfig};
pub use symbols::SymbolTable;
pub use token::{Token, TokenType};

use crate::scanner::CharScanner;

/// Tokenizer bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Tokenizer with the [`TokenizerConfig::expression`] preset
    pub fn expression() -> Self {
        Self::new(TokenizerConfig::expression())
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Iterate over the tokens of `text`
    pub fn tokens(&self, text: &str) -> Tokens<'_> {
        Tokens {
            config: &self.config,
            scanner: CharScanner::new(text),
            finished: false,
        }
    }

    /// Collect all tokens of `text`
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.tokens(text).collect()
    }
}

/// Restartable token iterator
///
/// Ends after the `Eof` token (which is yielded unless `skip_eof` is set).
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    config: &'a TokenizerConfig,
    scanner: CharScanner,
    finished: bool,
}

impl<'a> Tokens<'a> {
    /// Restart from the beginning of the text
    pub fn reset(&mut self) {
        self.scanner.reset();
        self.finished = false;
    }

    fn next_token(&mut self) -> Token {
        let line = self.scanner.peek_line();
        let column = self.scanner.peek_column();

        let Some(c) = self.scanner.read() else {
            return Token::new(TokenType::Eof, "", line, column);
        };

        if let Some(text) = self.read_comment(c) {
            return Token::new(TokenType::Comment, text, line, column);
        }

        let (token_type, value) = match self.config.category(c) {
            Some(CharCategory::Whitespace) => (TokenType::Whitespace, self.read_whitespace(c)),
            Some(CharCategory::Number) => self.read_number(c),
            Some(CharCategory::Symbol) if self.starts_number(c) => self.read_number(c),
            Some(CharCategory::Word) => (TokenType::Word, self.read_word(c)),
            Some(CharCategory::Quote) => (TokenType::Quoted, self.read_quoted(c)),
            Some(CharCategory::Symbol) => (
                TokenType::Symbol,
                self.config.symbols.read_symbol(c, &mut self.scanner),
            ),
            None => (TokenType::Unknown, c.to_string()),
        };

        Token::new(token_type, value, line, column)
    }

    /// `.` or a permitted sign starts a number only when a digit follows
    fn starts_number(&self, c: char) -> bool {
        let leads = c == '.' || (self.config.numbers.allow_sign && (c == '+' || c == '-'));
        leads && matches!(self.scanner.peek(), Some(d) if d.is_ascii_digit())
    }

    /// Consume `rest` if it comes next; leaves the scanner untouched otherwise
    fn follows(&mut self, rest: &str) -> bool {
        let mut read = 0;
        for expected in rest.chars() {
            match self.scanner.read() {
                Some(c) if c == expected => read += 1,
                Some(_) => {
                    self.scanner.unread_many(read + 1);
                    return false;
                }
                None => {
                    self.scanner.unread_many(read);
                    return false;
                }
            }
        }
        true
    }

    fn read_comment(&mut self, first: char) -> Option<String> {
        let config = self.config;

        for opener in &config.line_comments {
            let mut chars = opener.chars();
            if chars.next() != Some(first) || !self.follows(chars.as_str()) {
                continue;
            }
            let mut text = opener.clone();
            while let Some(c) = self.scanner.peek() {
                if c == '\n' || c == '\r' {
                    break;
                }
                self.scanner.read();
                text.push(c);
            }
            return Some(text);
        }

        for (opener, closer) in &config.block_comments {
            let mut chars = opener.chars();
            if chars.next() != Some(first) || !self.follows(chars.as_str()) {
                continue;
            }
            let mut text = opener.clone();
            while let Some(c) = self.scanner.read() {
                text.push(c);
                if text.len() >= opener.len() + closer.len() && text.ends_with(closer.as_str()) {
                    break;
                }
            }
            return Some(text);
        }

        None
    }

    fn read_whitespace(&mut self, first: char) -> String {
        let mut text = String::from(first);
        while let Some(c) = self.scanner.peek() {
            if self.config.category(c) != Some(CharCategory::Whitespace) {
                break;
            }
            self.scanner.read();
            text.push(c);
        }
        text
    }

    fn read_digits(&mut self, text: &mut String, radix: u32) -> usize {
        let mut count = 0;
        while let Some(c) = self.scanner.peek() {
            if !c.is_digit(radix) {
                break;
            }
            self.scanner.read();
            text.push(c);
            count += 1;
        }
        count
    }

    fn read_number(&mut self, first: char) -> (TokenType, String) {
        let rules = self.config.numbers;
        let mut text = String::from(first);

        if rules.allow_hex && first == '0' && matches!(self.scanner.peek(), Some('x' | 'X')) {
            if matches!(self.scanner.peek_nth(1), Some(d) if d.is_ascii_hexdigit()) {
                if let Some(x) = self.scanner.read() {
                    text.push(x);
                }
                self.read_digits(&mut text, 16);
                return (TokenType::HexDecimal, text);
            }
            return (TokenType::Integer, text);
        }

        let mut is_float = first == '.';
        self.read_digits(&mut text, 10);

        if !is_float
            && self.scanner.peek() == Some('.')
            && matches!(self.scanner.peek_nth(1), Some(d) if d.is_ascii_digit())
        {
            self.scanner.read();
            text.push('.');
            self.read_digits(&mut text, 10);
            is_float = true;
        }

        if rules.allow_exponent && matches!(self.scanner.peek(), Some('e' | 'E')) {
            let signed = matches!(self.scanner.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if matches!(self.scanner.peek_nth(digit_at), Some(d) if d.is_ascii_digit()) {
                for _ in 0..digit_at {
                    if let Some(c) = self.scanner.read() {
                        text.push(c);
                    }
                }
                self.read_digits(&mut text, 10);
                is_float = true;
            }
        }

        let token_type = if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        (token_type, text)
    }

    fn read_word(&mut self, first: char) -> String {
        let mut text = String::from(first);
        while let Some(c) = self.scanner.peek() {
            if !self.config.is_word_char(c) {
                break;
            }
            self.scanner.read();
            text.push(c);
        }
        text
    }

    /// Read a quoted string; an unterminated string runs to the end of input
    fn read_quoted(&mut self, quote: char) -> String {
        let mut raw = String::from(quote);
        let mut content = String::new();

        while let Some(c) = self.scanner.read() {
            raw.push(c);
            if c == quote {
                // A doubled quote is an escaped quote
                if self.scanner.peek() == Some(quote) {
                    self.scanner.read();
                    raw.push(quote);
                    content.push(quote);
                    continue;
                }
                break;
            }
            if c == '\\' && self.config.backslash_escapes {
                let Some(escaped) = self.scanner.read() else {
                    break;
                };
                raw.push(escaped);
                content.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '0' => '\0',
                    other => other,
                });
                continue;
            }
            content.push(c);
        }

        if self.config.decode_strings {
            content
        } else {
            raw
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.finished {
                return None;
            }
            let token = self.next_token();
            match token.token_type {
                TokenType::Eof => {
                    self.finished = true;
                    if self.config.skip_eof {
                        return None;
                    }
                    return Some(token);
                }
                TokenType::Whitespace if self.config.skip_whitespace => continue,
                TokenType::Comment if self.config.skip_comments => continue,
                _ => return Some(token),
            }
        }
    }
}
