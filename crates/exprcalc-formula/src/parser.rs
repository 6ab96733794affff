//! Expression parser
//!
//! An operator-precedence (shunting-yard) parser that writes postfix
//! instructions directly instead of building a syntax tree. Pending
//! operators and open groups live on an explicit stack, so nesting depth is
//! bounded by memory rather than by the call stack.
//!
//! Precedence, lowest to highest:
//!
//! | Level | Operators |
//! |---|---|
//! | ternary (right-assoc) | `? :` |
//! | or | `OR` `\|\|` `XOR` |
//! | and | `AND` `&&` |
//! | equality | `=` `<>` `LIKE` `NOT LIKE` `IN` `NOT IN` `IS [NOT] NULL` |
//! | relational | `<` `<=` `>` `>=` |
//! | shift | `<<` `>>` |
//! | additive | `+` `-` |
//! | multiplicative | `*` `/` `%` |
//! | power (right-assoc) | `^` |
//! | unary | `-` `NOT` `!` |
//! | postfix | `x[i]` |

use crate::error::{ParseResult, SyntaxError, SyntaxErrorCode};
use crate::lexer::{ExpressionToken, ExpressionTokenizer, TokenKind};
use crate::program::Program;
use exprcalc_core::Operator;
use once_cell::sync::Lazy;
use tracing::debug;

static EXPRESSION_TOKENIZER: Lazy<ExpressionTokenizer> = Lazy::new(ExpressionTokenizer::new);

const EQUALITY_PRECEDENCE: u8 = 4;
const UNARY_PRECEDENCE: u8 = 10;

/// Parse expression text into a postfix program
///
/// # Example
/// ```rust
/// use exprcalc_formula::parse;
///
/// let program = parse("1 + 2 * 3").unwrap();
/// assert_eq!(program.to_string(), "1 2 3 * +");
/// ```
pub fn parse(text: &str) -> ParseResult<Program> {
    let tokens = EXPRESSION_TOKENIZER.tokenize(text);
    let program = parse_tokens(tokens)?;
    debug!(expression = text, instructions = program.len(), "parsed expression");
    Ok(program)
}

/// Parse an already tokenized expression
pub fn parse_tokens(tokens: Vec<ExpressionToken>) -> ParseResult<Program> {
    let mut parser = ExpressionParser::new(tokens);
    parser.run()?;
    Ok(Program::new(parser.output))
}

/// Binding power of a binary operator and whether it is right-associative
fn binary_precedence(op: Operator) -> Option<(u8, bool)> {
    let precedence = match op {
        Operator::Or | Operator::Xor => 2,
        Operator::And => 3,
        Operator::Equal
        | Operator::NotEqual
        | Operator::Like
        | Operator::NotLike
        | Operator::In
        | Operator::NotIn => EQUALITY_PRECEDENCE,
        Operator::Less | Operator::LessEqual | Operator::Greater | Operator::GreaterEqual => 5,
        Operator::ShiftLeft | Operator::ShiftRight => 6,
        Operator::Add | Operator::Subtract => 7,
        Operator::Multiply | Operator::Divide | Operator::Modulo => 8,
        Operator::Power => return Some((9, true)),
        _ => return None,
    };
    Some((precedence, false))
}

/// Entry on the parser's pending stack
#[derive(Debug)]
enum Frame {
    /// Binary or prefix operator waiting for its right operand
    Operator {
        token: ExpressionToken,
        precedence: u8,
    },
    /// `(` of a grouping
    Paren,
    /// Open argument list; `args` counts the arguments already closed by `,`
    Call {
        name: String,
        line: usize,
        column: usize,
        args: usize,
    },
    /// `[` of an element access
    Bracket { line: usize, column: usize },
    /// `?` waiting for its `:`
    Question { line: usize, column: usize },
    /// `:` seen; the ternary completes when its level closes
    Colon { line: usize, column: usize },
}

struct ExpressionParser {
    tokens: Vec<ExpressionToken>,
    pos: usize,
    output: Vec<ExpressionToken>,
    frames: Vec<Frame>,
}

impl ExpressionParser {
    fn new(mut tokens: Vec<ExpressionToken>) -> Self {
        if !tokens.last().map_or(false, ExpressionToken::is_eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(ExpressionToken::new(TokenKind::Eof, line, column));
        }
        Self {
            output: Vec::with_capacity(tokens.len()),
            frames: Vec::new(),
            tokens,
            pos: 0,
        }
    }

    // === Token access ===

    fn current(&self) -> &ExpressionToken {
        // The token list always ends with Eof, and `pos` never moves past it
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error_here(&self, code: SyntaxErrorCode, message: impl Into<String>) -> SyntaxError {
        let token = self.current();
        SyntaxError::new(code, message, token.line, token.column)
    }

    /// Error for a token that cannot appear at this point
    fn unexpected(&self) -> SyntaxError {
        match &self.current().kind {
            TokenKind::Eof => {
                self.error_here(SyntaxErrorCode::UnexpectedEnd, "Unexpected end of expression")
            }
            TokenKind::Unknown(text) => {
                self.error_here(SyntaxErrorCode::UnknownSymbol, format!("Unknown symbol '{}'", text))
            }
            kind => self.error_here(SyntaxErrorCode::ErrorNear, format!("Syntax error near '{}'", kind)),
        }
    }

    /// Error for a token that does not close the innermost open group
    ///
    /// Call after [`Self::close_level`], so the top frame is a group.
    fn unclosed(&self) -> SyntaxError {
        match self.frames.last() {
            Some(Frame::Paren) => {
                self.error_here(SyntaxErrorCode::MissedCloseParenthesis, "Missing closing ')'")
            }
            Some(Frame::Call { name, .. }) => self.error_here(
                SyntaxErrorCode::MissedCloseParenthesis,
                format!("Missing closing ')' for function '{}'", name),
            ),
            Some(Frame::Bracket { .. }) => {
                self.error_here(SyntaxErrorCode::MissedCloseSquareBracket, "Missing closing ']'")
            }
            Some(Frame::Question { .. }) => self.error_here(SyntaxErrorCode::ErrorAt, "Expected ':'"),
            _ => self.unexpected(),
        }
    }

    // === Stack reduction ===

    /// Emit pending operators that bind at least as tightly as `min`
    fn reduce(&mut self, min: u8) {
        while let Some(Frame::Operator { precedence, .. }) = self.frames.last() {
            if *precedence < min {
                break;
            }
            if let Some(Frame::Operator { token, .. }) = self.frames.pop() {
                self.output.push(token);
            }
        }
    }

    /// Emit every pending operator and completed ternary down to the
    /// innermost open group
    fn close_level(&mut self) {
        loop {
            match self.frames.last() {
                Some(Frame::Operator { .. }) | Some(Frame::Colon { .. }) => {}
                _ => return,
            }
            match self.frames.pop() {
                Some(Frame::Operator { token, .. }) => self.output.push(token),
                Some(Frame::Colon { line, column }) => self.output.push(ExpressionToken::new(
                    TokenKind::Operator(Operator::Ternary),
                    line,
                    column,
                )),
                _ => return,
            }
        }
    }

    // === Main loop ===

    fn run(&mut self) -> ParseResult<()> {
        let mut expect_operand = true;
        // False right after a postfix `IS [NOT] NULL`, which cannot be indexed
        let mut indexable = false;

        loop {
            if expect_operand {
                if self.operand()? {
                    expect_operand = false;
                    indexable = true;
                }
                continue;
            }

            let token = self.current().clone();
            match token.kind {
                TokenKind::Eof => {
                    self.close_level();
                    if self.frames.is_empty() {
                        return Ok(());
                    }
                    return Err(self.unclosed());
                }

                TokenKind::Operator(Operator::IsNull | Operator::IsNotNull) => {
                    self.reduce(EQUALITY_PRECEDENCE);
                    self.output.push(token);
                    self.advance();
                    indexable = false;
                }

                TokenKind::Operator(op) => {
                    let Some((precedence, right_assoc)) = binary_precedence(op) else {
                        self.close_level();
                        return Err(self.unclosed());
                    };
                    self.reduce(if right_assoc { precedence + 1 } else { precedence });
                    self.frames.push(Frame::Operator { token, precedence });
                    self.advance();
                    expect_operand = true;
                }

                TokenKind::LeftBracket if indexable => {
                    self.frames.push(Frame::Bracket {
                        line: token.line,
                        column: token.column,
                    });
                    self.advance();
                    expect_operand = true;
                }

                TokenKind::Question => {
                    // Right-associative: an open `:` stays on the stack
                    self.reduce(0);
                    self.frames.push(Frame::Question {
                        line: token.line,
                        column: token.column,
                    });
                    self.advance();
                    expect_operand = true;
                }

                TokenKind::Colon => {
                    self.close_level();
                    match self.frames.pop() {
                        Some(Frame::Question { line, column }) => {
                            self.frames.push(Frame::Colon { line, column });
                        }
                        other => return Err(self.restore_unclosed(other)),
                    }
                    self.advance();
                    expect_operand = true;
                }

                TokenKind::Comma => {
                    self.close_level();
                    match self.frames.last_mut() {
                        Some(Frame::Call { args, .. }) => *args += 1,
                        _ => return Err(self.unclosed()),
                    }
                    self.advance();
                    expect_operand = true;
                }

                TokenKind::RightParen => {
                    self.close_level();
                    match self.frames.pop() {
                        Some(Frame::Paren) => {}
                        Some(Frame::Call {
                            name,
                            line,
                            column,
                            args,
                        }) => self.output.push(ExpressionToken::new(
                            TokenKind::Function {
                                name,
                                arg_count: args + 1,
                            },
                            line,
                            column,
                        )),
                        other => return Err(self.restore_unclosed(other)),
                    }
                    self.advance();
                    indexable = true;
                }

                TokenKind::RightBracket => {
                    self.close_level();
                    match self.frames.pop() {
                        Some(Frame::Bracket { line, column }) => {
                            self.output.push(ExpressionToken::new(
                                TokenKind::Operator(Operator::Element),
                                line,
                                column,
                            ))
                        }
                        other => return Err(self.restore_unclosed(other)),
                    }
                    self.advance();
                    indexable = true;
                }

                _ => {
                    self.close_level();
                    return Err(self.unclosed());
                }
            }
        }
    }

    /// Put back a frame popped for a closer that did not match it
    fn restore_unclosed(&mut self, frame: Option<Frame>) -> SyntaxError {
        self.frames.extend(frame);
        self.unclosed()
    }

    /// Consume one token in operand position
    ///
    /// Returns true when a complete operand was produced, false when a
    /// prefix operator or an open group still needs one.
    fn operand(&mut self) -> ParseResult<bool> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::Constant(_) | TokenKind::Variable(_) => {
                self.advance();
                self.output.push(token);
                Ok(true)
            }
            TokenKind::Operator(Operator::Negate | Operator::Not) => {
                self.advance();
                self.frames.push(Frame::Operator {
                    token,
                    precedence: UNARY_PRECEDENCE,
                });
                Ok(false)
            }
            TokenKind::LeftParen => {
                self.advance();
                self.frames.push(Frame::Paren);
                Ok(false)
            }
            TokenKind::Function { name, .. } => {
                self.advance();
                if self.current().kind != TokenKind::LeftParen {
                    return Err(self.error_here(
                        SyntaxErrorCode::ErrorAt,
                        format!("Expected '(' after function name '{}'", name),
                    ));
                }
                self.advance();

                if self.current().kind == TokenKind::RightParen {
                    self.advance();
                    self.output.push(ExpressionToken::new(
                        TokenKind::Function { name, arg_count: 0 },
                        token.line,
                        token.column,
                    ));
                    return Ok(true);
                }

                self.frames.push(Frame::Call {
                    name,
                    line: token.line,
                    column: token.column,
                    args: 0,
                });
                Ok(false)
            }
            _ => Err(self.unexpected()),
        }
    }
}
