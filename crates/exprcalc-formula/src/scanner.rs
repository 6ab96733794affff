//! Character scanner with line/column tracking
//!
//! The scanner hands out one code point at a time and can push characters
//! back. A CR LF pair counts as a single line break; a lone CR or LF is one
//! line break as well.

/// Line/column of a character (both 1-based; column 0 means "before the
/// first character of the line")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of the first character of the input
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Position reported before anything has been read
    pub const fn before_start() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

/// Pushback-capable reader over the characters of a string
#[derive(Debug, Clone)]
pub struct CharScanner {
    chars: Vec<char>,
    /// Index of the next character to read
    pos: usize,
    /// Position of the next character
    next: Position,
    /// Position of the last character read
    last: Position,
}

impl CharScanner {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            next: Position::start(),
            last: Position::before_start(),
        }
    }

    /// Read the next character, or `None` at the end of input
    pub fn read(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.last = self.next;
        if self.is_break_at(self.pos) {
            self.next = Position {
                line: self.next.line + 1,
                column: 1,
            };
        } else {
            self.next.column += 1;
        }
        self.pos += 1;
        Some(c)
    }

    /// Look at the next character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Look `n` characters past the next one without consuming anything
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    /// Push the last character back
    pub fn unread(&mut self) {
        self.unread_many(1);
    }

    /// Push the last `n` characters back (clamped at the start of input)
    pub fn unread_many(&mut self, n: usize) {
        let n = n.min(self.pos);
        if n == 0 {
            return;
        }

        let target = self.pos - n;
        let first_affected = target.saturating_sub(1);
        let crosses_break = (first_affected..self.pos).any(|i| self.is_break_at(i));

        if crosses_break {
            self.rewind_to(target);
        } else {
            self.pos = target;
            self.next.column -= n;
            self.last = Position {
                line: self.next.line,
                column: self.next.column - 1,
            };
        }
    }

    /// Go back to the start of input
    pub fn reset(&mut self) {
        self.pos = 0;
        self.next = Position::start();
        self.last = Position::before_start();
    }

    /// Line of the last character read
    pub fn line(&self) -> usize {
        self.last.line
    }

    /// Column of the last character read
    pub fn column(&self) -> usize {
        self.last.column
    }

    /// Line of the next character
    pub fn peek_line(&self) -> usize {
        self.next.line
    }

    /// Column of the next character
    pub fn peek_column(&self) -> usize {
        self.next.column
    }

    pub fn position(&self) -> Position {
        self.last
    }

    pub fn peek_position(&self) -> Position {
        self.next
    }

    /// Number of characters consumed so far
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn is_break_at(&self, i: usize) -> bool {
        match self.chars.get(i) {
            Some('\n') => true,
            Some('\r') => self.chars.get(i + 1) != Some(&'\n'),
            _ => false,
        }
    }

    /// Slow path: replay from the start up to `target`
    fn rewind_to(&mut self, target: usize) {
        self.reset();
        while self.pos < target {
            self.read();
        }
    }
}
