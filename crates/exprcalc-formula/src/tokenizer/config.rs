//! Tokenizer configuration

use super::symbols::SymbolTable;

/// How the tokenizer treats a character that starts a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharCategory {
    Whitespace,
    Word,
    Number,
    Quote,
    Symbol,
}

/// Number recognition rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberRules {
    /// A `+`/`-` directly followed by a digit starts a number
    pub allow_sign: bool,
    /// `0x` prefixed hexadecimal literals
    pub allow_hex: bool,
    /// `e`/`E` exponents
    pub allow_exponent: bool,
}

impl Default for NumberRules {
    fn default() -> Self {
        Self {
            allow_sign: false,
            allow_hex: true,
            allow_exponent: true,
        }
    }
}

/// Options that drive [`Tokenizer`](super::Tokenizer)
///
/// Character categories are assigned by ranges; a range set later overrides
/// earlier ones for the characters it covers. Characters outside every
/// range become `Unknown` tokens, unless `unicode_words` is set and the
/// character is alphabetic.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    categories: Vec<(char, char, CharCategory)>,

    /// Extra characters allowed inside (but not at the start of) a word
    pub word_inner_chars: String,

    /// Multi-character symbols
    pub symbols: SymbolTable,

    pub numbers: NumberRules,

    /// Line comment openers
    pub line_comments: Vec<String>,

    /// Block comment delimiter pairs
    pub block_comments: Vec<(String, String)>,

    /// Recognize `\n`, `\t`, `\\`... inside quoted strings
    pub backslash_escapes: bool,

    /// Quoted token values hold the unescaped content instead of the raw text
    pub decode_strings: bool,

    pub skip_whitespace: bool,
    pub skip_comments: bool,

    /// Do not emit the final `Eof` token
    pub skip_eof: bool,

    /// Treat any alphabetic character as a word character
    pub unicode_words: bool,
}

impl TokenizerConfig {
    /// Configuration with no categories, symbols or comments
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            word_inner_chars: String::new(),
            symbols: SymbolTable::new(),
            numbers: NumberRules::default(),
            line_comments: Vec::new(),
            block_comments: Vec::new(),
            backslash_escapes: false,
            decode_strings: false,
            skip_whitespace: false,
            skip_comments: false,
            skip_eof: false,
            unicode_words: false,
        }
    }

    /// General purpose preset
    ///
    /// Whitespace and comments are emitted, numbers may carry a sign and
    /// quoted tokens keep their raw text.
    pub fn generic() -> Self {
        let mut config = Self::empty();
        config.set_ascii_categories();
        config.symbols = SymbolTable::with_symbols([
            "<=", ">=", "<>", "!=", "==", "<<", ">>", "&&", "||", "++", "--", "+=", "-=", "*=",
            "/=", "->", "::",
        ]);
        config.numbers.allow_sign = true;
        config.line_comments.push("//".to_string());
        config
            .block_comments
            .push(("/*".to_string(), "*/".to_string()));
        config.unicode_words = true;
        config
    }

    /// Preset for expression text
    ///
    /// Whitespace and comments are skipped, numbers are unsigned (the parser
    /// handles unary minus), quoted strings are decoded and `.` may appear
    /// inside names.
    pub fn expression() -> Self {
        let mut config = Self::empty();
        config.set_ascii_categories();
        config.symbols =
            SymbolTable::with_symbols(["<=", ">=", "<>", "!=", "==", "<<", ">>", "&&", "||"]);
        config.word_inner_chars.push('.');
        config.line_comments.push("//".to_string());
        config
            .block_comments
            .push(("/*".to_string(), "*/".to_string()));
        config.decode_strings = true;
        config.skip_whitespace = true;
        config.skip_comments = true;
        config.unicode_words = true;
        config
    }

    fn set_ascii_categories(&mut self) {
        self.set_category('\0', ' ', CharCategory::Whitespace);
        self.set_category('!', '~', CharCategory::Symbol);
        self.set_category('a', 'z', CharCategory::Word);
        self.set_category('A', 'Z', CharCategory::Word);
        self.set_category('_', '_', CharCategory::Word);
        self.set_category('0', '9', CharCategory::Number);
        self.set_category('"', '"', CharCategory::Quote);
        self.set_category('\'', '\'', CharCategory::Quote);
        self.set_category('\u{a0}', '\u{a0}', CharCategory::Whitespace);
    }

    /// Assign a category to an inclusive character range
    pub fn set_category(&mut self, from: char, to: char, category: CharCategory) {
        self.categories.push((from, to, category));
    }

    /// Category of a character, if any range covers it
    pub fn category(&self, c: char) -> Option<CharCategory> {
        let assigned = self
            .categories
            .iter()
            .rev()
            .find(|(from, to, _)| (*from..=*to).contains(&c))
            .map(|(_, _, category)| *category);

        match assigned {
            Some(category) => Some(category),
            None if self.unicode_words && c.is_alphabetic() => Some(CharCategory::Word),
            None if c.is_whitespace() => Some(CharCategory::Whitespace),
            None => None,
        }
    }

    /// Whether `c` may continue a word
    pub fn is_word_char(&self, c: char) -> bool {
        matches!(
            self.category(c),
            Some(CharCategory::Word | CharCategory::Number)
        ) || self.word_inner_chars.contains(c)
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self::generic()
    }
}
