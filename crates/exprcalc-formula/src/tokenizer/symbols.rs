//! Multi-character symbol table

use crate::scanner::CharScanner;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<char, Node>,
    terminal: bool,
}

/// Trie of operator symbols used for longest-match scanning
///
/// Any single character is accepted as a symbol of its own, so only
/// multi-character symbols need to be registered.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    root: Node,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a list of symbols
    pub fn with_symbols<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::new();
        for symbol in symbols {
            table.add(symbol);
        }
        table
    }

    /// Register a symbol
    pub fn add(&mut self, symbol: &str) {
        if symbol.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for c in symbol.chars() {
            node = node.children.entry(c).or_default();
        }
        node.terminal = true;
    }

    pub fn contains(&self, symbol: &str) -> bool {
        let mut node = &self.root;
        for c in symbol.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.terminal
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Read the longest symbol starting with `first` (already consumed)
    ///
    /// Characters read past the longest match are pushed back.
    pub fn read_symbol(&self, first: char, scanner: &mut CharScanner) -> String {
        let mut text = String::from(first);
        let Some(mut node) = self.root.children.get(&first) else {
            return text;
        };

        let mut read = 1;
        let mut best = 1;
        while let Some(c) = scanner.peek() {
            let Some(child) = node.children.get(&c) else {
                break;
            };
            scanner.read();
            text.push(c);
            read += 1;
            node = child;
            if node.terminal {
                best = read;
            }
        }

        if read > best {
            scanner.unread_many(read - best);
            text = text.chars().take(best).collect();
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn longest(table: &SymbolTable, text: &str) -> (String, Option<char>) {
        let mut scanner = CharScanner::new(text);
        let first = scanner.read().unwrap_or(' ');
        let symbol = table.read_symbol(first, &mut scanner);
        (symbol, scanner.peek())
    }

    #[test]
    fn test_longest_match() {
        let table = SymbolTable::with_symbols(["<", "<=", "<>", "<<"]);
        assert_eq!(longest(&table, "<=1"), ("<=".to_string(), Some('1')));
        assert_eq!(longest(&table, "<1"), ("<".to_string(), Some('1')));
        assert_eq!(longest(&table, "<<"), ("<<".to_string(), None));
    }

    #[test]
    fn test_backtracks_partial_match() {
        let table = SymbolTable::with_symbols(["...", "."]);
        assert_eq!(longest(&table, "..x"), (".".to_string(), Some('.')));
    }

    #[test]
    fn test_unregistered_char_is_single_symbol() {
        let table = SymbolTable::with_symbols(["=="]);
        assert_eq!(longest(&table, "+="), ("+".to_string(), Some('=')));
        assert!(table.contains("=="));
        assert!(!table.contains("="));
    }
}
