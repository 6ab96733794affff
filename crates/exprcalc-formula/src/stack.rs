//! Calculation stack
//!
//! LIFO storage for the evaluator. A fresh stack is used for every
//! evaluation.

use crate::error::{EvalResult, EvaluationError};
use exprcalc_core::Variant;

/// The evaluator's operand stack
#[derive(Clone, Debug, Default)]
pub struct CalculationStack {
    items: Vec<Variant>,
}

impl CalculationStack {
    /// Create a new empty stack.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty stack with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of items on the stack.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push a value onto the stack.
    pub fn push(&mut self, value: Variant) {
        self.items.push(value);
    }

    /// Pop a value from the stack.
    pub fn pop(&mut self) -> EvalResult<Variant> {
        self.items.pop().ok_or(EvaluationError::StackUnderflow)
    }

    /// Pop the top `n` values, returned in the order they were pushed.
    pub fn pop_many(&mut self, n: usize) -> EvalResult<Vec<Variant>> {
        if n > self.items.len() {
            return Err(EvaluationError::StackUnderflow);
        }
        let start = self.items.len() - n;
        Ok(self.items.split_off(start))
    }

    /// Peek at the top of stack without removing it.
    pub fn peek(&self) -> EvalResult<&Variant> {
        self.items.last().ok_or(EvaluationError::StackUnderflow)
    }

    /// Get a reference to an item at a given depth (0 = top).
    pub fn peek_at(&self, depth: usize) -> EvalResult<&Variant> {
        if depth >= self.items.len() {
            return Err(EvaluationError::StackUnderflow);
        }
        Ok(&self.items[self.items.len() - 1 - depth])
    }

    /// Clear the stack.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get a slice of all items (bottom to top).
    pub fn as_slice(&self) -> &[Variant] {
        &self.items
    }
}
