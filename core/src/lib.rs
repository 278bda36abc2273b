#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use eval::*;
pub use generator::*;
pub use history::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod eval;
mod generator;
mod history;
mod tile;
mod types;

/// Number of character tiles in one guess row.
pub const TILES_PER_GUESS: usize = 6;

/// Number of guesses the player gets per round.
pub const TOTAL_GUESSES: usize = 6;

/// A 6-character arithmetic formula over the decimal digits and `+ - * /`.
///
/// Grouping is implicit through operator precedence only; there are no
/// parentheses in the tile alphabet. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression(String);

impl Expression {
    pub fn parse(src: &str) -> Result<Self> {
        if src.len() != TILES_PER_GUESS {
            return Err(GameError::BadLength);
        }
        if let Some(c) = src.chars().find(|&c| !is_expression_char(c)) {
            return Err(GameError::BadCharacter(c));
        }
        Ok(Self(String::from(src)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Character at tile position `index`.
    ///
    /// The alphabet is all ASCII, so byte indexing is exact.
    pub fn char_at(&self, index: usize) -> char {
        self.0.as_bytes()[index] as char
    }

    pub fn contains_char(&self, c: char) -> bool {
        self.0.contains(c)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The target equation for one round, paired with its whole-number value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    expression: Expression,
    value: i64,
}

impl Answer {
    /// Wraps an expression after checking that it evaluates to an integer.
    pub fn from_expression(expression: Expression) -> Result<Self> {
        let value = eval_expression(expression.as_str()).ok_or(GameError::InvalidFunction)?;
        if !is_integer_value(value) {
            return Err(GameError::NotAnInteger);
        }
        Ok(Self {
            expression,
            value: value as i64,
        })
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub const fn value(&self) -> i64 {
        self.value
    }

    /// First three characters of the solution, shown by the hint feature.
    pub fn hint_prefix(&self) -> &str {
        &self.expression.as_str()[..3]
    }
}
