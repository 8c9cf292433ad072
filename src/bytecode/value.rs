//! Runtime values for the bytecode VM.

use std::fmt;

/// A Lox value.
///
/// Equality is structural: values of different variants are never equal,
/// and numbers compare with IEEE-754 semantics, so `NaN != NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Nil,
    Number(f64),
}

impl Value {
    /// Only `nil` and `false` are falsey; everything else, `0` included, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Nil => false,
            Value::Number(_) => true,
        }
    }

    pub fn is_falsey(&self) -> bool {
        !self.is_truthy()
    }

    /// The payload of a `Number`, or `None` for any other variant.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(_) | Value::Nil => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}
