//! Error types for the compile and run phases.

use std::fmt;

use thiserror::Error;

/// A single diagnostic reported while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("[line {line}] Error at end: {message}")]
    AtEnd { message: String, line: u32 },

    #[error("[line {line}] Error at '{lexeme}': {message}")]
    AtToken {
        lexeme: String,
        message: String,
        line: u32,
    },

    /// A lexical error surfaced through an error token.
    #[error("[line {line}] Error: {message}")]
    Scan { message: String, line: u32 },
}

impl CompileError {
    pub fn at_end(message: impl Into<String>, line: u32) -> Self {
        Self::AtEnd {
            message: message.into(),
            line,
        }
    }

    pub fn at_token(lexeme: impl Into<String>, message: impl Into<String>, line: u32) -> Self {
        Self::AtToken {
            lexeme: lexeme.into(),
            message: message.into(),
            line,
        }
    }

    pub fn scan(message: impl Into<String>, line: u32) -> Self {
        Self::Scan {
            message: message.into(),
            line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::AtEnd { message, .. } => message,
            Self::AtToken { message, .. } => message,
            Self::Scan { message, .. } => message,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::AtEnd { line, .. } => *line,
            Self::AtToken { line, .. } => *line,
            Self::Scan { line, .. } => *line,
        }
    }
}

/// Every diagnostic reported by one failed compile pass, in report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileErrors(Vec<CompileError>);

impl CompileErrors {
    pub fn new(errors: Vec<CompileError>) -> Self {
        Self(errors)
    }

    pub fn first(&self) -> Option<&CompileError> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompileError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<CompileError> {
        self.0
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

impl<'a> IntoIterator for &'a CompileErrors {
    type Item = &'a CompileError;
    type IntoIter = std::slice::Iter<'a, CompileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Runtime errors. Each one is fatal to the `run` call that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{message}\n[line {line}] in script")]
    TypeError { message: String, line: u32 },

    #[error("Stack overflow.\n[line {line}] in script")]
    StackOverflow { line: u32 },

    #[error("Stack underflow.\n[line {line}] in script")]
    StackUnderflow { line: u32 },

    #[error("Invalid opcode {byte}.\n[line {line}] in script")]
    InvalidOpcode { byte: u8, line: u32 },

    #[error("Constant index {index} out of range.\n[line {line}] in script")]
    InvalidConstant { index: usize, line: u32 },

    #[error("Unexpected end of bytecode.\n[line {line}] in script")]
    UnexpectedEnd { line: u32 },
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>, line: u32) -> Self {
        Self::TypeError {
            message: message.into(),
            line,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Self::TypeError { line, .. } => *line,
            Self::StackOverflow { line } => *line,
            Self::StackUnderflow { line } => *line,
            Self::InvalidOpcode { line, .. } => *line,
            Self::InvalidConstant { line, .. } => *line,
            Self::UnexpectedEnd { line } => *line,
        }
    }
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum LoxError {
    #[error("{0}")]
    Compile(#[from] CompileErrors),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
