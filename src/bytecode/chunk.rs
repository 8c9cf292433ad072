//! Bytecode chunk containing instructions, line info and constants.

use crate::bytecode::instruction::OpCode;
use crate::bytecode::memory::push_with_growth;
use crate::bytecode::value::Value;

/// Largest constant pool a chunk can address with a one-byte operand.
pub const MAX_CONSTANTS: usize = u8::MAX as usize + 1;

/// A chunk of bytecode: instructions, their source lines, and a constant pool.
///
/// `code` and `lines` always have the same length; `lines[i]` is the source
/// line of `code[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    /// The bytecode instructions and their operands.
    pub code: Vec<u8>,
    /// Line information (offset -> line number).
    pub lines: Vec<u32>,
    /// The constant pool, in insertion order.
    pub constants: Vec<Value>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an opcode to the chunk.
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write_byte(op.into(), line);
    }

    /// Write a raw byte to the chunk.
    pub fn write_byte(&mut self, byte: u8, line: u32) {
        push_with_growth(&mut self.code, byte);
        push_with_growth(&mut self.lines, line);
    }

    /// Add a constant to the pool and return its index.
    ///
    /// Constants are never deduplicated, and the index is not range checked:
    /// callers emitting it as a one-byte operand must check it against
    /// [`MAX_CONSTANTS`].
    pub fn add_constant(&mut self, value: Value) -> usize {
        push_with_growth(&mut self.constants, value);
        self.constants.len() - 1
    }

    /// Get the line number at a given offset.
    pub fn get_line(&self, offset: usize) -> u32 {
        self.lines.get(offset).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Release every buffer and return to the empty state.
    pub fn free(&mut self) {
        *self = Self::new();
    }
}
