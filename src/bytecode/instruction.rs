//! Bytecode instruction definitions for the Lox VM.

use std::fmt;

/// Opcodes for the bytecode virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Load a constant from the constant pool: CONSTANT <index:u8>
    Constant = 0,
    /// Push nil onto the stack
    Nil,
    /// Push true onto the stack
    True,
    /// Push false onto the stack
    False,

    /// Equal: a == b
    Equal,
    /// Greater than: a > b
    Greater,
    /// Less than: a < b
    Less,

    /// Add two numbers: a + b
    Add,
    /// Subtract two numbers: a - b
    Subtract,
    /// Multiply two numbers: a * b
    Multiply,
    /// Divide two numbers: a / b
    Divide,

    /// Logical not: !a
    Not,
    /// Negate a number: -a
    Negate,

    /// Stop execution and yield the top of the stack
    Return,
}

impl OpCode {
    /// Get the number of operand bytes for this opcode.
    pub fn operand_size(self) -> usize {
        match self {
            OpCode::Constant => 1,
            OpCode::Nil
            | OpCode::True
            | OpCode::False
            | OpCode::Equal
            | OpCode::Greater
            | OpCode::Less
            | OpCode::Add
            | OpCode::Subtract
            | OpCode::Multiply
            | OpCode::Divide
            | OpCode::Not
            | OpCode::Negate
            | OpCode::Return => 0,
        }
    }

    /// Convert from u8 to OpCode.
    pub fn from_u8(byte: u8) -> Option<OpCode> {
        let op = match byte {
            0 => OpCode::Constant,
            1 => OpCode::Nil,
            2 => OpCode::True,
            3 => OpCode::False,
            4 => OpCode::Equal,
            5 => OpCode::Greater,
            6 => OpCode::Less,
            7 => OpCode::Add,
            8 => OpCode::Subtract,
            9 => OpCode::Multiply,
            10 => OpCode::Divide,
            11 => OpCode::Not,
            12 => OpCode::Negate,
            13 => OpCode::Return,
            _ => return None,
        };
        Some(op)
    }

    /// The listing name used by the disassembler.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::Nil => "OP_NIL",
            OpCode::True => "OP_TRUE",
            OpCode::False => "OP_FALSE",
            OpCode::Equal => "OP_EQUAL",
            OpCode::Greater => "OP_GREATER",
            OpCode::Less => "OP_LESS",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::Not => "OP_NOT",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for i in 0..=OpCode::Return as u8 {
            let op = OpCode::from_u8(i).expect("valid opcode");
            assert_eq!(i, op as u8);
        }
    }

    #[test]
    fn test_invalid_opcode() {
        assert!(OpCode::from_u8(OpCode::Return as u8 + 1).is_none());
        assert!(OpCode::from_u8(255).is_none());
    }

    #[test]
    fn test_only_constant_has_operand() {
        assert_eq!(OpCode::Constant.operand_size(), 1);
        assert_eq!(OpCode::Add.operand_size(), 0);
        assert_eq!(OpCode::Return.to_string(), "OP_RETURN");
    }
}
