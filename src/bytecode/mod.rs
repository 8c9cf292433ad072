//! Bytecode module for the Lox VM.
//!
//! # Architecture
//!
//! - `instruction`: OpCode definitions for the bytecode instruction set
//! - `chunk`: Bytecode chunks containing instructions, lines and constants
//! - `memory`: Growth policy for chunk buffers
//! - `value`: Runtime values
//! - `stack`: The VM's fixed-capacity value stack
//! - `vm`: Stack-based virtual machine for executing bytecode
//! - `disassembler`: Debug output for bytecode inspection

pub mod chunk;
pub mod disassembler;
pub mod instruction;
pub mod memory;
pub mod stack;
pub mod value;
pub mod vm;

pub use chunk::{Chunk, MAX_CONSTANTS};
pub use disassembler::{disassemble_chunk, disassemble_instruction, print_disassembly};
pub use instruction::OpCode;
pub use stack::STACK_MAX;
pub use value::Value;
pub use vm::VM;
