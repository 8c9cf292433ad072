//! rlox: a bytecode interpreter for Lox expressions.
//!
//! # Pipeline
//!
//! Source text flows through three stages:
//! - **Scanner** (`lexer`): produces tokens on demand
//! - **Compiler** (`compiler`): a single-pass Pratt parser that emits bytecode
//!   straight into a `Chunk`
//! - **VM** (`bytecode::vm`): a stack machine that executes the chunk
//!
//! ```
//! use rlox::bytecode::Value;
//!
//! assert_eq!(rlox::interpret("(1 + 2) * 3").unwrap(), Value::Number(9.0));
//! ```

pub mod bytecode;
pub mod compiler;
pub mod error;
pub mod lexer;

use std::path::Path;

use bytecode::{Chunk, Value, VM};
use error::{CompileErrors, LoxError};

/// Compile and run one expression on a fresh VM.
pub fn interpret(source: &str) -> Result<Value, LoxError> {
    interpret_with_disassembly(source, false)
}

/// Compile and run one expression, optionally printing the chunk listing to
/// stdout before execution.
pub fn interpret_with_disassembly(source: &str, disassemble: bool) -> Result<Value, LoxError> {
    let chunk = compile(source)?;
    if disassemble {
        bytecode::print_disassembly(&chunk, "code");
    }

    let mut vm = VM::new();
    Ok(vm.run(&chunk)?)
}

/// Compile one expression without running it.
pub fn compile(source: &str) -> Result<Chunk, CompileErrors> {
    compiler::compile(source)
}

/// Render a chunk as a human-readable listing.
pub fn disassemble(chunk: &Chunk, name: &str) -> String {
    bytecode::disassemble_chunk(chunk, name)
}

/// Read a source file and interpret it. Bytes that are not valid UTF-8 are
/// replaced, so they surface as scan errors rather than I/O errors.
pub fn run_file(path: impl AsRef<Path>) -> Result<Value, LoxError> {
    run_file_with_disassembly(path, false)
}

/// Like [`run_file`], optionally printing the chunk listing first.
///
/// `LoxError::Io` only ever comes from reading the file.
pub fn run_file_with_disassembly(
    path: impl AsRef<Path>,
    disassemble: bool,
) -> Result<Value, LoxError> {
    let bytes = std::fs::read(path)?;
    let source = String::from_utf8_lossy(&bytes);
    interpret_with_disassembly(&source, disassemble)
}
