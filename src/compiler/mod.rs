//! Single-pass compiler: parses tokens with Pratt precedence and emits
//! bytecode directly, with no syntax tree in between.

mod core;
mod expressions;
mod precedence;


pub use self::core::{CompileResult, Parser, MAX_NESTING_DEPTH};
pub use self::precedence::{get_rule, ParseFn, ParseRule, Precedence};

use crate::bytecode::Chunk;

/// Compile one expression into a chunk ending in `Return`.
///
/// Any reported diagnostic fails the whole pass; no chunk is returned then.
pub fn compile(source: &str) -> CompileResult<Chunk> {
    Parser::new(source).compile()
}
