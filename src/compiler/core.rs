//! Core parser struct and helper methods.

use crate::bytecode::{Chunk, OpCode, Value, MAX_CONSTANTS};
use crate::error::{CompileError, CompileErrors};
use crate::lexer::{Scanner, Token, TokenKind};

pub type CompileResult<T> = Result<T, CompileErrors>;

/// How many expressions may be open at once before the parser gives up.
/// Each level costs a native stack frame.
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Whether new errors are being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Normal,
    /// An error was just reported; further reports are suppressed until the
    /// parser resynchronizes.
    Panicking,
}

/// The parser. It pulls tokens from its scanner one at a time and writes
/// bytecode straight into the chunk it owns.
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    pub(crate) current: Token<'src>,
    pub(crate) previous: Token<'src>,
    chunk: Chunk,
    errors: Vec<CompileError>,
    pub(crate) mode: Mode,
    /// Expressions currently being parsed, innermost included.
    pub(crate) depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let start = Token::new(TokenKind::Eof, "", 1);
        Self {
            scanner: Scanner::new(source),
            current: start,
            previous: start,
            chunk: Chunk::new(),
            errors: Vec::new(),
            mode: Mode::Normal,
            depth: 0,
        }
    }

    /// Compile a single expression followed by end of input.
    pub fn compile(mut self) -> CompileResult<Chunk> {
        self.advance();
        self.expression();
        self.consume(TokenKind::Eof, "Expect end of expression.");
        self.end_compiler();

        if self.had_error() {
            Err(CompileErrors::new(self.errors))
        } else {
            Ok(self.chunk)
        }
    }

    fn end_compiler(&mut self) {
        self.emit_op(OpCode::Return);
        // No statements means no synchronization point inside the pass.
        self.mode = Mode::Normal;

        #[cfg(feature = "print-code")]
        if !self.had_error() {
            crate::bytecode::print_disassembly(&self.chunk, "code");
        }
    }

    /// Whether any error has been reported during this pass.
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    // ===== Token manipulation =====

    /// Move to the next non-error token, reporting any error tokens on the way.
    pub(crate) fn advance(&mut self) {
        self.previous = self.current;

        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    // ===== Bytecode emission =====

    pub(crate) fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line;
        self.chunk.write_byte(byte, line);
    }

    pub(crate) fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op.into());
    }

    pub(crate) fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    pub(crate) fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op(OpCode::Constant);
        self.emit_byte(index);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.chunk.add_constant(value);
        if index >= MAX_CONSTANTS {
            self.error("Too many constants in one chunk.");
            return 0;
        }
        index as u8
    }

    // ===== Error reporting =====

    pub(crate) fn error(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(token, message);
    }

    pub(crate) fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.mode == Mode::Panicking {
            return;
        }
        self.mode = Mode::Panicking;

        let error = match token.kind {
            TokenKind::Eof => CompileError::at_end(message, token.line),
            TokenKind::Error => CompileError::scan(message, token.line),
            _ => CompileError::at_token(token.lexeme, message, token.line),
        };
        self.errors.push(error);
    }
}
