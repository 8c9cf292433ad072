//! Stack-based virtual machine for executing bytecode.

use crate::bytecode::chunk::Chunk;
use crate::bytecode::instruction::OpCode;
use crate::bytecode::stack::{Stack, StackFault};
use crate::bytecode::value::Value;
use crate::compiler;
use crate::error::{LoxError, RuntimeError};

/// Result type for VM operations.
pub type VMResult<T> = Result<T, RuntimeError>;

/// The virtual machine. It owns only its value stack; chunks are borrowed
/// for the duration of a single [`VM::run`].
#[derive(Debug, Default)]
pub struct VM {
    stack: Stack,
}

impl VM {
    pub fn new() -> Self {
        Self {
            stack: Stack::new(),
        }
    }

    /// Compile `source` and run it, yielding the value of the expression.
    pub fn interpret(&mut self, source: &str) -> Result<Value, LoxError> {
        let chunk = compiler::compile(source)?;
        Ok(self.run(&chunk)?)
    }

    /// Run a compiled chunk from offset 0 until it returns.
    ///
    /// The stack is empty at the start and end of every call, whichever way
    /// the call ends.
    pub fn run(&mut self, chunk: &Chunk) -> VMResult<Value> {
        self.stack.reset();
        let result = self.execute(chunk);
        self.stack.reset();
        result
    }

    /// Main execution loop.
    fn execute(&mut self, chunk: &Chunk) -> VMResult<Value> {
        let mut ip = 0;

        loop {
            let offset = ip;
            let line = chunk.get_line(offset);

            #[cfg(feature = "trace-execution")]
            self.trace(chunk, offset);

            let byte = read_byte(chunk, &mut ip)?;
            let opcode =
                OpCode::from_u8(byte).ok_or(RuntimeError::InvalidOpcode { byte, line })?;

            match opcode {
                OpCode::Constant => {
                    let index = read_byte(chunk, &mut ip)? as usize;
                    let value = chunk
                        .constants
                        .get(index)
                        .copied()
                        .ok_or(RuntimeError::InvalidConstant { index, line })?;
                    self.push(value, line)?;
                }

                OpCode::Nil => self.push(Value::Nil, line)?,
                OpCode::True => self.push(Value::Bool(true), line)?,
                OpCode::False => self.push(Value::Bool(false), line)?,

                OpCode::Equal => {
                    let b = self.pop(line)?;
                    let a = self.pop(line)?;
                    self.push(Value::Bool(a == b), line)?;
                }

                OpCode::Greater => self.binary_op(line, |a, b| Value::Bool(a > b))?,
                OpCode::Less => self.binary_op(line, |a, b| Value::Bool(a < b))?,

                OpCode::Add => self.binary_op(line, |a, b| Value::Number(a + b))?,
                OpCode::Subtract => self.binary_op(line, |a, b| Value::Number(a - b))?,
                OpCode::Multiply => self.binary_op(line, |a, b| Value::Number(a * b))?,
                OpCode::Divide => self.binary_op(line, |a, b| Value::Number(a / b))?,

                OpCode::Not => {
                    let value = self.pop(line)?;
                    self.push(Value::Bool(value.is_falsey()), line)?;
                }

                OpCode::Negate => {
                    let Some(n) = self.pop(line)?.as_number() else {
                        return Err(RuntimeError::type_error("Operand must be a number.", line));
                    };
                    self.push(Value::Number(-n), line)?;
                }

                OpCode::Return => return self.pop(line),
            }
        }
    }

    fn push(&mut self, value: Value, line: u32) -> VMResult<()> {
        self.stack.push(value).map_err(|fault| stack_error(fault, line))
    }

    fn pop(&mut self, line: u32) -> VMResult<Value> {
        self.stack.pop().map_err(|fault| stack_error(fault, line))
    }

    /// Pop two numbers (right operand first) and push `op(left, right)`.
    fn binary_op<F>(&mut self, line: u32, op: F) -> VMResult<()>
    where
        F: FnOnce(f64, f64) -> Value,
    {
        let b = self.pop(line)?;
        let a = self.pop(line)?;

        match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => self.push(op(a, b), line),
            _ => Err(RuntimeError::type_error("Operands must be numbers.", line)),
        }
    }

    #[cfg(feature = "trace-execution")]
    fn trace(&self, chunk: &Chunk, offset: usize) {
        let mut output = String::from("          ");
        for value in self.stack.as_slice() {
            output.push_str(&format!("[ {} ]", value));
        }
        output.push('\n');
        if offset < chunk.code.len() {
            crate::bytecode::disassembler::disassemble_instruction(chunk, offset, &mut output);
        }
        print!("{}", output);
    }
}

fn read_byte(chunk: &Chunk, ip: &mut usize) -> VMResult<u8> {
    let byte = chunk
        .code
        .get(*ip)
        .copied()
        .ok_or_else(|| RuntimeError::UnexpectedEnd {
            line: chunk.lines.last().copied().unwrap_or(0),
        })?;
    *ip += 1;
    Ok(byte)
}

fn stack_error(fault: StackFault, line: u32) -> RuntimeError {
    match fault {
        StackFault::Overflow => RuntimeError::StackOverflow { line },
        StackFault::Underflow => RuntimeError::StackUnderflow { line },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::stack::STACK_MAX;
    use pretty_assertions::assert_eq;

    fn run_source(source: &str) -> Result<Value, LoxError> {
        VM::new().interpret(source)
    }

    fn number(source: &str) -> f64 {
        match run_source(source) {
            Ok(Value::Number(n)) => n,
            other => panic!("expected a number from {:?}, got {:?}", source, other),
        }
    }

    fn boolean(source: &str) -> bool {
        match run_source(source) {
            Ok(Value::Bool(b)) => b,
            other => panic!("expected a bool from {:?}, got {:?}", source, other),
        }
    }

    fn runtime_error(source: &str) -> RuntimeError {
        match run_source(source) {
            Err(LoxError::Runtime(err)) => err,
            other => panic!("expected a runtime error from {:?}, got {:?}", source, other),
        }
    }

    #[test]
    fn test_simple_arithmetic() {
        assert_eq!(number("1 + 2 * 3"), 7.0);
        assert_eq!(number("(1 + 2) * 3"), 9.0);
        assert_eq!(number("10 - 4 - 3"), 3.0);
        assert_eq!(number("48 / 4 / 2"), 6.0);
        assert_eq!(number("2 * 3 + 4 * 5"), 26.0);
        assert_eq!(number("0.1 + 0.2"), 0.1 + 0.2);
    }

    #[test]
    fn test_unary() {
        assert_eq!(number("-3"), -3.0);
        assert_eq!(number("-(-4.5)"), 4.5);
        assert_eq!(number("--7"), 7.0);
        assert_eq!(number("-2 * 3"), -6.0);
    }

    #[test]
    fn test_division_follows_ieee754() {
        assert_eq!(number("1 / 0"), f64::INFINITY);
        assert_eq!(number("-1 / 0"), f64::NEG_INFINITY);
        assert!(number("0 / 0").is_nan());
    }

    #[test]
    fn test_literals_and_not() {
        assert_eq!(run_source("nil").unwrap(), Value::Nil);
        assert!(boolean("true"));
        assert!(!boolean("false"));
        assert!(!boolean("!!nil"));
        assert!(boolean("!!0"));
        assert!(boolean("!!true"));
        assert!(!boolean("!!false"));
        assert!(boolean("!nil"));
    }

    #[test]
    fn test_equality() {
        assert!(boolean("nil == nil"));
        assert!(!boolean("nil == false"));
        assert!(boolean("0 == 0"));
        assert!(!boolean("1 == true"));
        assert!(boolean("1 != 2"));
        assert!(boolean("true != nil"));
        assert!(boolean("1 + 1 == 2"));
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert!(!boolean("0 / 0 == 0 / 0"));
        assert!(boolean("0 / 0 != 0 / 0"));
    }

    #[test]
    fn test_comparison() {
        assert!(boolean("1 < 2"));
        assert!(!boolean("2 < 1"));
        assert!(boolean("2 > 1"));
        assert!(boolean("2 >= 2"));
        assert!(boolean("2 <= 2"));
        assert!(!boolean("3 <= 2"));
        assert!(boolean("1 + 2 < 2 * 2"));
    }

    #[test]
    fn test_rewritten_comparisons_match_negation() {
        let numbers = [-2.5, -1.0, 0.0, 1.0, 3.25, 1e9];
        for a in numbers {
            for b in numbers {
                assert_eq!(
                    boolean(&format!("{:?} >= {:?}", a, b)),
                    boolean(&format!("!({:?} < {:?})", a, b)),
                );
                assert_eq!(
                    boolean(&format!("{:?} <= {:?}", a, b)),
                    boolean(&format!("!({:?} > {:?})", a, b)),
                );
            }
        }
    }

    #[test]
    fn test_nan_breaks_rewritten_comparisons() {
        // `>=` compiles to `!(a < b)`, which is true when either side is NaN.
        assert!(boolean("(0 / 0) >= 1"));
        assert!(boolean("(0 / 0) <= 1"));
        assert!(!boolean("(0 / 0) < 1"));
        assert!(!boolean("(0 / 0) > 1"));
    }

    #[test]
    fn test_negate_requires_number() {
        let err = runtime_error("-true");
        assert_eq!(
            err,
            RuntimeError::type_error("Operand must be a number.", 1)
        );
    }

    #[test]
    fn test_arithmetic_requires_numbers() {
        for source in ["1 + nil", "true * 2", "nil - nil", "false / 1", "1 < true", "nil > 0"] {
            assert_eq!(
                runtime_error(source),
                RuntimeError::type_error("Operands must be numbers.", 1),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_runtime_error_reports_line() {
        let err = runtime_error("1 +\n\n-nil");
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_vm_is_reusable_after_error() {
        let mut vm = VM::new();
        assert!(vm.interpret("-nil").is_err());
        assert_eq!(vm.interpret("1 + 1").unwrap(), Value::Number(2.0));
        assert!(vm.stack.is_empty());
    }

    #[test]
    fn test_compile_error_never_runs() {
        assert!(matches!(run_source("1 +"), Err(LoxError::Compile(_))));
    }

    #[test]
    fn test_stack_overflow_is_a_runtime_error() {
        let mut chunk = Chunk::new();
        let idx = chunk.add_constant(Value::Number(1.0));
        for _ in 0..=STACK_MAX {
            chunk.write_op(OpCode::Constant, 7);
            chunk.write_byte(idx as u8, 7);
        }
        chunk.write_op(OpCode::Return, 7);

        let err = VM::new().run(&chunk).unwrap_err();
        assert_eq!(err, RuntimeError::StackOverflow { line: 7 });
    }

    #[test]
    fn test_stack_underflow_is_a_runtime_error() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Add, 2);
        chunk.write_op(OpCode::Return, 2);

        let err = VM::new().run(&chunk).unwrap_err();
        assert_eq!(err, RuntimeError::StackUnderflow { line: 2 });
    }

    #[test]
    fn test_malformed_chunks() {
        let mut chunk = Chunk::new();
        chunk.write_byte(250, 1);
        assert_eq!(
            VM::new().run(&chunk).unwrap_err(),
            RuntimeError::InvalidOpcode { byte: 250, line: 1 }
        );

        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write_byte(3, 1);
        assert_eq!(
            VM::new().run(&chunk).unwrap_err(),
            RuntimeError::InvalidConstant { index: 3, line: 1 }
        );

        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::True, 1);
        assert_eq!(
            VM::new().run(&chunk).unwrap_err(),
            RuntimeError::UnexpectedEnd { line: 1 }
        );
    }

    #[test]
    fn test_return_yields_top_of_stack() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::True, 1);
        chunk.write_op(OpCode::Not, 1);
        chunk.write_op(OpCode::Return, 1);
        assert_eq!(VM::new().run(&chunk).unwrap(), Value::Bool(false));
    }
}
