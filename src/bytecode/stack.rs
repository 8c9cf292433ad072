//! Fixed-capacity value stack for the VM.

use crate::bytecode::value::Value;

/// Maximum stack size.
pub const STACK_MAX: usize = 256;

/// A stack discipline violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackFault {
    Overflow,
    Underflow,
}

/// VM value stack. Only slots in `[0, top)` are ever read.
#[derive(Debug, Clone)]
pub struct Stack {
    slots: [Value; STACK_MAX],
    top: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            slots: [Value::Nil; STACK_MAX],
            top: 0,
        }
    }

    /// Push value onto stack
    pub fn push(&mut self, value: Value) -> Result<(), StackFault> {
        let slot = self.slots.get_mut(self.top).ok_or(StackFault::Overflow)?;
        *slot = value;
        self.top += 1;
        Ok(())
    }

    /// Pop value from stack
    pub fn pop(&mut self) -> Result<Value, StackFault> {
        if self.top == 0 {
            return Err(StackFault::Underflow);
        }
        self.top -= 1;
        Ok(self.slots[self.top])
    }

    /// The live portion of the stack, bottom first.
    pub fn as_slice(&self) -> &[Value] {
        &self.slots[..self.top]
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn reset(&mut self) {
        self.top = 0;
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack = Stack::new();
        stack.push(Value::Number(1.0)).unwrap();
        stack.push(Value::Number(2.0)).unwrap();

        assert_eq!(stack.as_slice(), &[Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(stack.pop(), Ok(Value::Number(2.0)));
        assert_eq!(stack.pop(), Ok(Value::Number(1.0)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut stack = Stack::new();
        for _ in 0..STACK_MAX {
            stack.push(Value::Nil).unwrap();
        }
        assert_eq!(stack.push(Value::Nil), Err(StackFault::Overflow));
        assert_eq!(stack.len(), STACK_MAX);
    }

    #[test]
    fn test_underflow_is_reported() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(StackFault::Underflow));
    }

    #[test]
    fn test_reset_discards_values() {
        let mut stack = Stack::new();
        stack.push(Value::Bool(true)).unwrap();
        stack.reset();
        assert!(stack.as_slice().is_empty());
    }
}
