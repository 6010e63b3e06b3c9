//! Fetch-decode-execute loop and opcode dispatch for the Brook VM.

use std::io::Write;

use brook_common::Opcode;

use crate::error::RuntimeError;
use crate::machine::Vm;

impl<'a> Vm<'a> {
    /// Execute the program until HALT or a fatal error.
    ///
    /// State is reset first, so repeated calls on the same value behave
    /// like fresh runs. All binary opcodes pop right-then-left: the
    /// second value popped is the left operand.
    pub fn execute(&mut self) -> Result<f64, RuntimeError> {
        self.reset();

        loop {
            let at = self.pc;
            let instr = self.fetch()?;
            self.pc += 1;

            match instr.opcode {
                Opcode::PushInt | Opcode::PushFloat | Opcode::PushString => {
                    self.stack.push(instr.operand);
                }

                // Arithmetic
                Opcode::Add => self.exec_binary(at, |left, right| left + right)?,
                Opcode::Sub => self.exec_binary(at, |left, right| left - right)?,
                Opcode::Mul => self.exec_binary(at, |left, right| left * right)?,
                Opcode::Div => self.exec_div(at)?,
                Opcode::Negate => {
                    let value = self.pop(at)?;
                    self.stack.push(-value);
                }

                // Comparison
                Opcode::Greater => self.exec_comparison(at, |left, right| left > right)?,
                Opcode::Less => self.exec_comparison(at, |left, right| left < right)?,
                Opcode::GreaterEqual => self.exec_comparison(at, |left, right| left >= right)?,
                Opcode::LessEqual => self.exec_comparison(at, |left, right| left <= right)?,
                Opcode::Equal => self.exec_comparison(at, |left, right| left == right)?,
                Opcode::NotEqual => self.exec_comparison(at, |left, right| left != right)?,
                Opcode::Not => {
                    let value = self.pop(at)?;
                    self.stack.push(if value == 0.0 { 1.0 } else { 0.0 });
                }

                // Stack and storage
                Opcode::Pop => {
                    self.pop(at)?;
                }
                Opcode::Store => self.exec_store(at)?,
                Opcode::Load => self.exec_load(at)?,

                // Control flow
                Opcode::Jump => {
                    self.pc = self.jump_target(instr.operand, at)?;
                }
                Opcode::JumpIfFalse => {
                    let condition = self.pop(at)?;
                    if condition == 0.0 {
                        self.pc = self.jump_target(instr.operand, at)?;
                    }
                }
                Opcode::JumpIfTrue => {
                    let condition = self.pop(at)?;
                    if condition != 0.0 {
                        self.pc = self.jump_target(instr.operand, at)?;
                    }
                }
                Opcode::Halt => {
                    return Ok(self.stack.last().copied().unwrap_or(0.0));
                }

                // The compiler lowers logical operators to jump
                // sequences; these exist for numbering compatibility
                // only and must never reach the dispatch loop.
                Opcode::And | Opcode::Or => {
                    return Err(RuntimeError::ReservedOpcode {
                        at,
                        opcode: instr.opcode,
                    });
                }

                // Strings and output
                Opcode::ConcatString => self.exec_concat(at)?,
                Opcode::PrintValue => self.exec_print_value(at)?,
                Opcode::PrintString => self.exec_print_string(at)?,
            }
        }
    }

    /// Validate a jump operand: an integral index inside the program.
    fn jump_target(&self, raw: f64, at: usize) -> Result<usize, RuntimeError> {
        let valid = raw >= 0.0 && raw.fract() == 0.0 && (raw as usize) < self.program.len();
        if !valid {
            return Err(RuntimeError::InvalidJumpTarget { at, target: raw });
        }
        Ok(raw as usize)
    }

    fn exec_binary(
        &mut self,
        at: usize,
        apply: impl Fn(f64, f64) -> f64,
    ) -> Result<(), RuntimeError> {
        let right = self.pop(at)?;
        let left = self.pop(at)?;
        self.stack.push(apply(left, right));
        Ok(())
    }

    fn exec_comparison(
        &mut self,
        at: usize,
        compare: impl Fn(f64, f64) -> bool,
    ) -> Result<(), RuntimeError> {
        let right = self.pop(at)?;
        let left = self.pop(at)?;
        self.stack.push(if compare(left, right) { 1.0 } else { 0.0 });
        Ok(())
    }

    fn exec_div(&mut self, at: usize) -> Result<(), RuntimeError> {
        let right = self.pop(at)?;
        if right == 0.0 {
            return Err(RuntimeError::DivisionByZero { at });
        }
        let left = self.pop(at)?;
        self.stack.push(left / right);
        Ok(())
    }

    /// The address was pushed last, so it comes off first. The stored
    /// value is pushed back because assignment is an expression.
    fn exec_store(&mut self, at: usize) -> Result<(), RuntimeError> {
        let raw_address = self.pop(at)?;
        let value = self.pop(at)?;
        let address = self.store_address(raw_address, at)?;
        self.memory[address] = value;
        self.stack.push(value);
        Ok(())
    }

    fn exec_load(&mut self, at: usize) -> Result<(), RuntimeError> {
        let raw_address = self.pop(at)?;
        let address = self.load_address(raw_address, at)?;
        self.stack.push(self.memory[address]);
        Ok(())
    }

    /// Concatenate in left + right source order and append the result
    /// as a new pool entry.
    fn exec_concat(&mut self, at: usize) -> Result<(), RuntimeError> {
        let raw_right = self.pop(at)?;
        let raw_left = self.pop(at)?;
        let right = self.string_index(raw_right, at)?;
        let left = self.string_index(raw_left, at)?;

        let combined = format!("{}{}", self.strings[left], self.strings[right]);
        let index = self.strings.len();
        self.strings.push(combined);
        self.stack.push(index as f64);
        Ok(())
    }

    /// 0.0 and 1.0 render as boolean words; anything else as a number.
    fn exec_print_value(&mut self, at: usize) -> Result<(), RuntimeError> {
        let value = self.pop(at)?;
        let written = if value == 0.0 {
            writeln!(self.out, "false")
        } else if value == 1.0 {
            writeln!(self.out, "true")
        } else {
            writeln!(self.out, "{value}")
        };
        written.map_err(|e| RuntimeError::Output(e.to_string()))
    }

    fn exec_print_string(&mut self, at: usize) -> Result<(), RuntimeError> {
        let raw = self.pop(at)?;
        let index = self.string_index(raw, at)?;
        writeln!(self.out, "{}", self.strings[index])
            .map_err(|e| RuntimeError::Output(e.to_string()))
    }
}
