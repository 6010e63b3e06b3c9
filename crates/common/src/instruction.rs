//! Instruction representation for the Brook VM.
//!
//! An instruction is an opcode plus a single wide operand slot. The
//! operand's meaning depends on the opcode:
//!
//! - absolute instruction index for jumps,
//! - literal numeric value for `PUSH_INT` / `PUSH_FLOAT`,
//! - string-pool index for `PUSH_STRING`,
//! - unused (0.0) for everything else.
//!
//! The slot is an `f64`, wide enough to hold every integer, address, and
//! float this language produces without precision loss.

use std::fmt;

use crate::opcode::Opcode;

/// A single Brook instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operand slot. Meaning depends on the opcode; 0.0 when unused.
    pub operand: f64,
}

impl Instruction {
    /// Create an instruction with an empty operand slot.
    pub fn new(opcode: Opcode) -> Self {
        Self { opcode, operand: 0.0 }
    }

    /// Create an instruction carrying an operand (literal, address, or
    /// jump target).
    pub fn with_operand(opcode: Opcode, operand: f64) -> Self {
        Self { opcode, operand }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opcode.has_operand() {
            write!(f, "{} {}", self.opcode.mnemonic(), self.operand)
        } else {
            f.write_str(self.opcode.mnemonic())
        }
    }
}
