//! Runtime errors for the Brook VM.
//!
//! Every fault is fatal: the run stops immediately, nothing is retried,
//! and no partial result is produced. Variants carry the index of the
//! faulting instruction where one exists.

use brook_common::Opcode;
use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// An opcode needed more operands than the stack held.
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// DIV with a right operand of exactly zero.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// LOAD or STORE with a negative address, or LOAD past the end of
    /// memory.
    #[error("invalid memory address {address} at instruction {at}")]
    InvalidAddress { at: usize, address: i64 },

    /// A string opcode referenced a pool slot that does not exist.
    #[error("invalid string pool index {index} at instruction {at}")]
    InvalidStringIndex { at: usize, index: i64 },

    /// A jump operand was negative, fractional, or outside the program.
    #[error("invalid jump target {target} at instruction {at}")]
    InvalidJumpTarget { at: usize, target: f64 },

    /// AND/OR reached the dispatch loop. The compiler lowers logical
    /// operators to jumps, so a conforming stream never contains these.
    #[error("reserved opcode {} at instruction {at}", .opcode.mnemonic())]
    ReservedOpcode { at: usize, opcode: Opcode },

    /// Execution ran past the final instruction without reaching HALT.
    #[error("program ran past instruction {at} without reaching HALT")]
    MissingHalt { at: usize },

    /// The injected output sink rejected a write.
    #[error("failed to write program output: {0}")]
    Output(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at instruction 5"
        );
        assert_eq!(
            RuntimeError::InvalidAddress { at: 2, address: -1 }.to_string(),
            "invalid memory address -1 at instruction 2"
        );
        assert_eq!(
            RuntimeError::ReservedOpcode {
                at: 0,
                opcode: Opcode::And
            }
            .to_string(),
            "reserved opcode AND at instruction 0"
        );
        assert_eq!(
            RuntimeError::MissingHalt { at: 3 }.to_string(),
            "program ran past instruction 3 without reaching HALT"
        );
    }
}
