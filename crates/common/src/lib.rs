//! Brook common types.
//!
//! This crate provides the foundational data structures shared by the
//! compiler and the virtual machine:
//!
//! - [`Ast`] — the closed set of program-tree node variants supplied by
//!   an external parser
//! - [`Type`] — the static types the compiler tracks per symbol
//! - [`Opcode`] — all 27 opcodes, with their stable numeric values
//! - [`Instruction`] — opcode plus one wide operand slot
//! - [`Program`] — a sequence of instructions
//! - [`DecodeError`] — errors from reconstructing opcodes from bytes
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime
//! cost) and has no other dependencies.

pub mod ast;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod types;

// Re-export commonly used types at the crate root.
pub use ast::{Ast, BinaryOp, UnaryOp};
pub use error::DecodeError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;
pub use types::Type;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random valid Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(&opcode::ALL_OPCODES[..])
    }

    proptest! {
        /// For all valid opcodes, converting to a byte and back produces
        /// the original.
        #[test]
        fn opcode_byte_roundtrip(op in arb_opcode()) {
            let byte = op as u8;
            prop_assert_eq!(Opcode::try_from(byte).unwrap(), op);
        }

        /// Every byte value either names an opcode or yields a specific
        /// decode error; conversion never panics.
        #[test]
        fn random_bytes_decode(byte in any::<u8>()) {
            match Opcode::try_from(byte) {
                Ok(op) => prop_assert_eq!(op as u8, byte),
                Err(DecodeError::InvalidOpcode(b)) => prop_assert_eq!(b, byte),
            }
        }

        /// The well-formedness check never panics, whatever the operands.
        #[test]
        fn well_formed_check_total(
            ops in prop::collection::vec((arb_opcode(), any::<f64>()), 0..40)
        ) {
            let instructions = ops
                .into_iter()
                .map(|(op, operand)| Instruction::with_operand(op, operand))
                .collect();
            let program = Program::new(instructions);
            let _ = program.is_well_formed();
        }

        /// A halt-terminated program whose jumps all target index 0 is
        /// always well-formed.
        #[test]
        fn halt_terminated_in_range_jumps_are_well_formed(
            ops in prop::collection::vec(arb_opcode(), 0..40)
        ) {
            let mut instructions: Vec<Instruction> = ops
                .into_iter()
                .map(|op| if op.has_operand() {
                    Instruction::with_operand(op, 0.0)
                } else {
                    Instruction::new(op)
                })
                .collect();
            instructions.push(Instruction::new(Opcode::Halt));
            prop_assert!(Program::new(instructions).is_well_formed());
        }
    }
}
