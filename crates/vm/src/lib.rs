//! Brook virtual machine — executes compiled instruction streams.
//!
//! A stack-based machine with:
//! - an operand stack of numeric cells
//! - a flat variable store that grows on demand, zero-filled
//! - an append-only string pool seeded from compile time
//!
//! Execution is fully sequential: a run proceeds to HALT or to the
//! first fatal error, with no retry and no partial result. Printed
//! output goes to an injected writer, never to process-global streams.
//!
//! # Usage
//!
//! ```
//! use brook_common::{Instruction, Opcode, Program};
//! use brook_vm::run;
//!
//! let program = Program::new(vec![
//!     Instruction::with_operand(Opcode::PushInt, 42.0),
//!     Instruction::new(Opcode::Halt),
//! ]);
//!
//! let mut out = Vec::new();
//! let result = run(&program, &[], &mut out).unwrap();
//! assert_eq!(result, 42.0);
//! ```

pub mod error;
pub mod execute;
pub mod machine;

pub use error::RuntimeError;
pub use machine::Vm;

use std::io::Write;

use brook_common::Program;

/// Execute a program against an initial string pool, writing printed
/// output to `out`.
///
/// Returns the top-of-stack value at HALT, or 0.0 when the stack is
/// empty at that point.
///
/// # Errors
///
/// Returns [`RuntimeError`] on any fatal condition: stack underflow,
/// division by zero, an invalid memory or string-pool index, a jump
/// outside the program, a reserved opcode, or running past the final
/// instruction without reaching HALT.
pub fn run(
    program: &Program,
    strings: &[String],
    out: &mut dyn Write,
) -> Result<f64, RuntimeError> {
    let mut vm = Vm::new(program, strings, out);
    vm.execute()
}
