//! Brook compiler — semantic analysis and bytecode generation.
//!
//! Walks an externally parsed program tree once, resolving types against
//! a scope-aware symbol table and emitting a flat instruction buffer
//! with backpatched jump targets. Logical `&&` / `||` lower to
//! short-circuit jump sequences; the reserved AND/OR opcodes are never
//! emitted.
//!
//! # Usage
//!
//! ```
//! use brook_common::{Ast, Opcode};
//! use brook_compiler::compile;
//!
//! let tree = Ast::Block(vec![
//!     Ast::var_decl("x", Some(Ast::Integer(5))),
//!     Ast::print(Ast::Identifier("x".into())),
//! ]);
//!
//! let compiled = compile(&tree).unwrap();
//! assert_eq!(
//!     compiled.program.instructions.last().unwrap().opcode,
//!     Opcode::Halt,
//! );
//! ```
//!
//! # Error policy
//!
//! The first semantic or type error aborts the compilation and discards
//! everything emitted so far; no partial program is ever returned.

pub mod disasm;
pub mod error;
pub mod symbols;

mod codegen;

pub use codegen::Compiler;
pub use disasm::disassemble;
pub use error::CompileError;
pub use symbols::{Symbol, SymbolTable};

use brook_common::{Ast, Program};

/// A successfully compiled program: the instruction stream plus the
/// string pool it references.
///
/// `strings` is the read-only compile-time view of the pool; the VM
/// seeds its own copy from it and appends concatenation results at run
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProgram {
    /// The instruction stream, ending in `HALT`.
    pub program: Program,
    /// String literals interned at compile time, in emission order.
    pub strings: Vec<String>,
}

/// Compile a program tree.
///
/// # Errors
///
/// Returns [`CompileError`] on the first undeclared identifier,
/// redeclaration, or type mismatch found during the walk.
pub fn compile(tree: &Ast) -> Result<CompiledProgram, CompileError> {
    Compiler::new().compile(tree)
}
