//! Tree walk: semantic analysis and instruction emission.
//!
//! The compiler makes a single recursive pass over the program tree,
//! checking scopes and types as it goes and appending instructions to a
//! flat buffer. Control flow is lowered with backpatching: a jump is
//! emitted with a placeholder target, its index is remembered, and the
//! operand is overwritten once the destination's final position is
//! known. No back-edges are ever generated, so every compiled program
//! terminates.

use brook_common::{Ast, BinaryOp, Instruction, Opcode, Program, Type, UnaryOp};

use crate::error::CompileError;
use crate::symbols::SymbolTable;
use crate::CompiledProgram;

/// Compiles one program tree into a flat instruction buffer.
///
/// An instance serves exactly one compilation. The first semantic or
/// type error aborts the walk; the partially filled buffer is dropped
/// with the instance, so no partial program can leak out.
pub struct Compiler {
    code: Vec<Instruction>,
    strings: Vec<String>,
    symbols: SymbolTable,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            strings: Vec::new(),
            symbols: SymbolTable::new(),
        }
    }

    /// Compile a whole tree.
    ///
    /// Opens one global scope around the walk, closes it afterwards, and
    /// appends the trailing `HALT` on success.
    pub fn compile(mut self, tree: &Ast) -> Result<CompiledProgram, CompileError> {
        self.symbols.enter_scope();
        self.compile_node(tree)?;
        self.symbols.exit_scope();

        self.emit(Opcode::Halt);
        Ok(CompiledProgram {
            program: Program::new(self.code),
            strings: self.strings,
        })
    }

    // ---- Emission helpers ----

    fn emit(&mut self, opcode: Opcode) {
        self.code.push(Instruction::new(opcode));
    }

    fn emit_operand(&mut self, opcode: Opcode, operand: f64) {
        self.code.push(Instruction::with_operand(opcode, operand));
    }

    /// Emit a jump with a placeholder target and return its index for
    /// later patching.
    fn emit_jump(&mut self, opcode: Opcode) -> usize {
        let at = self.code.len();
        self.emit_operand(opcode, 0.0);
        at
    }

    /// Point the jump at `at` to the next instruction to be emitted.
    fn patch_jump(&mut self, at: usize) {
        self.code[at].operand = self.code.len() as f64;
    }

    /// Append a string literal to the pool and return its index. Every
    /// occurrence gets its own entry; the pool only ever grows, at
    /// compile time and at run time alike.
    fn intern(&mut self, literal: &str) -> usize {
        let index = self.strings.len();
        self.strings.push(literal.to_string());
        index
    }

    // ---- Type resolution ----

    /// Resolve the static type of an expression, consulting the symbol
    /// table for identifiers.
    ///
    /// A binary node resolves to string for string concatenation, to
    /// Float when either operand is Float, to Integer for any other
    /// combination of integers and booleans, and to `Unknown` otherwise.
    /// `Unknown` at an operator is a type error, reported by the
    /// operator's own check.
    fn resolve_type(&self, expr: &Ast) -> Type {
        match expr {
            Ast::Identifier(name) => match self.symbols.lookup(name) {
                Some(symbol) => symbol.ty,
                None => {
                    log::warn!("resolving type of undeclared variable `{name}`");
                    Type::Unknown
                }
            },
            Ast::Binary { left, op, right } => {
                let lt = self.resolve_type(left);
                let rt = self.resolve_type(right);

                if *op == BinaryOp::Add && lt == Type::String && rt == Type::String {
                    return Type::String;
                }

                let combinable = |ty: Type| matches!(ty, Type::Integer | Type::Float | Type::Boolean);
                if !combinable(lt) || !combinable(rt) {
                    return Type::Unknown;
                }
                if lt == Type::Float || rt == Type::Float {
                    Type::Float
                } else {
                    Type::Integer
                }
            }
            other => other.intrinsic_type(),
        }
    }

    // ---- Node emission ----

    fn compile_node(&mut self, node: &Ast) -> Result<(), CompileError> {
        match node {
            Ast::Integer(value) => {
                self.emit_operand(Opcode::PushInt, *value as f64);
            }
            Ast::Float(value) => {
                self.emit_operand(Opcode::PushFloat, *value);
            }
            Ast::Str(literal) => {
                let index = self.intern(literal);
                self.emit_operand(Opcode::PushString, index as f64);
            }
            Ast::Boolean(value) => {
                self.emit_operand(Opcode::PushInt, if *value { 1.0 } else { 0.0 });
            }
            Ast::Identifier(name) => {
                let symbol = self.symbols.lookup(name).ok_or_else(|| {
                    CompileError::UndeclaredVariable { name: name.clone() }
                })?;
                let address = symbol.address;
                self.emit_operand(Opcode::PushInt, address as f64);
                self.emit(Opcode::Load);
            }
            Ast::Assignment { name, value } => {
                self.compile_assignment(name, value)?;
            }
            Ast::Binary { left, op, right } => {
                self.compile_binary(left, *op, right)?;
            }
            Ast::Unary { op, operand } => {
                self.compile_node(operand)?;
                match op {
                    UnaryOp::Not => self.emit(Opcode::Not),
                    UnaryOp::Negate => self.emit(Opcode::Negate),
                }
            }
            Ast::VarDecl { name, initializer } => {
                self.compile_var_decl(name, initializer.as_deref())?;
            }
            Ast::Block(statements) => {
                self.symbols.enter_scope();
                for statement in statements {
                    self.compile_node(statement)?;
                }
                self.symbols.exit_scope();
            }
            Ast::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.compile_node(condition)?;
                let jump_if_false = self.emit_jump(Opcode::JumpIfFalse);
                self.compile_node(then_branch)?;
                match else_branch {
                    Some(else_branch) => {
                        let jump_to_end = self.emit_jump(Opcode::Jump);
                        self.patch_jump(jump_if_false);
                        self.compile_node(else_branch)?;
                        self.patch_jump(jump_to_end);
                    }
                    None => self.patch_jump(jump_if_false),
                }
            }
            Ast::Print(expression) => {
                self.compile_node(expression)?;
                if self.resolve_type(expression) == Type::String {
                    self.emit(Opcode::PrintString);
                } else {
                    self.emit(Opcode::PrintValue);
                }
            }
        }
        Ok(())
    }

    /// Assignment compiles its right-hand side, type-checks against the
    /// target's bound type, and stores. `STORE` leaves the value on the
    /// stack, so an assignment can be used as a value.
    fn compile_assignment(&mut self, name: &str, value: &Ast) -> Result<(), CompileError> {
        let (address, declared) = match self.symbols.lookup(name) {
            Some(symbol) => (symbol.address, symbol.ty),
            None => {
                return Err(CompileError::AssignmentToUndeclared {
                    name: name.to_string(),
                })
            }
        };

        self.compile_node(value)?;

        let assigned = self.resolve_type(value);
        if declared != Type::Unknown && assigned != Type::Unknown && declared != assigned {
            return Err(CompileError::AssignmentTypeMismatch {
                name: name.to_string(),
                expected: declared,
                found: assigned,
            });
        }
        // A variable declared without an initializer takes the type of
        // its first assignment.
        if declared == Type::Unknown {
            if let Some(symbol) = self.symbols.lookup_mut(name) {
                symbol.ty = assigned;
            }
        }

        self.emit_operand(Opcode::PushInt, address as f64);
        self.emit(Opcode::Store);
        Ok(())
    }

    /// A declaration's type comes from its initializer's intrinsic type,
    /// resolving through one level of identifier aliasing. Without an
    /// initializer the variable starts `Unknown`.
    fn compile_var_decl(
        &mut self,
        name: &str,
        initializer: Option<&Ast>,
    ) -> Result<(), CompileError> {
        let ty = match initializer {
            Some(Ast::Identifier(init_name)) => match self.symbols.lookup(init_name) {
                Some(symbol) => symbol.ty,
                None => {
                    return Err(CompileError::UndeclaredInitializer {
                        name: name.to_string(),
                        initializer: init_name.clone(),
                    })
                }
            },
            Some(expression) => expression.intrinsic_type(),
            None => Type::Unknown,
        };

        let address = self
            .symbols
            .add_symbol(name, ty)
            .ok_or_else(|| CompileError::Redeclaration {
                name: name.to_string(),
            })?;

        if let Some(expression) = initializer {
            self.compile_node(expression)?;
            self.emit_operand(Opcode::PushInt, address as f64);
            self.emit(Opcode::Store);
        }
        Ok(())
    }

    /// Operand types are checked before either side is emitted, so a
    /// type error never leaves half an expression in the buffer.
    fn compile_binary(
        &mut self,
        left: &Ast,
        op: BinaryOp,
        right: &Ast,
    ) -> Result<(), CompileError> {
        let lt = self.resolve_type(left);
        let rt = self.resolve_type(right);

        match op {
            BinaryOp::And | BinaryOp::Or => self.compile_logical(left, op, right, lt, rt),
            BinaryOp::Add => {
                if lt == Type::String && rt == Type::String {
                    self.compile_node(left)?;
                    self.compile_node(right)?;
                    self.emit(Opcode::ConcatString);
                    Ok(())
                } else if lt.is_numeric() && rt.is_numeric() {
                    self.compile_node(left)?;
                    self.compile_node(right)?;
                    self.emit(Opcode::Add);
                    Ok(())
                } else {
                    Err(CompileError::InvalidAddOperands {
                        left: lt,
                        right: rt,
                    })
                }
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                if !(lt.is_numeric() && rt.is_numeric()) {
                    return Err(CompileError::InvalidArithmeticOperands {
                        op,
                        left: lt,
                        right: rt,
                    });
                }
                self.compile_node(left)?;
                self.compile_node(right)?;
                self.emit(match op {
                    BinaryOp::Sub => Opcode::Sub,
                    BinaryOp::Mul => Opcode::Mul,
                    _ => Opcode::Div,
                });
                Ok(())
            }
            BinaryOp::Greater
            | BinaryOp::Less
            | BinaryOp::GreaterEqual
            | BinaryOp::LessEqual
            | BinaryOp::Equal
            | BinaryOp::NotEqual => {
                if !(lt.is_numeric() && rt.is_numeric()) {
                    return Err(CompileError::InvalidComparisonOperands {
                        op,
                        left: lt,
                        right: rt,
                    });
                }
                self.compile_node(left)?;
                self.compile_node(right)?;
                self.emit(match op {
                    BinaryOp::Greater => Opcode::Greater,
                    BinaryOp::Less => Opcode::Less,
                    BinaryOp::GreaterEqual => Opcode::GreaterEqual,
                    BinaryOp::LessEqual => Opcode::LessEqual,
                    BinaryOp::Equal => Opcode::Equal,
                    _ => Opcode::NotEqual,
                });
                Ok(())
            }
        }
    }

    /// Lower `&&` / `||` to a short-circuit jump sequence.
    ///
    /// For `&&`: if the left operand is false, jump over the right
    /// operand to a `PUSH_INT 0`; otherwise the right operand's value is
    /// the expression's value. `||` is symmetric with a jump-if-true and
    /// a `PUSH_INT 1` path. The reserved AND/OR opcodes are never
    /// emitted.
    fn compile_logical(
        &mut self,
        left: &Ast,
        op: BinaryOp,
        right: &Ast,
        lt: Type,
        rt: Type,
    ) -> Result<(), CompileError> {
        let truthy = |ty: Type| matches!(ty, Type::Boolean | Type::Integer);
        if !(truthy(lt) && truthy(rt)) {
            return Err(CompileError::InvalidLogicalOperands {
                op,
                left: lt,
                right: rt,
            });
        }

        self.compile_node(left)?;
        let short_circuit = self.emit_jump(if op == BinaryOp::And {
            Opcode::JumpIfFalse
        } else {
            Opcode::JumpIfTrue
        });
        self.compile_node(right)?;
        let jump_to_end = self.emit_jump(Opcode::Jump);
        self.patch_jump(short_circuit);
        self.emit_operand(
            Opcode::PushInt,
            if op == BinaryOp::And { 0.0 } else { 1.0 },
        );
        self.patch_jump(jump_to_end);
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
