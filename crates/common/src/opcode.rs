//! Opcode definitions for the Brook instruction set.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute fixes each variant's numeric value; hosts
/// that persist instruction streams rely on this mapping staying stable.
///
/// `And` and `Or` are reserved: the compiler always lowers logical
/// operators to jump sequences, so a conforming instruction stream never
/// contains them. The VM treats them as a fatal condition.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Push an integer literal (the operand) onto the stack.
    PushInt = 0,
    /// Push a floating-point literal (the operand) onto the stack.
    PushFloat = 1,
    /// Pop two values, push their sum.
    Add = 2,
    /// Pop two values, push (second_popped - first_popped).
    Sub = 3,
    /// Pop two values, push their product.
    Mul = 4,
    /// Pop two values, push quotient. Division by zero is a runtime error.
    Div = 5,
    /// Pop one value, push its arithmetic negation.
    Negate = 6,
    /// Pop one value and discard it.
    Pop = 7,
    /// Pop an address, pop a value, store the value at the address,
    /// then push the value back (assignment is an expression).
    Store = 8,
    /// Pop an address, push the value stored there.
    Load = 9,
    /// Stop execution. The result is the top of stack, or 0.0 if empty.
    Halt = 10,
    /// Pop a condition; jump to the operand index when it equals 0.0.
    JumpIfFalse = 11,
    /// Unconditional jump to the operand index.
    Jump = 12,
    /// Pop a condition; jump to the operand index when it is nonzero.
    JumpIfTrue = 13,
    /// Pop two values, push 1.0 if left > right, else 0.0.
    Greater = 14,
    /// Pop two values, push 1.0 if left < right, else 0.0.
    Less = 15,
    /// Pop two values, push 1.0 if left >= right, else 0.0.
    GreaterEqual = 16,
    /// Pop two values, push 1.0 if left <= right, else 0.0.
    LessEqual = 17,
    /// Pop two values, push 1.0 if left == right, else 0.0.
    Equal = 18,
    /// Pop two values, push 1.0 if left != right, else 0.0.
    NotEqual = 19,
    /// Pop one value, push 1.0 if it is 0.0, else 0.0.
    Not = 20,
    /// Reserved. Logical AND is lowered to jumps and never emitted.
    And = 21,
    /// Reserved. Logical OR is lowered to jumps and never emitted.
    Or = 22,
    /// Push a string-pool index (the operand) onto the stack.
    PushString = 23,
    /// Pop two pool indices, concatenate left + right, append the result
    /// to the pool, push the new index.
    ConcatString = 24,
    /// Pop a value and print it (0.0 and 1.0 render as booleans).
    PrintValue = 25,
    /// Pop a pool index and print the referenced string.
    PrintString = 26,
}

/// All opcodes, in numeric order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 27] = [
    Opcode::PushInt,
    Opcode::PushFloat,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Negate,
    Opcode::Pop,
    Opcode::Store,
    Opcode::Load,
    Opcode::Halt,
    Opcode::JumpIfFalse,
    Opcode::Jump,
    Opcode::JumpIfTrue,
    Opcode::Greater,
    Opcode::Less,
    Opcode::GreaterEqual,
    Opcode::LessEqual,
    Opcode::Equal,
    Opcode::NotEqual,
    Opcode::Not,
    Opcode::And,
    Opcode::Or,
    Opcode::PushString,
    Opcode::ConcatString,
    Opcode::PrintValue,
    Opcode::PrintString,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::PushInt),
            1 => Ok(Opcode::PushFloat),
            2 => Ok(Opcode::Add),
            3 => Ok(Opcode::Sub),
            4 => Ok(Opcode::Mul),
            5 => Ok(Opcode::Div),
            6 => Ok(Opcode::Negate),
            7 => Ok(Opcode::Pop),
            8 => Ok(Opcode::Store),
            9 => Ok(Opcode::Load),
            10 => Ok(Opcode::Halt),
            11 => Ok(Opcode::JumpIfFalse),
            12 => Ok(Opcode::Jump),
            13 => Ok(Opcode::JumpIfTrue),
            14 => Ok(Opcode::Greater),
            15 => Ok(Opcode::Less),
            16 => Ok(Opcode::GreaterEqual),
            17 => Ok(Opcode::LessEqual),
            18 => Ok(Opcode::Equal),
            19 => Ok(Opcode::NotEqual),
            20 => Ok(Opcode::Not),
            21 => Ok(Opcode::And),
            22 => Ok(Opcode::Or),
            23 => Ok(Opcode::PushString),
            24 => Ok(Opcode::ConcatString),
            25 => Ok(Opcode::PrintValue),
            26 => Ok(Opcode::PrintString),
            _ => Err(DecodeError::InvalidOpcode(value)),
        }
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::PushInt => "PUSH_INT",
            Opcode::PushFloat => "PUSH_FLOAT",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Negate => "NEGATE",
            Opcode::Pop => "POP",
            Opcode::Store => "STORE",
            Opcode::Load => "LOAD",
            Opcode::Halt => "HALT",
            Opcode::JumpIfFalse => "JUMP_IF_FALSE",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfTrue => "JUMP_IF_TRUE",
            Opcode::Greater => "GREATER",
            Opcode::Less => "LESS",
            Opcode::GreaterEqual => "GREATER_EQUAL",
            Opcode::LessEqual => "LESS_EQUAL",
            Opcode::Equal => "EQUAL",
            Opcode::NotEqual => "NOT_EQUAL",
            Opcode::Not => "NOT",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::PushString => "PUSH_STRING",
            Opcode::ConcatString => "CONCAT_STRING",
            Opcode::PrintValue => "PRINT_VALUE",
            Opcode::PrintString => "PRINT_STRING",
        }
    }

    /// True for opcodes whose operand slot is meaningful (literal pushes
    /// and jumps). Every other opcode carries 0.0 there.
    pub fn has_operand(&self) -> bool {
        matches!(
            self,
            Opcode::PushInt
                | Opcode::PushFloat
                | Opcode::PushString
                | Opcode::Jump
                | Opcode::JumpIfFalse
                | Opcode::JumpIfTrue
        )
    }
}
