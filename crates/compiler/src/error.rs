//! Compile-stage errors.
//!
//! The first error encountered anywhere in the walk aborts the whole
//! compilation; these variants describe what was found at that point.

use brook_common::{BinaryOp, Type};
use thiserror::Error;

/// Semantic and type errors detected while compiling a program tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An expression referenced a name no enclosing scope declares.
    #[error("undeclared variable `{name}`")]
    UndeclaredVariable { name: String },

    /// The target of an assignment was never declared.
    #[error("assignment to undeclared variable `{name}`")]
    AssignmentToUndeclared { name: String },

    /// A declaration's initializer is a reference to an undeclared name.
    #[error("initializer for `{name}` references undeclared variable `{initializer}`")]
    UndeclaredInitializer { name: String, initializer: String },

    /// The name already exists in the innermost scope. Shadowing an
    /// outer scope is fine; redeclaring within one scope is not.
    #[error("variable `{name}` already declared in this scope")]
    Redeclaration { name: String },

    /// Assigned value's type conflicts with the variable's bound type.
    #[error("type mismatch assigning to `{name}`: expected {expected}, got {found}")]
    AssignmentTypeMismatch {
        name: String,
        expected: Type,
        found: Type,
    },

    /// `+` accepts two numeric operands or two string operands, nothing
    /// mixed.
    #[error("operator `+` requires two numeric or two string operands, got {left} and {right}")]
    InvalidAddOperands { left: Type, right: Type },

    /// `-`, `*`, `/` accept numeric operands only.
    #[error("arithmetic operator `{op}` requires numeric operands, got {left} and {right}")]
    InvalidArithmeticOperands {
        op: BinaryOp,
        left: Type,
        right: Type,
    },

    /// Comparisons accept numeric operands only.
    #[error("comparison operator `{op}` requires numeric operands, got {left} and {right}")]
    InvalidComparisonOperands {
        op: BinaryOp,
        left: Type,
        right: Type,
    },

    /// `&&` and `||` accept boolean or integer operands.
    #[error("logical operator `{op}` requires boolean or integer operands, got {left} and {right}")]
    InvalidLogicalOperands {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            CompileError::UndeclaredVariable { name: "x".into() }.to_string(),
            "undeclared variable `x`"
        );
        assert_eq!(
            CompileError::AssignmentTypeMismatch {
                name: "x".into(),
                expected: Type::Integer,
                found: Type::String,
            }
            .to_string(),
            "type mismatch assigning to `x`: expected integer, got string"
        );
        assert_eq!(
            CompileError::InvalidLogicalOperands {
                op: BinaryOp::And,
                left: Type::String,
                right: Type::Boolean,
            }
            .to_string(),
            "logical operator `&&` requires boolean or integer operands, got string and boolean"
        );
    }
}
