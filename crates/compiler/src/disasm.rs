//! Canonical listing of compiled programs, for diagnostics.

use brook_common::{Opcode, Program};

/// Render a program as one instruction per line, each prefixed with its
/// index (the unit jump targets are expressed in). `PUSH_STRING` lines
/// are annotated with the pooled literal they reference.
pub fn disassemble(program: &Program, strings: &[String]) -> String {
    let mut text = String::new();
    for (index, instr) in program.instructions.iter().enumerate() {
        text.push_str(&format!("{index:04} {instr}"));
        if instr.opcode == Opcode::PushString {
            if let Some(literal) = strings.get(instr.operand as usize) {
                text.push_str(&format!(" ; {literal:?}"));
            }
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_common::Instruction;

    #[test]
    fn lists_instructions_with_indices() {
        let program = Program::new(vec![
            Instruction::with_operand(Opcode::PushInt, 5.0),
            Instruction::with_operand(Opcode::PushInt, 3.0),
            Instruction::new(Opcode::Add),
            Instruction::new(Opcode::Halt),
        ]);
        assert_eq!(
            disassemble(&program, &[]),
            "0000 PUSH_INT 5\n0001 PUSH_INT 3\n0002 ADD\n0003 HALT\n"
        );
    }

    #[test]
    fn annotates_string_pushes() {
        let program = Program::new(vec![
            Instruction::with_operand(Opcode::PushString, 0.0),
            Instruction::new(Opcode::PrintString),
            Instruction::new(Opcode::Halt),
        ]);
        let strings = vec!["hello".to_string()];
        assert_eq!(
            disassemble(&program, &strings),
            "0000 PUSH_STRING 0 ; \"hello\"\n0001 PRINT_STRING\n0002 HALT\n"
        );
    }

    #[test]
    fn missing_pool_entry_is_left_unannotated() {
        let program = Program::new(vec![
            Instruction::with_operand(Opcode::PushString, 9.0),
            Instruction::new(Opcode::Halt),
        ]);
        assert_eq!(
            disassemble(&program, &[]),
            "0000 PUSH_STRING 9\n0001 HALT\n"
        );
    }

    #[test]
    fn empty_program() {
        assert_eq!(disassemble(&Program::new(vec![]), &[]), "");
    }
}
