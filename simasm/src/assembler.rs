use std::collections::HashMap;

use simcpu::isa::Instruction;
use simobj::Program;

use crate::error::AsmError;
use crate::parser::{tokenize, AsmInstruction, TokenGroup};

/// Translates assembly source into a program object.
///
/// Two passes over the token groups: the first assigns every label its
/// code-relative address, the second emits instructions with label
/// references resolved to PC-relative immediates measured at the referring
/// site.
pub fn translate(source: &str) -> Result<Program, AsmError> {
    let mut tokens = tokenize(source)?;

    if !tokens.iter().any(|group| group.label == "_start:") {
        return Err(AsmError::MissingStart);
    }

    // The interrupt handler must occupy the lowest code addresses: the
    // runtime vector is the single cell memory[0], initialized to the
    // program base before anything runs.
    if let Some(index) = tokens.iter().position(|group| group.label == "_int:") {
        tokens.swap(0, index);
    }

    let positions = label_positions(&tokens);

    let mut code = Vec::new();
    let mut pc = 0i64;
    for group in &tokens {
        for instr in &group.instructions {
            code.push(resolve(instr, &positions, pc)?);
            pc += 1;
        }
    }

    let start = positions["_start"] as u32;
    Ok(Program::from(start, code))
}

fn label_positions(tokens: &[TokenGroup]) -> HashMap<String, i64> {
    let mut positions = HashMap::new();
    let mut address = 0i64;
    for group in tokens {
        let name = group.label.trim_end_matches(':');
        positions.insert(name.to_owned(), address);
        address += group.instructions.len() as i64;
    }
    positions
}

fn resolve(
    instr: &AsmInstruction,
    positions: &HashMap<String, i64>,
    pc: i64,
) -> Result<Instruction, AsmError> {
    let lookup = |label: &str| {
        positions
            .get(label)
            .copied()
            .ok_or_else(|| AsmError::UndefinedLabel(label.to_owned()))
    };

    Ok(match instr {
        AsmInstruction::Complete(instr) => *instr,
        AsmInstruction::Jump { opcode, label } => Instruction::Imm {
            opcode: *opcode,
            imm: lookup(label)? - pc,
        },
        AsmInstruction::Branch {
            opcode,
            rs1,
            rs2,
            label,
        } => Instruction::Branch {
            opcode: *opcode,
            rs1: *rs1,
            rs2: *rs2,
            imm: lookup(label)? - pc,
        },
    })
}
