//! Program object format shared by the assembler and the simulator.
//!
//! A program object is the record `{start, code}`: the code-relative index
//! of the entry point plus the ordered instruction sequence. The on-disk
//! encoding is JSON with a fixed field order, so assembling the same source
//! twice yields byte-identical artifacts and golden files can be compared
//! verbatim.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use simcpu::isa::Instruction;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjError {
    #[error("reading or writing the program object failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("program object is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("instruction {index} does not match the shape of its opcode")]
    ShapeMismatch { index: usize },
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    start: u32,
    code: Vec<Instruction>,
}

impl Program {
    pub fn from(start: u32, code: Vec<Instruction>) -> Program {
        Program { start, code }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn code(&self) -> &[Instruction] {
        &self.code[..]
    }

    /// Checks that every instruction carries the operand set its opcode
    /// demands. Decoding re-derives the shape from the field names, so a
    /// hand-edited object could otherwise smuggle in a mismatched record.
    pub fn validate(&self) -> Result<(), ObjError> {
        for (index, instr) in self.code.iter().enumerate() {
            if !instr.is_well_formed() {
                return Err(ObjError::ShapeMismatch { index });
            }
        }
        Ok(())
    }
}

pub fn read<R: Read>(reader: &mut R) -> Result<Program, ObjError> {
    let program: Program = serde_json::from_reader(reader)?;
    program.validate()?;
    Ok(program)
}

pub fn write<W: Write>(writer: &mut W, program: &Program) -> Result<(), ObjError> {
    serde_json::to_writer(writer, program)?;
    Ok(())
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Program, ObjError> {
    read(&mut BufReader::new(File::open(path)?))
}

pub fn write_file<P: AsRef<Path>>(path: P, program: &Program) -> Result<(), ObjError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, program)
}

#[cfg(test)]
mod test;
