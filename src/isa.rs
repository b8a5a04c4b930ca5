//! Instruction set shared by the assembler and the machine.
//!
//! Every opcode belongs to exactly one instruction shape; the shape decides
//! which operand fields an instruction carries. [`Instruction`](enum.Instruction.html)
//! is a tagged sum with one variant per shape, so a well-formed instruction
//! cannot carry the wrong operand set. Serialized form is a flat record of
//! the opcode plus the shape's fields, which keeps program objects stable
//! for byte-level comparison.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    //  Mnemonic | Shape | Effect
    //-----------+-------+----------------------------------------------
    Ld,   //     | C     | rd <- mem[rs]
    St,   //     | C     | mem[rs] <- rd
    Jmp,  //     | D     | pc <- pc + imm
    Beq,  //     | E     | if rs1 == rs2: pc <- pc + imm
    Add,  //     | A     | rd <- rs1 + rs2
    Addi, //     | B     | rd <- rs + imm
    Sub,  //     | A     | rd <- rs1 - rs2
    Subi, //     | B     | rd <- rs - imm
    Mul,  //     | A     | rd <- rs1 * rs2
    Div,  //     | A     | rd <- rs1 / rs2 (floor)
    Rem,  //     | A     | rd <- rs1 % rs2 (sign of divisor)
    Iret, //     | F     | return from interrupt
    Hlt,  //     | F     | stop the machine
}

/// The six operand layouts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InstrKind {
    A, // rd, rs1, rs2
    B, // rd, rs, imm
    C, // rd, rs
    D, // imm
    E, // rs1, rs2, imm
    F, // no operands
}

impl Opcode {
    /// The shape this opcode is allowed to appear in.
    pub fn kind(self) -> InstrKind {
        match self {
            Opcode::Ld | Opcode::St => InstrKind::C,
            Opcode::Jmp => InstrKind::D,
            Opcode::Beq => InstrKind::E,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Rem => InstrKind::A,
            Opcode::Addi | Opcode::Subi => InstrKind::B,
            Opcode::Iret | Opcode::Hlt => InstrKind::F,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Opcode::Ld => "ld",
            Opcode::St => "st",
            Opcode::Jmp => "jmp",
            Opcode::Beq => "beq",
            Opcode::Add => "add",
            Opcode::Addi => "addi",
            Opcode::Sub => "sub",
            Opcode::Subi => "subi",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Rem => "rem",
            Opcode::Iret => "iret",
            Opcode::Hlt => "hlt",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, FromPrimitive, ToPrimitive)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    R0, // Always zero (read only)
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    Pc, // Program counter
    Sp, // Stack pointer
}

impl Register {
    pub fn as_str(self) -> &'static str {
        match self {
            Register::R0 => "r0",
            Register::R1 => "r1",
            Register::R2 => "r2",
            Register::R3 => "r3",
            Register::R4 => "r4",
            Register::R5 => "r5",
            Register::R6 => "r6",
            Register::R7 => "r7",
            Register::Pc => "pc",
            Register::Sp => "sp",
        }
    }
}

macro_rules! impl_enum_display {
    ($e:ty) => {
        impl fmt::Display for $e {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_enum_display!(Opcode);
impl_enum_display!(Register);

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseEnumError {
    value: String,
    enum_name: &'static str,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Failed to parse \"{}\" as {}.",
            &self.value, &self.enum_name
        )
    }
}

impl StdError for ParseEnumError {}

impl FromStr for Opcode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Opcode, ParseEnumError> {
        match s {
            "ld" => Ok(Opcode::Ld),
            "st" => Ok(Opcode::St),
            "jmp" => Ok(Opcode::Jmp),
            "beq" => Ok(Opcode::Beq),
            "add" => Ok(Opcode::Add),
            "addi" => Ok(Opcode::Addi),
            "sub" => Ok(Opcode::Sub),
            "subi" => Ok(Opcode::Subi),
            "mul" => Ok(Opcode::Mul),
            "div" => Ok(Opcode::Div),
            "rem" => Ok(Opcode::Rem),
            "iret" => Ok(Opcode::Iret),
            "hlt" => Ok(Opcode::Hlt),
            _ => Err(ParseEnumError {
                value: s.to_string(),
                enum_name: "Opcode",
            }),
        }
    }
}

impl FromStr for Register {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Register, ParseEnumError> {
        match s {
            "r0" => Ok(Register::R0),
            "r1" => Ok(Register::R1),
            "r2" => Ok(Register::R2),
            "r3" => Ok(Register::R3),
            "r4" => Ok(Register::R4),
            "r5" => Ok(Register::R5),
            "r6" => Ok(Register::R6),
            "r7" => Ok(Register::R7),
            "pc" => Ok(Register::Pc),
            "sp" => Ok(Register::Sp),
            _ => Err(ParseEnumError {
                value: s.to_string(),
                enum_name: "Register",
            }),
        }
    }
}

/// One machine instruction, tagged by shape.
///
/// Immediates are kept as `i64`: the assembler emits label differences and
/// raw digit runs, and the machine folds them into the 32-bit word domain
/// only when an instruction executes.
///
/// The serde representation is untagged, so a serialized instruction is the
/// plain record `{"opcode": ..}` plus the shape's operand fields. Variants
/// with four fields are listed first; no variant's field set is a subset of
/// an earlier one, which makes decoding unambiguous.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instruction {
    /// Shape A: register-register-register arithmetic.
    ThreeReg {
        opcode: Opcode,
        rd: Register,
        rs1: Register,
        rs2: Register,
    },
    /// Shape B: register-immediate arithmetic.
    RegRegImm {
        opcode: Opcode,
        rd: Register,
        rs: Register,
        imm: i64,
    },
    /// Shape E: conditional branch, PC-relative.
    Branch {
        opcode: Opcode,
        rs1: Register,
        rs2: Register,
        imm: i64,
    },
    /// Shape C: memory access; `rs` holds the address.
    RegReg {
        opcode: Opcode,
        rd: Register,
        rs: Register,
    },
    /// Shape D: unconditional jump, PC-relative.
    Imm { opcode: Opcode, imm: i64 },
    /// Shape F: no operands.
    Plain { opcode: Opcode },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match *self {
            Instruction::ThreeReg { opcode, .. }
            | Instruction::RegRegImm { opcode, .. }
            | Instruction::Branch { opcode, .. }
            | Instruction::RegReg { opcode, .. }
            | Instruction::Imm { opcode, .. }
            | Instruction::Plain { opcode } => opcode,
        }
    }

    /// The shape actually carried by this instruction.
    pub fn kind(&self) -> InstrKind {
        match *self {
            Instruction::ThreeReg { .. } => InstrKind::A,
            Instruction::RegRegImm { .. } => InstrKind::B,
            Instruction::RegReg { .. } => InstrKind::C,
            Instruction::Imm { .. } => InstrKind::D,
            Instruction::Branch { .. } => InstrKind::E,
            Instruction::Plain { .. } => InstrKind::F,
        }
    }

    /// The destination register, for the shapes that have one.
    pub fn rd(&self) -> Option<Register> {
        match *self {
            Instruction::ThreeReg { rd, .. }
            | Instruction::RegRegImm { rd, .. }
            | Instruction::RegReg { rd, .. } => Some(rd),
            _ => None,
        }
    }

    /// Whether the carried shape agrees with the opcode's static shape.
    pub fn is_well_formed(&self) -> bool {
        self.kind() == self.opcode().kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_shapes() {
        assert_eq!(Opcode::Ld.kind(), InstrKind::C);
        assert_eq!(Opcode::St.kind(), InstrKind::C);
        assert_eq!(Opcode::Jmp.kind(), InstrKind::D);
        assert_eq!(Opcode::Beq.kind(), InstrKind::E);
        assert_eq!(Opcode::Addi.kind(), InstrKind::B);
        assert_eq!(Opcode::Rem.kind(), InstrKind::A);
        assert_eq!(Opcode::Hlt.kind(), InstrKind::F);
    }

    #[test]
    fn round_trip_names() {
        for s in &[
            "ld", "st", "jmp", "beq", "add", "addi", "sub", "subi", "mul", "div", "rem", "iret",
            "hlt",
        ] {
            let opcode: Opcode = s.parse().unwrap();
            assert_eq!(opcode.as_str(), *s);
        }
        assert!("nop".parse::<Opcode>().is_err());
        assert!("r8".parse::<Register>().is_err());
    }

    #[test]
    fn well_formedness_tracks_the_opcode() {
        let good = Instruction::RegReg {
            opcode: Opcode::Ld,
            rd: Register::R1,
            rs: Register::R2,
        };
        let bad = Instruction::RegReg {
            opcode: Opcode::Add,
            rd: Register::R1,
            rs: Register::R2,
        };
        assert!(good.is_well_formed());
        assert!(!bad.is_well_formed());
    }
}
