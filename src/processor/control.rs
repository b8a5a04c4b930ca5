use std::collections::BTreeMap;
use std::fmt;

use super::alu::AluOp;
use super::datapath::DataPath;
use super::Fault;
use crate::constants;
use crate::isa::{Instruction, Opcode, Register};
use crate::{Tick, Word};

/// Outcome of one execution cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    Continue,
    Halted,
}

/// Folds an immediate into the word domain.
///
/// The fold is asymmetric on purpose: one past the maximum maps to one past
/// the minimum, not to the minimum itself. Values more than one domain away
/// are not meaningful and simply truncate.
fn bound(num: i64) -> Word {
    const MAX: i64 = Word::max_value() as i64;
    const MIN: i64 = Word::min_value() as i64;
    if num > MAX {
        (MIN + (num - MAX)) as Word
    } else if num < MIN {
        (MAX - (num - MIN)) as Word
    } else {
        num as Word
    }
}

/// Fetch/decode/execute sequencing at tick granularity, including the
/// interrupt admission logic.
pub struct ControlUnit {
    data_path: DataPath,
    schedule: BTreeMap<Tick, char>,
    is_interrupted: bool,
    last_instr: Option<Instruction>,
    instr_counter: u64,
    ticks: Tick,
}

impl ControlUnit {
    pub fn new(data_path: DataPath, schedule: BTreeMap<Tick, char>) -> ControlUnit {
        ControlUnit {
            data_path,
            schedule,
            is_interrupted: false,
            last_instr: None,
            instr_counter: 0,
            ticks: 0,
        }
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn current_tick(&self) -> Tick {
        self.ticks
    }

    pub fn instr_count(&self) -> u64 {
        self.instr_counter
    }

    pub fn is_interrupted(&self) -> bool {
        self.is_interrupted
    }

    pub fn data_path(&self) -> &DataPath {
        &self.data_path
    }

    pub(crate) fn data_path_mut(&mut self) -> &mut DataPath {
        &mut self.data_path
    }

    fn inc_program_counter(&mut self) -> Result<(), Fault> {
        let pc = self.data_path.register(Register::Pc);
        self.data_path.latch_alu(pc, 1, AluOp::Add)?;
        self.data_path.latch_result_to_register(Register::Pc);
        self.tick();
        Ok(())
    }

    fn push_program_counter(&mut self) -> Result<(), Fault> {
        let sp = self.data_path.register(Register::Sp);
        self.data_path.latch_alu(sp, 1, AluOp::Sub)?;
        self.data_path.latch_result_to_register(Register::Sp);
        self.tick();
        let sp = self.data_path.register(Register::Sp);
        self.data_path.latch_alu(sp, 0, AluOp::Add)?;
        self.data_path.latch_result_to_mem_addr();
        self.data_path.mem_write(Register::Pc)?;
        self.tick();
        Ok(())
    }

    // The stack pointer moves down here as well; the interrupt flow never
    // reuses a stack slot.
    fn pop_program_counter(&mut self) -> Result<(), Fault> {
        let sp = self.data_path.register(Register::Sp);
        self.data_path.latch_alu(sp, 0, AluOp::Add)?;
        self.data_path.latch_result_to_mem_addr();
        self.data_path.mem_read(Register::Pc)?;
        self.tick();
        self.data_path.latch_alu(sp, 1, AluOp::Sub)?;
        self.data_path.latch_result_to_register(Register::Sp);
        self.tick();
        Ok(())
    }

    /// Admits at most one scheduled interrupt: the latest entry whose due
    /// tick has passed wins, and every entry due so far is dropped from the
    /// schedule. Only the freshest character is ever delivered.
    fn admit_interrupt(&mut self) -> Result<bool, Fault> {
        if self.is_interrupted {
            return Ok(false);
        }
        let now = self.ticks;
        let pending = self.schedule.range(..=now).next_back().map(|(_, &ch)| ch);
        let ch = match pending {
            Some(ch) => ch,
            None => return Ok(false),
        };
        self.schedule = self.schedule.split_off(&(now + 1));
        self.is_interrupted = true;
        self.push_program_counter()?;
        let vector = self.data_path.data_at(constants::IRQ_VECTOR_ADDR)?;
        self.data_path.set_register(Register::Pc, vector);
        self.data_path.set_input(ch);
        self.tick();
        Ok(true)
    }

    /// One full execution cycle: fetch, interrupt admission, decode,
    /// execute, advance.
    pub fn step(&mut self) -> Result<Step, Fault> {
        let pc = self.data_path.register(Register::Pc);
        self.data_path.latch_alu(pc, 0, AluOp::Add)?;
        self.data_path.latch_result_to_mem_addr();
        self.tick();
        let instr = self.data_path.fetch_instr()?;

        self.last_instr = Some(instr);
        self.instr_counter += 1;

        // An admitted interrupt preempts the fetched instruction; it will
        // be fetched again after iret.
        if self.admit_interrupt()? {
            return Ok(Step::Continue);
        }

        match instr.opcode() {
            Opcode::Hlt => return Ok(Step::Halted),
            Opcode::Iret => {
                self.is_interrupted = false;
                self.pop_program_counter()?;
                return Ok(Step::Continue);
            }
            _ => {}
        }

        if instr.rd() == Some(Register::R0) {
            return Err(Fault::ZeroRegisterModification);
        }

        let (op1, op2) = match instr {
            Instruction::ThreeReg { rs1, rs2, .. } | Instruction::Branch { rs1, rs2, .. } => {
                (self.data_path.register(rs1), self.data_path.register(rs2))
            }
            Instruction::RegRegImm { rs, imm, .. } => (self.data_path.register(rs), bound(imm)),
            Instruction::RegReg { rs, .. } => (self.data_path.register(rs), 0),
            Instruction::Imm { imm, .. } => (bound(imm), self.data_path.register(Register::Pc)),
            Instruction::Plain { .. } => return Err(Fault::MalformedInstruction),
        };

        let alu_op = match instr.opcode() {
            Opcode::Add | Opcode::Addi | Opcode::Ld | Opcode::St | Opcode::Jmp => AluOp::Add,
            Opcode::Sub | Opcode::Subi | Opcode::Beq => AluOp::Sub,
            Opcode::Mul => AluOp::Mul,
            Opcode::Div => AluOp::Div,
            Opcode::Rem => AluOp::Rem,
            Opcode::Iret | Opcode::Hlt => return Err(Fault::MalformedInstruction),
        };
        self.data_path.latch_alu(op1, op2, alu_op)?;

        match instr {
            Instruction::ThreeReg { rd, .. } | Instruction::RegRegImm { rd, .. } => {
                self.data_path.latch_result_to_register(rd);
                self.tick();
                self.inc_program_counter()?;
            }
            Instruction::RegReg { rd, .. } => {
                self.data_path.latch_result_to_mem_addr();
                match instr.opcode() {
                    Opcode::Ld => {
                        if self.data_path.at_input_cell() {
                            self.data_path.io_get(rd)?;
                        } else {
                            self.data_path.mem_read(rd)?;
                        }
                    }
                    Opcode::St => {
                        if self.data_path.at_output_cell() {
                            self.data_path.io_put(rd)?;
                        } else {
                            self.data_path.mem_write(rd)?;
                        }
                    }
                    _ => return Err(Fault::MalformedInstruction),
                }
                self.tick();
                self.inc_program_counter()?;
            }
            Instruction::Imm { .. } => {
                self.data_path.latch_result_to_register(Register::Pc);
                self.tick();
            }
            Instruction::Branch { imm, .. } => {
                if self.data_path.zf() {
                    self.tick();
                    let pc = self.data_path.register(Register::Pc);
                    self.data_path.latch_alu(pc, bound(imm), AluOp::Add)?;
                    self.data_path.latch_result_to_register(Register::Pc);
                    self.tick();
                } else {
                    self.inc_program_counter()?;
                }
            }
            Instruction::Plain { .. } => unreachable!(),
        }

        Ok(Step::Continue)
    }
}

impl fmt::Display for ControlUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "is_interrupted: {} | PC: {} | instr_counter: {} | tick: {} | last_instr: {:?}",
            self.is_interrupted,
            self.data_path.register(Register::Pc),
            self.instr_counter,
            self.ticks,
            self.last_instr,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_is_identity_in_range() {
        assert_eq!(bound(0), 0);
        assert_eq!(bound(-17), -17);
        assert_eq!(bound(Word::max_value() as i64), Word::max_value());
        assert_eq!(bound(Word::min_value() as i64), Word::min_value());
    }

    #[test]
    fn bound_folds_asymmetrically() {
        assert_eq!(bound(Word::max_value() as i64 + 1), Word::min_value() + 1);
        assert_eq!(bound(Word::max_value() as i64 + 2), Word::min_value() + 2);
    }
}
