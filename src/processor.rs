mod alu;
mod control;
mod datapath;

pub use self::control::{ControlUnit, Step};
pub use self::datapath::{Cell, DataPath};

use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::constants;
use crate::isa::{Instruction, Register};
use crate::{Tick, Word};

/// Setup problems, detected before the machine starts ticking.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("memory size {0} is below the required minimum of 100")]
    MemoryTooSmall(usize),
    #[error("program of {0} instructions does not fit below the mapped I/O cells")]
    ProgramTooLarge(usize),
    #[error("instruction {0} does not match the shape of its opcode")]
    MalformedProgram(usize),
}

/// Everything that can stop the machine abnormally while it runs.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fault {
    #[error("attempt to modify the hard-wired zero register")]
    ZeroRegisterModification,
    #[error("memory cell {0} holds an instruction, not data")]
    DataExpected(usize),
    #[error("memory cell {0} holds data, not an instruction")]
    CodeExpected(usize),
    #[error("memory address {0} is outside the address space")]
    MemoryOutOfRange(Word),
    #[error("input buffer is empty")]
    OutOfInputBuffer,
    #[error("register value {0} is not a valid character code")]
    BadCharCode(Word),
    #[error("division by zero")]
    DivisionByZero,
    #[error("instruction shape does not match its opcode")]
    MalformedInstruction,
    #[error("instruction limit of {0} exceeded")]
    LimitExceeded(u64),
}

/// The whole machine: data path plus control unit.
///
/// [`load`](#method.load) installs a program the way the runtime expects it:
/// the interrupt vector at cell 0 points at the program base, the code sits
/// contiguously from the base and the program counter starts at the
/// program's entry point. The stack pointer descends from the cell just
/// below the mapped input cell.
pub struct Machine {
    control: ControlUnit,
}

impl Machine {
    pub fn new(memory_size: usize, schedule: BTreeMap<Tick, char>) -> Result<Machine, Error> {
        if memory_size < constants::MIN_MEMORY_SIZE {
            return Err(Error::MemoryTooSmall(memory_size));
        }
        Ok(Machine {
            control: ControlUnit::new(DataPath::new(memory_size), schedule),
        })
    }

    /// Places `code` at the program base and prepares the machine to run
    /// from instruction `start` (a code-relative index).
    pub fn load(&mut self, start: u32, code: &[Instruction]) -> Result<(), Error> {
        let data_path = self.control.data_path_mut();

        if constants::PROGRAM_BASE + code.len() > data_path.memory_size() - 2 {
            return Err(Error::ProgramTooLarge(code.len()));
        }
        for (i, instr) in code.iter().enumerate() {
            if !instr.is_well_formed() {
                return Err(Error::MalformedProgram(i));
            }
        }

        data_path.install(
            constants::IRQ_VECTOR_ADDR,
            Cell::Data(constants::PROGRAM_BASE as Word),
        );
        for (i, instr) in code.iter().enumerate() {
            data_path.install(constants::PROGRAM_BASE + i, Cell::Instr(*instr));
        }
        data_path.set_register(
            Register::Pc,
            (constants::PROGRAM_BASE + start as usize) as Word,
        );
        Ok(())
    }

    /// Drives the control unit until `hlt`, a fault, or the instruction
    /// limit. Counters and the output buffer stay readable afterwards
    /// either way.
    pub fn run(&mut self, limit: u64) -> Result<(), Fault> {
        loop {
            if self.control.instr_count() > limit {
                return Err(Fault::LimitExceeded(limit));
            }
            match self.control.step()? {
                Step::Halted => return Ok(()),
                Step::Continue => debug!("{}", self.control),
            }
        }
    }

    pub fn register(&self, id: Register) -> Word {
        self.control.data_path().register(id)
    }

    pub fn output(&self) -> String {
        self.control.data_path().output()
    }

    pub fn instr_count(&self) -> u64 {
        self.control.instr_count()
    }

    pub fn ticks(&self) -> Tick {
        self.control.current_tick()
    }

    pub fn is_interrupted(&self) -> bool {
        self.control.is_interrupted()
    }
}
