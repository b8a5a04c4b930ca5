//! Simulator driver: loads a program object and an interrupt schedule,
//! runs the machine and reports the output buffer and counters.
//!
//! The schedule file is a JSON object mapping due ticks to single
//! characters, e.g. `{"20": "H", "60": "i"}`. The machine delivers each
//! character by interrupting the program; see the `simcpu` crate for the
//! admission rules.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use simcpu::{Fault, Machine, Tick};
use simobj::Program;
use thiserror::Error;

pub type Schedule = BTreeMap<Tick, char>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("reading an input file failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("input schedule is not valid JSON: {0}")]
    Schedule(#[from] serde_json::Error),
    #[error("schedule entry \"{0}\" is not a single character")]
    BadScheduleEntry(String),
    #[error("{0}")]
    Obj(#[from] simobj::ObjError),
    #[error("{0}")]
    Asm(#[from] simasm::AsmError),
    #[error("{0}")]
    Machine(#[from] simcpu::Error),
}

/// What the driver prints after a run. The counters are reported even when
/// the machine stopped on a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub output: String,
    pub instr: u64,
    pub ticks: Tick,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "output: {}\ninstr: {}  ticks: {}",
            self.output, self.instr, self.ticks
        )
    }
}

pub fn parse_schedule(text: &str) -> Result<Schedule, Error> {
    let raw: BTreeMap<Tick, String> = serde_json::from_str(text)?;
    raw.into_iter()
        .map(|(tick, entry)| {
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok((tick, ch)),
                _ => Err(Error::BadScheduleEntry(entry)),
            }
        })
        .collect()
}

pub fn read_schedule<P: AsRef<Path>>(path: P) -> Result<Schedule, Error> {
    parse_schedule(&fs::read_to_string(path)?)
}

/// Runs a loaded program to completion. The outer `Result` is for setup
/// problems; the inner one reports how the machine stopped, next to the
/// counters it accumulated either way.
pub fn run_program(
    program: &Program,
    schedule: Schedule,
    memory_size: usize,
    limit: u64,
) -> Result<(Report, Result<(), Fault>), Error> {
    let mut machine = Machine::new(memory_size, schedule)?;
    machine.load(program.start(), program.code())?;

    let outcome = machine.run(limit);
    let report = Report {
        output: machine.output(),
        instr: machine.instr_count(),
        ticks: machine.ticks(),
    };
    Ok((report, outcome))
}

pub fn run_object<P: AsRef<Path>, Q: AsRef<Path>>(
    program_path: P,
    input_path: Q,
    memory_size: usize,
    limit: u64,
) -> Result<(Report, Result<(), Fault>), Error> {
    let program = simobj::read_file(program_path)?;
    let schedule = read_schedule(input_path)?;
    run_program(&program, schedule, memory_size, limit)
}

/// Convenience path that translates assembly source on the fly instead of
/// reading a program object.
pub fn run_source<P: AsRef<Path>, Q: AsRef<Path>>(
    source_path: P,
    input_path: Q,
    memory_size: usize,
    limit: u64,
) -> Result<(Report, Result<(), Fault>), Error> {
    let source = fs::read_to_string(source_path)?;
    let program = simasm::translate(&source)?;
    let schedule = read_schedule(input_path)?;
    run_program(&program, schedule, memory_size, limit)
}

#[cfg(test)]
mod test;
