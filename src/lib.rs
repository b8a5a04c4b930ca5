//! Simulator core for a small register-memory machine.
//!
//! The machine executes the instruction set defined in [`isa`](isa/index.html)
//! at single-tick granularity: every latch of the data path (ALU result to a
//! register, a memory access, a program-counter write) costs one tick.
//! Input and output are memory mapped; input characters are delivered by a
//! tick-stamped interrupt schedule that the control unit polls at fetch time.
//!
//! The crate is a library only. The assembler lives in the `simasm` crate,
//! the program-object codec in `simobj` and the command line driver in
//! `simx`.

extern crate num;
#[macro_use]
extern crate num_derive;

pub mod constants;
pub mod isa;
pub mod processor;

pub use crate::processor::{Error, Fault, Machine};

/// The machine word. Every datum in memory and every register is one of
/// these.
pub type Word = i32;

/// The simulator clock. Ticks only move forward.
pub type Tick = u64;
