//! Assembler for the simcpu register machine.
//!
//! The entry point is [`translate`](fn.translate.html), which takes the
//! source text of a program and produces a [`Program`](../simobj/struct.Program.html)
//! object ready to be written with the `simobj` crate.
//!
//! Parsing is implemented with [pest]; syntax errors carry the usual pest
//! source positions and render with a caret under the offending token.
//!
//! # Assembly Language
//!
//! A program is a sequence of labeled blocks. A label is a word followed by
//! a colon; the instructions after it belong to that label until the next
//! one. Every instruction must appear under some label.
//!
//! Two labels are reserved: `_start` marks the entry point and must exist,
//! `_int` marks the interrupt handler and may be omitted when no input is
//! scheduled. The assembler moves the `_int` block to the front of the
//! emitted code so the runtime interrupt vector can always point at the
//! program base.
//!
//! Operands are separated by a comma and a single space. Register operands
//! are `r0`-`r7`, `pc` and `sp`; `r0` always reads as zero and cannot be
//! written. Jump and branch targets are labels, resolved to PC-relative
//! offsets at assembly time.
//!
//! Quick reference:
//!
//! Mnemonic | Short Description             | Syntax
//! ---------|-------------------------------|----------------------
//! `ld`     | Load from memory              | `ld rd, rs`
//! `st`     | Store to memory               | `st rd, rs`
//! `jmp`    | Jump                          | `jmp target`
//! `beq`    | Branch if equal               | `beq rs1, rs2, target`
//! `add`    | Integer addition              | `add rd, rs1, rs2`
//! `addi`   | Integer addition immediate    | `addi rd, rs, value`
//! `sub`    | Integer subtraction           | `sub rd, rs1, rs2`
//! `subi`   | Integer subtraction immediate | `subi rd, rs, value`
//! `mul`    | Integer multiplication        | `mul rd, rs1, rs2`
//! `div`    | Integer division (floor)      | `div rd, rs1, rs2`
//! `rem`    | Integer remainder             | `rem rd, rs1, rs2`
//! `iret`   | Return from interrupt         | `iret`
//! `hlt`    | Stop the machine              | `hlt`
//!
//! The memory shape addresses through a register: `ld r1, r2` reads the
//! cell whose address is in `r2` into `r1`, and `st r1, r2` writes `r1` to
//! that cell. The two topmost memory cells are mapped to the input and
//! output buffers.
//!
//! ```text
//! _int:
//!     ld r3, r1
//!     st r3, r2
//!     iret
//! _start:
//!     addi r1, r0, 98
//!     addi r2, r0, 99
//! loop:
//!     jmp loop
//! ```
//!
//! [pest]: https://docs.rs/pest/

mod assembler;
mod error;
mod parser;


pub use crate::assembler::translate;
pub use crate::error::AsmError;
pub use crate::parser::{tokenize, AsmInstruction, Rule, TokenGroup};
