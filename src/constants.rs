pub const REGISTER_COUNT: usize = 10;

/// Memory cell holding the address of the interrupt handler.
pub const IRQ_VECTOR_ADDR: usize = 0;

/// First memory cell occupied by program code.
pub const PROGRAM_BASE: usize = 20;

/// The memory map reserves the vector cell, the scratch/stack region below
/// [`PROGRAM_BASE`](constant.PROGRAM_BASE.html) and the two mapped I/O cells
/// at the top, so anything smaller cannot hold a program.
pub const MIN_MEMORY_SIZE: usize = 100;

pub const DEFAULT_MEMORY_SIZE: usize = 100;
pub const DEFAULT_INSTR_LIMIT: u64 = 10_000;
