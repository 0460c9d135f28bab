//! 6502 CPU emulation for the NES.
//!
//! Table-driven: [`instructions::INSTRUCTIONS`] maps each opcode to an addressing mode,
//! an operation, and a base cycle count. Documented plus stable undocumented opcodes;
//! JAM and unstable opcodes fault. Bus trait used for memory and I/O.

pub mod cpu;
pub mod flags;
pub mod instructions;

pub use cpu::CPU;
pub use flags::StatusFlags;
