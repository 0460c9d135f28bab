//! Error types for bus wiring, CPU execution, and cartridge loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Address-space wiring and routing faults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("range ${start:04X}-${end:04X} exceeds the bus limit ${limit:04X}")]
    OutOfRange { start: u16, end: u16, limit: u16 },
    #[error("range start ${start:04X} is past its end ${end:04X}")]
    InvalidRange { start: u16, end: u16 },
    #[error("address ${address:04X} is already owned by another device")]
    Overlap { address: u16 },
    #[error("no device is mapped at ${address:04X}")]
    Unmapped { address: u16 },
}

/// Faults raised while the CPU executes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("illegal opcode ${opcode:02X} at ${address:04X}")]
    IllegalOpcode { opcode: u8, address: u16 },
    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Failures turning a `.nes` image into a [`Cartridge`](crate::cartridge::Cartridge).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("header should be 16 bytes, image is {len} bytes")]
    HeaderTooShort { len: usize },
    #[error("missing \"NES\\x1A\" magic")]
    BadMagic,
    #[error("{section} truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported mapper {mapper}")]
    UnsupportedMapper { mapper: u16 },
}

/// Everything the [`Nes`](crate::nes::Nes) driver can fail with.
#[derive(Error, Debug)]
pub enum NesError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error(transparent)]
    Bus(#[from] BusError),
}
