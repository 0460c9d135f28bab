//! Famicore: a cycle-stepped NES (Nintendo Entertainment System) emulator core.
//!
//! Implements the NES chipset as documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide): Ricoh 2A03 CPU,
//! 2C02 PPU, cartridge mappers, and controller I/O. Audio is not emulated.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map) and
//!   [PPU memory map](https://www.nesdev.org/wiki/PPU_memory_map): address-range routing
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) / [NES 2.0](https://www.nesdev.org/wiki/NES_2.0)
//!   loading; [Mapper](https://www.nesdev.org/wiki/Mapper) NROM (0), MMC1 (1), UxROM (2)
//! - **controller** – [Controller reading](https://www.nesdev.org/wiki/Controller_reading): $4016 latch, shift-out
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: official + stable undocumented opcodes, [NMI](https://www.nesdev.org/wiki/NMI)
//! - **io** – $4000–$4017: joypads and [OAM DMA](https://www.nesdev.org/wiki/PPU_registers#OAMDMA)
//! - **memory** – RAM, ROM, mirrors, nametables, palette RAM, battery-backed save RAM
//! - **nes** – the console: 1 CPU cycle to 3 PPU dots
//! - **ppu** – [PPU](https://www.nesdev.org/wiki/PPU), [PPU registers](https://www.nesdev.org/wiki/PPU_registers), OAM, 256×240

pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod io;
pub mod memory;
pub mod nes;
pub mod ppu;

pub use error::{BusError, CpuError, LoadError, NesError};
pub use nes::Nes;
