//! Memory buses for the NES.
//!
//! [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map) and
//! [PPU memory map](https://www.nesdev.org/wiki/PPU_memory_map): each side is a
//! [`DataBus`] of device tags wired once at power-up, plus the owner of the devices
//! ([`NesBus`] for the CPU, the borrowed [`PpuBus`] view for the PPU).

pub mod bus;
pub mod nes_bus;
pub mod ppu_bus;

pub use bus::{Bus, BusDevice, DataBus, Devices};
pub use nes_bus::{CpuDevice, NesBus};
pub use ppu_bus::{PpuBus, PpuDevice};

#[cfg(test)]
mod tests;
