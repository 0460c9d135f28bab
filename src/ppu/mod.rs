//! PPU (Picture Processing Unit) emulation for the NES.
//!
//! See [PPU](https://www.nesdev.org/wiki/PPU), [PPU registers](https://www.nesdev.org/wiki/PPU_registers),
//! [PPU scrolling](https://www.nesdev.org/wiki/PPU_scrolling), [PPU rendering](https://www.nesdev.org/wiki/PPU_rendering).
//! Handles 341-dot scanlines, 262 scanlines per frame, vblank NMI, background shift
//! registers, per-scanline sprite evaluation, OAM, and the framebuffer. Nametables,
//! palette RAM, and pattern data are reached through the PPU bus.

pub mod palette;
pub mod ppu;
pub mod registers;
pub mod sprites;

pub use ppu::{HEIGHT, PPU, PpuTick, WIDTH};
