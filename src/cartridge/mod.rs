//! NES cartridge loading and mapper support.
//!
//! - **header**: iNES / NES 2.0 header fields.
//! - **cartridge**: Loads iNES (.nes) images, owns the mapper and $6000–$7FFF work RAM.
//! - **mapper**: NROM (0), MMC1 (1), UxROM (2); PRG/CHR bank switching and nametable mirroring.

pub mod cartridge;
pub mod header;
pub mod mapper;

pub use cartridge::Cartridge;
pub use header::INesHeader;

#[cfg(test)]
mod tests;
