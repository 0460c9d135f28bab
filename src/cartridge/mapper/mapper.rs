//! Mapper trait: PRG/CHR address translation, work RAM window, and mirroring.

use crate::cartridge::mapper::Mirroring;

/// Trait for NES cartridge mappers. The cartridge routes CPU $8000–$FFFF and
/// PPU $0000–$1FFF through these; $6000–$7FFF work RAM is owned by the cartridge
/// and sized by [`Mapper::nvram_size`].
pub trait Mapper {
    /// Read PRG at CPU $8000–$FFFF.
    fn read_program(&self, addr: u16) -> u8;
    /// Write to CPU $8000–$FFFF: bank registers, or ignored on ROM-only boards.
    fn write_program(&mut self, addr: u16, data: u8);
    /// Read CHR at PPU $0000–$1FFF.
    fn read_graphics(&self, addr: u16) -> u8;
    /// Write CHR RAM (ignored for CHR ROM).
    fn write_graphics(&mut self, addr: u16, data: u8);
    /// Size of the $6000–$7FFF work RAM window; 0 when the board has none.
    fn nvram_size(&self) -> usize {
        0
    }
    /// Mirroring chosen by the mapper at runtime; `None` defers to the header.
    fn mirroring(&self) -> Option<Mirroring> {
        None
    }
}
