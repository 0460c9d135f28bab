//! Palette RAM ($3F00–$3FFF on the PPU bus, 32 bytes repeated).
//!
//! Entries $3F10/$3F14/$3F18/$3F1C are mirrors of $3F00/$3F04/$3F08/$3F0C: the
//! sprite palettes share their colour 0 slot with the background palettes.

use crate::bus::BusDevice;
use crate::error::BusError;

pub struct PaletteRam {
    entries: [u8; 32],
}

impl PaletteRam {
    pub fn new() -> Self {
        Self { entries: [0; 32] }
    }

    fn index(addr: u16) -> usize {
        let i = (addr & 0x1F) as usize;
        if i & 0x13 == 0x10 { i & 0x0F } else { i }
    }
}

impl Default for PaletteRam {
    fn default() -> Self {
        Self::new()
    }
}

impl BusDevice for PaletteRam {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        Ok(self.entries[Self::index(addr)])
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.entries[Self::index(addr)] = data & 0x3F;
        Ok(())
    }
}
