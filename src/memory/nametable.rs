//! Nametable RAM ($2000–$2FFF on the PPU bus) with cartridge-selected mirroring.
//!
//! [Mirroring](https://www.nesdev.org/wiki/Mirroring): the console has 2 KiB of
//! nametable RAM for four logical 1 KiB tables. The cartridge decides which
//! physical table each logical quadrant uses; four-screen boards add the other 2 KiB.

use crate::bus::BusDevice;
use crate::cartridge::mapper::Mirroring;
use crate::error::BusError;

const TABLE_SIZE: usize = 0x400;

pub struct NameTableRam {
    tables: [[u8; TABLE_SIZE]; 4],
    mirroring: Mirroring,
}

impl NameTableRam {
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            tables: [[0; TABLE_SIZE]; 4],
            mirroring,
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Physical table backing logical quadrant 0–3.
    fn table(&self, quadrant: usize) -> usize {
        match self.mirroring {
            Mirroring::Horizontal => quadrant >> 1,
            Mirroring::Vertical => quadrant & 1,
            Mirroring::SingleScreenLower => 0,
            Mirroring::SingleScreenUpper => 1,
            Mirroring::FourScreen => quadrant,
        }
    }

    fn locate(&self, addr: u16) -> (usize, usize) {
        let quadrant = ((addr >> 10) & 3) as usize;
        (self.table(quadrant), addr as usize & (TABLE_SIZE - 1))
    }
}

impl BusDevice for NameTableRam {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        let (table, offset) = self.locate(addr);
        Ok(self.tables[table][offset])
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        let (table, offset) = self.locate(addr);
        self.tables[table][offset] = data;
        Ok(())
    }
}
