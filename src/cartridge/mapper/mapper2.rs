//! Mapper 2 (UxROM): switchable 16KB bank at $8000, last bank fixed at $C000.
//!
//! [UxROM](https://www.nesdev.org/wiki/UxROM): any write to $8000–$FFFF selects the
//! lower bank. Boards without CHR ROM carry 8KB CHR RAM.

use crate::cartridge::mapper::{ChrMemory, mapper::Mapper};
use crate::memory::Rom;

const PRG_BANK: usize = 0x4000;

pub struct Mapper2 {
    prg_rom: Rom,
    chr: ChrMemory,
    prg_bank: u8,
}

impl Mapper2 {
    pub fn new(prg_rom: Rom, chr: ChrMemory) -> Self {
        Self {
            prg_rom,
            chr,
            prg_bank: 0,
        }
    }
}

impl Mapper for Mapper2 {
    fn read_program(&self, addr: u16) -> u8 {
        let bank = if addr < 0xC000 {
            self.prg_bank as usize
        } else {
            self.prg_rom.bank_count(PRG_BANK) - 1
        };
        self.prg_rom.read_banked(bank, PRG_BANK, addr as usize & 0x3FFF)
    }

    fn write_program(&mut self, _addr: u16, data: u8) {
        // Unconnected high bits wrap onto the banks that exist.
        self.prg_bank = (data as usize % self.prg_rom.bank_count(PRG_BANK)) as u8;
        log::debug!("UxROM: PRG bank {}", self.prg_bank);
    }

    fn read_graphics(&self, addr: u16) -> u8 {
        self.chr.read(0, 0x2000, addr as usize & 0x1FFF)
    }

    fn write_graphics(&mut self, addr: u16, data: u8) {
        self.chr.write(0, 0x2000, addr as usize & 0x1FFF, data);
    }
}
