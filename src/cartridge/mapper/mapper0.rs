//! Mapper 0 (NROM): no bank switching, 16/32KB PRG, 8KB CHR, 8KB work RAM.

use crate::cartridge::mapper::{ChrMemory, mapper::Mapper};
use crate::memory::Rom;

/// NROM mapper: fixed PRG and CHR, 16KB PRG mirrored into $C000.
pub struct Mapper0 {
    prg_rom: Rom,
    chr: ChrMemory,
}

impl Mapper0 {
    pub fn new(prg_rom: Rom, chr: ChrMemory) -> Self {
        Self { prg_rom, chr }
    }
}

impl Mapper for Mapper0 {
    fn read_program(&self, addr: u16) -> u8 {
        let mask = if self.prg_rom.len() > 0x4000 { 0x7FFF } else { 0x3FFF };
        self.prg_rom.read(addr as usize & mask)
    }

    fn write_program(&mut self, addr: u16, data: u8) {
        log::warn!("write ${data:02X} to NROM PRG ROM at ${addr:04X} ignored");
    }

    fn read_graphics(&self, addr: u16) -> u8 {
        self.chr.read(0, 0x2000, addr as usize & 0x1FFF)
    }

    fn write_graphics(&mut self, addr: u16, data: u8) {
        self.chr.write(0, 0x2000, addr as usize & 0x1FFF, data);
    }

    fn nvram_size(&self) -> usize {
        0x2000
    }
}
