//! Mapper 1 (MMC1): bank switching via 5-bit shift register.
//!
//! [MMC1](https://www.nesdev.org/wiki/MMC1): writes to $8000–$9FFF (control), $A000–$BFFF (CHR0),
//! $C000–$DFFF (CHR1), $E000–$FFFF (PRG bank). Any write with bit 7 set resets the shift register.
//! Otherwise, bit 0 is shifted in (LSB first); on the fifth write the value is latched to the
//! register selected by bits 13–14 of that write's address. Control bits 0–1 = mirroring,
//! bits 2–3 = PRG mode, bit 4 = CHR mode.

use crate::cartridge::mapper::{ChrMemory, Mirroring, mapper::Mapper};
use crate::memory::Rom;

const PRG_BANK: usize = 0x4000;
const CHR_BANK: usize = 0x1000;

/// MMC1 state: shift register, control byte, CHR and PRG bank selects.
pub struct Mapper1 {
    prg_rom: Rom,
    chr: ChrMemory,
    shift_reg: u8,
    shift_count: u8,
    control: u8,
    chr_bank0: u8,
    chr_bank1: u8,
    prg_bank: u8,
}

impl Mapper1 {
    /// Control powers up as $0C (PRG mode 3: $8000 switchable, $C000 fixed last).
    pub fn new(prg_rom: Rom, chr: ChrMemory) -> Self {
        Self {
            prg_rom,
            chr,
            shift_reg: 0,
            shift_count: 0,
            control: 0x0C,
            chr_bank0: 0,
            chr_bank1: 0,
            prg_bank: 0,
        }
    }

    /// PRG bank mode from control bits 2–3: 0/1 = 32 KiB mode; 2 = $8000 fixed first,
    /// $C000 switchable; 3 = $8000 switchable, $C000 fixed last.
    fn prg_bank_mode(&self) -> u8 {
        (self.control >> 2) & 0b11
    }

    fn commit(&mut self, addr: u16, value: u8) {
        match (addr >> 13) & 0b11 {
            0 => self.control = value,
            1 => self.chr_bank0 = value,
            2 => self.chr_bank1 = value,
            _ => self.prg_bank = value & 0x0F,
        }
        log::debug!(
            "MMC1: control ${:02X} chr ${:02X}/${:02X} prg ${:02X}",
            self.control,
            self.chr_bank0,
            self.chr_bank1,
            self.prg_bank
        );
    }
}

impl Mapper for Mapper1 {
    fn read_program(&self, addr: u16) -> u8 {
        let upper = addr >= 0xC000;
        let last = self.prg_rom.bank_count(PRG_BANK) - 1;
        let prg = self.prg_bank as usize;

        let bank = match self.prg_bank_mode() {
            0 | 1 => (prg & 0x0E) | upper as usize,
            2 if upper => prg,
            2 => 0,
            _ if upper => last,
            _ => prg,
        };
        self.prg_rom.read_banked(bank, PRG_BANK, addr as usize & 0x3FFF)
    }

    fn write_program(&mut self, addr: u16, data: u8) {
        if data & 0x80 != 0 {
            self.shift_reg = 0;
            self.shift_count = 0;
            self.control |= 0x0C;
            return;
        }

        self.shift_reg >>= 1;
        self.shift_reg |= (data & 1) << 4;
        self.shift_count += 1;

        if self.shift_count < 5 {
            return;
        }

        self.commit(addr, self.shift_reg & 0x1F);
        self.shift_reg = 0;
        self.shift_count = 0;
    }

    fn read_graphics(&self, addr: u16) -> u8 {
        let (bank, offset) = self.chr_bank(addr);
        self.chr.read(bank, CHR_BANK, offset)
    }

    fn write_graphics(&mut self, addr: u16, data: u8) {
        let (bank, offset) = self.chr_bank(addr);
        self.chr.write(bank, CHR_BANK, offset, data);
    }

    fn nvram_size(&self) -> usize {
        0x2000
    }

    /// Mirroring from control bits 0–1: 0 = one-screen lower, 1 = one-screen upper, 2 = vertical, 3 = horizontal.
    fn mirroring(&self) -> Option<Mirroring> {
        Some(match self.control & 0b11 {
            0 => Mirroring::SingleScreenLower,
            1 => Mirroring::SingleScreenUpper,
            2 => Mirroring::Vertical,
            _ => Mirroring::Horizontal,
        })
    }
}

impl Mapper1 {
    /// 4 KiB CHR bank and offset for a PPU address. Control bit 4 clear = one 8 KiB bank.
    fn chr_bank(&self, addr: u16) -> (usize, usize) {
        let upper = addr & 0x1000 != 0;
        let bank = if self.control & 0x10 == 0 {
            (self.chr_bank0 & 0x1E) as usize | upper as usize
        } else if upper {
            self.chr_bank1 as usize
        } else {
            self.chr_bank0 as usize
        };
        (bank, addr as usize & 0x0FFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mmc1(prg_banks: usize) -> Mapper1 {
        let mut prg = vec![0; prg_banks * PRG_BANK];
        for bank in 0..prg_banks {
            prg[bank * PRG_BANK] = bank as u8;
        }
        Mapper1::new(Rom::new(prg), ChrMemory::new(Vec::new()))
    }

    fn serial_write(mapper: &mut Mapper1, addr: u16, value: u8) {
        for bit in 0..5 {
            mapper.write_program(addr, (value >> bit) & 1);
        }
    }

    #[test]
    fn fifth_write_commits_to_register_selected_by_address() {
        let mut mapper = mmc1(8);

        serial_write(&mut mapper, 0xE000, 0b00101);
        assert_eq!(mapper.prg_bank, 5);

        serial_write(&mut mapper, 0xA000, 0b10011);
        assert_eq!(mapper.chr_bank0, 0b10011);

        serial_write(&mut mapper, 0xC000, 0b00001);
        assert_eq!(mapper.chr_bank1, 1);

        serial_write(&mut mapper, 0x8000, 0b11110);
        assert_eq!(mapper.control, 0b11110);
    }

    #[test]
    fn four_writes_change_nothing() {
        let mut mapper = mmc1(8);
        for _ in 0..4 {
            mapper.write_program(0xE000, 1);
        }

        assert_eq!(mapper.prg_bank, 0);
    }

    #[test]
    fn reset_bit_clears_shift_and_forces_fixed_last_mode() {
        let mut mapper = mmc1(8);
        serial_write(&mut mapper, 0x8000, 0b00000);
        assert_eq!(mapper.prg_bank_mode(), 0);

        mapper.write_program(0xE000, 1);
        mapper.write_program(0xE000, 1);
        mapper.write_program(0x8000, 0x80);
        assert_eq!(mapper.prg_bank_mode(), 3);

        serial_write(&mut mapper, 0xE000, 0b00010);
        assert_eq!(mapper.prg_bank, 2);
    }

    #[test]
    fn prg_modes_place_banks() {
        let mut mapper = mmc1(8);
        serial_write(&mut mapper, 0xE000, 3);

        // Mode 3: switchable low, last bank high.
        assert_eq!(mapper.read_program(0x8000), 3);
        assert_eq!(mapper.read_program(0xC000), 7);

        // Mode 2: first bank low, switchable high.
        serial_write(&mut mapper, 0x8000, 0b01000);
        assert_eq!(mapper.read_program(0x8000), 0);
        assert_eq!(mapper.read_program(0xC000), 3);

        // 32 KiB mode ignores bit 0 of the bank number.
        serial_write(&mut mapper, 0x8000, 0b00000);
        assert_eq!(mapper.read_program(0x8000), 2);
        assert_eq!(mapper.read_program(0xC000), 3);
    }

    #[test]
    fn control_selects_mirroring() {
        let mut mapper = mmc1(2);
        for (bits, expected) in [
            (0, Mirroring::SingleScreenLower),
            (1, Mirroring::SingleScreenUpper),
            (2, Mirroring::Vertical),
            (3, Mirroring::Horizontal),
        ] {
            serial_write(&mut mapper, 0x8000, 0x0C | bits);
            assert_eq!(mapper.mirroring(), Some(expected));
        }
    }

    #[test]
    fn chr_ram_banks_in_4k_mode() {
        let mut mapper = mmc1(2);
        serial_write(&mut mapper, 0x8000, 0x1C);
        serial_write(&mut mapper, 0xA000, 1);
        serial_write(&mut mapper, 0xC000, 0);

        mapper.write_graphics(0x0010, 0xAA);
        assert_eq!(mapper.read_graphics(0x1010), 0);

        serial_write(&mut mapper, 0xC000, 1);
        assert_eq!(mapper.read_graphics(0x1010), 0xAA);
    }
}
