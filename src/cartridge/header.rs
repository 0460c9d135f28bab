//! iNES / NES 2.0 header parsing.
//!
//! [iNES](https://www.nesdev.org/wiki/INES): magic "NES\x1A", PRG size in 16 KiB units,
//! CHR size in 8 KiB units, flags 6 (mirroring, battery, trainer, four-screen, mapper low
//! nibble) and flags 7 (mapper high nibble, [NES 2.0](https://www.nesdev.org/wiki/NES_2.0)
//! identifier). NES 2.0 images extend the mapper number with byte 8.

use crate::cartridge::mapper::Mirroring;
use crate::error::LoadError;

pub const HEADER_LEN: usize = 16;
pub const TRAINER_LEN: usize = 512;
pub const PRG_BANK_LEN: usize = 0x4000;
pub const CHR_BANK_LEN: usize = 0x2000;

const MAGIC: &[u8; 4] = b"NES\x1A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct INesHeader {
    /// PRG ROM size in 16 KiB banks.
    pub prg_banks: usize,
    /// CHR ROM size in 8 KiB banks; 0 means the board uses CHR RAM.
    pub chr_banks: usize,
    pub mapper: u16,
    pub submapper: u8,
    pub mirroring: Mirroring,
    /// Battery-backed ("non-volatile") work RAM at $6000–$7FFF.
    pub battery: bool,
    pub trainer: bool,
    pub nes2: bool,
}

impl INesHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, LoadError> {
        if bytes.len() < HEADER_LEN {
            return Err(LoadError::HeaderTooShort { len: bytes.len() });
        }
        if &bytes[0..4] != MAGIC {
            return Err(LoadError::BadMagic);
        }

        let flags6 = bytes[6];
        let flags7 = bytes[7];
        let flags8 = bytes[8];
        let nes2 = (flags7 >> 2) & 0b11 == 0b10;

        let mut mapper = ((flags7 & 0xF0) | (flags6 >> 4)) as u16;
        let mut submapper = 0;
        let mut prg_banks = bytes[4] as usize;
        let mut chr_banks = bytes[5] as usize;
        if nes2 {
            mapper |= ((flags8 & 0x0F) as u16) << 8;
            submapper = flags8 >> 4;
            // Exponent-multiplier sizes (MSB nibble $F) are not supported.
            if bytes[9] & 0x0F != 0x0F {
                prg_banks |= ((bytes[9] & 0x0F) as usize) << 8;
            }
            if bytes[9] >> 4 != 0x0F {
                chr_banks |= ((bytes[9] >> 4) as usize) << 8;
            }
        }

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(Self {
            prg_banks,
            chr_banks,
            mapper,
            submapper,
            mirroring,
            battery: flags6 & 0x02 != 0,
            trainer: flags6 & 0x04 != 0,
            nes2,
        })
    }

    pub fn prg_len(&self) -> usize {
        self.prg_banks * PRG_BANK_LEN
    }

    pub fn chr_len(&self) -> usize {
        self.chr_banks * CHR_BANK_LEN
    }

    /// Offset of PRG ROM in the image: after the header and the optional trainer.
    pub fn prg_offset(&self) -> usize {
        HEADER_LEN + if self.trainer { TRAINER_LEN } else { 0 }
    }
}
