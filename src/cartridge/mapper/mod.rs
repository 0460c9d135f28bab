//! NES mappers for PRG/CHR memory mapping.
//!
//! Mapper0 (NROM), Mapper1 (MMC1), Mapper2 (UxROM), and the pattern memory they share.

/// Nametable mirroring mode for PPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    SingleScreenLower,
    SingleScreenUpper,
    FourScreen,
}

/// CHR ROM, or 8 KiB of CHR RAM when the image ships no graphics banks.
pub struct ChrMemory {
    data: Box<[u8]>,
    writable: bool,
}

impl ChrMemory {
    pub const RAM_SIZE: usize = 0x2000;

    pub fn new(rom: Vec<u8>) -> Self {
        if rom.is_empty() {
            Self {
                data: vec![0; Self::RAM_SIZE].into_boxed_slice(),
                writable: true,
            }
        } else {
            Self {
                data: rom.into_boxed_slice(),
                writable: false,
            }
        }
    }

    pub fn is_ram(&self) -> bool {
        self.writable
    }

    fn bank_count(&self, bank_size: usize) -> usize {
        (self.data.len() / bank_size).max(1)
    }

    /// Byte `offset` inside bank `bank` of `bank_size`, bank number wrapped.
    pub fn read(&self, bank: usize, bank_size: usize, offset: usize) -> u8 {
        let bank = bank % self.bank_count(bank_size);
        self.data[bank * bank_size + offset]
    }

    pub fn write(&mut self, bank: usize, bank_size: usize, offset: usize, data: u8) {
        if !self.writable {
            log::trace!("ignored CHR ROM write ${data:02X}");
            return;
        }
        let bank = bank % self.bank_count(bank_size);
        self.data[bank * bank_size + offset] = data;
    }
}

pub mod mapper;

pub mod mapper0;
pub mod mapper1;
pub mod mapper2;

pub use mapper::Mapper;
pub use mapper0::Mapper0;
pub use mapper1::Mapper1;
pub use mapper2::Mapper2;
