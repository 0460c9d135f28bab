//! NES cartridge loading from iNES format (.nes files).
//!
//! Implements the [iNES](https://www.nesdev.org/wiki/INES) layout: 16-byte header, optional
//! 512-byte trainer, PRG ROM, then CHR ROM. CHR is RAM when the header declares no CHR banks.
//! [Mapper](https://www.nesdev.org/wiki/Mapper) implements CPU PRG ($8000–$FFFF) and PPU CHR
//! ($0000–$1FFF) address decoding and bank switching; the cartridge owns the $6000–$7FFF
//! work RAM the mapper declares.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::bus::BusDevice;
use crate::cartridge::header::INesHeader;
use crate::cartridge::mapper::{ChrMemory, Mapper, Mapper0, Mapper1, Mapper2, Mirroring};
use crate::error::{BusError, LoadError};
use crate::memory::{BatteryRam, Ram, Rom};

/// Work RAM at $6000–$7FFF: battery-backed when the header says so.
enum WorkRam {
    Volatile(Ram),
    Battery(BatteryRam),
}

impl WorkRam {
    fn device(&mut self) -> &mut dyn BusDevice {
        match self {
            WorkRam::Volatile(ram) => ram,
            WorkRam::Battery(sram) => sram,
        }
    }
}

/// Cartridge: header, the mapper that implements PRG/CHR banking and mirroring, and work RAM.
pub struct Cartridge {
    header: INesHeader,
    mapper: Box<dyn Mapper>,
    work_ram: Option<WorkRam>,
    path: Option<PathBuf>,
}

impl Cartridge {
    /// Load a cartridge from an iNES file. Battery RAM is keyed to `<path>.sav`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, Some(path))
    }

    /// Build a cartridge from an in-memory image. Without `rom_path`, battery RAM
    /// degrades to volatile RAM.
    pub fn from_bytes(bytes: &[u8], rom_path: Option<&Path>) -> Result<Self, LoadError> {
        let header = INesHeader::parse(bytes)?;

        let prg_start = header.prg_offset();
        if header.trainer && bytes.len() < prg_start {
            return Err(LoadError::Truncated {
                section: "trainer",
                expected: prg_start,
                actual: bytes.len(),
            });
        }
        if header.prg_banks == 0 {
            return Err(LoadError::Truncated {
                section: "PRG ROM",
                expected: 1,
                actual: 0,
            });
        }

        let prg_end = prg_start + header.prg_len();
        let chr_end = prg_end + header.chr_len();
        let prg = bytes.get(prg_start..prg_end).ok_or(LoadError::Truncated {
            section: "PRG ROM",
            expected: header.prg_len(),
            actual: bytes.len().saturating_sub(prg_start),
        })?;
        let chr = bytes.get(prg_end..chr_end).ok_or(LoadError::Truncated {
            section: "CHR ROM",
            expected: header.chr_len(),
            actual: bytes.len().saturating_sub(prg_end),
        })?;

        let prg_rom = Rom::new(prg.to_vec());
        let chr = ChrMemory::new(chr.to_vec());
        let chr_ram = chr.is_ram();
        let mapper: Box<dyn Mapper> = match header.mapper {
            0 => Box::new(Mapper0::new(prg_rom, chr)),
            1 => Box::new(Mapper1::new(prg_rom, chr)),
            2 => Box::new(Mapper2::new(prg_rom, chr)),
            mapper => return Err(LoadError::UnsupportedMapper { mapper }),
        };

        let work_ram = match (mapper.nvram_size(), header.battery, rom_path) {
            (0, _, _) => None,
            (size, true, Some(path)) => Some(WorkRam::Battery(BatteryRam::open(size, path))),
            (size, battery, _) => {
                if battery {
                    log::warn!("battery RAM has no backing file; saves will be lost");
                }
                Some(WorkRam::Volatile(Ram::new(size)))
            }
        };

        log::info!(
            "loaded mapper {} ({} KiB PRG, {} KiB CHR{}), {:?} mirroring{}",
            header.mapper,
            header.prg_len() / 1024,
            (if chr_ram { ChrMemory::RAM_SIZE } else { header.chr_len() }) / 1024,
            if chr_ram { " RAM" } else { "" },
            header.mirroring,
            if header.battery { ", battery" } else { "" },
        );

        Ok(Self {
            header,
            mapper,
            work_ram,
            path: rom_path.map(Path::to_path_buf),
        })
    }

    pub fn header(&self) -> &INesHeader {
        &self.header
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current nametable mirroring: four-screen boards are fixed, otherwise the
    /// mapper's runtime choice wins over the header's solder pad.
    pub fn mirroring(&self) -> Mirroring {
        if self.header.mirroring == Mirroring::FourScreen {
            return Mirroring::FourScreen;
        }
        self.mapper.mirroring().unwrap_or(self.header.mirroring)
    }

    /// CPU read in $4020–$FFFF.
    pub fn read_program(&mut self, addr: u16) -> Result<u8, BusError> {
        match addr {
            0x8000..=0xFFFF => Ok(self.mapper.read_program(addr)),
            0x6000..=0x7FFF => match &mut self.work_ram {
                Some(ram) => ram.device().read_byte(addr - 0x6000),
                None => Ok(0),
            },
            // Expansion area: nothing connected.
            _ => Ok(0),
        }
    }

    /// CPU write in $4020–$FFFF.
    pub fn write_program(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        match addr {
            0x8000..=0xFFFF => self.mapper.write_program(addr, data),
            0x6000..=0x7FFF => {
                if let Some(ram) = &mut self.work_ram {
                    ram.device().write_byte(addr - 0x6000, data)?;
                }
            }
            _ => log::trace!("expansion write ${data:02X} at ${addr:04X} ignored"),
        }
        Ok(())
    }

    /// PPU read in $0000–$1FFF.
    pub fn read_graphics(&self, addr: u16) -> u8 {
        self.mapper.read_graphics(addr & 0x1FFF)
    }

    /// PPU write in $0000–$1FFF.
    pub fn write_graphics(&mut self, addr: u16, data: u8) {
        self.mapper.write_graphics(addr & 0x1FFF, data);
    }

    /// Flush battery RAM to its save file now instead of waiting for drop.
    pub fn persist_save(&mut self) -> io::Result<()> {
        match &mut self.work_ram {
            Some(WorkRam::Battery(sram)) => sram.persist(),
            _ => Ok(()),
        }
    }

    /// Bus view of the CPU side ($4020–$FFFF).
    pub fn program(&mut self) -> ProgramSpace<'_> {
        ProgramSpace(self)
    }

    /// Bus view of the PPU side ($0000–$1FFF).
    pub fn graphics(&mut self) -> GraphicsSpace<'_> {
        GraphicsSpace(self)
    }
}

pub struct ProgramSpace<'a>(&'a mut Cartridge);

impl BusDevice for ProgramSpace<'_> {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        self.0.read_program(addr)
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.0.write_program(addr, data)
    }
}

pub struct GraphicsSpace<'a>(&'a mut Cartridge);

impl BusDevice for GraphicsSpace<'_> {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        Ok(self.0.read_graphics(addr))
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.0.write_graphics(addr, data);
        Ok(())
    }
}
