//! Battery-backed work RAM persisted beside the ROM as `<rom>.sav`.
//!
//! Loading and saving never fail the caller: a missing or wrong-sized file just
//! leaves the RAM zeroed, and I/O errors are logged.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::bus::BusDevice;
use crate::error::BusError;
use crate::memory::Ram;

pub struct BatteryRam {
    ram: Ram,
    sav_path: PathBuf,
    dirty: bool,
}

impl BatteryRam {
    /// Create `size` bytes of RAM keyed to `rom_path`, restoring a previous save if one exists.
    pub fn open(size: usize, rom_path: &Path) -> Self {
        let sav_path = append_suffix(rom_path.as_os_str(), ".sav");
        let mut ram = Ram::new(size);

        match fs::read(&sav_path) {
            Ok(bytes) if bytes.len() == size => {
                ram.as_mut_slice().copy_from_slice(&bytes);
                log::info!("loaded save RAM from {}", sav_path.display());
            }
            Ok(bytes) => log::warn!(
                "ignoring {}: expected {size} bytes, found {}",
                sav_path.display(),
                bytes.len()
            ),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("error reading {}: {err}", sav_path.display()),
        }

        Self {
            ram,
            sav_path,
            dirty: false,
        }
    }

    pub fn sav_path(&self) -> &Path {
        &self.sav_path
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    /// Write the RAM out if it changed since the last persist.
    pub fn persist(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let tmp_file = append_suffix(self.sav_path.as_os_str(), ".tmp");
        fs::write(&tmp_file, self.ram.as_slice())?;
        fs::rename(&tmp_file, &self.sav_path)?;

        self.dirty = false;
        Ok(())
    }
}

/// `game.nes` keeps its extension: the save is `game.nes.sav`.
fn append_suffix(path: &OsStr, suffix: &str) -> PathBuf {
    let mut path = path.to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

impl BusDevice for BatteryRam {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        Ok(self.ram.read(addr as usize))
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.ram.write(addr as usize, data);
        self.dirty = true;
        Ok(())
    }
}

impl Drop for BatteryRam {
    fn drop(&mut self) {
        if let Err(err) = self.persist() {
            log::warn!("error writing {}: {err}", self.sav_path.display());
        }
    }
}
