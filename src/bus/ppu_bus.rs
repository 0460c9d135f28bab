//! The PPU's 14-bit address space.
//!
//! Pattern tables come from the cartridge, nametables from console VRAM (with a
//! partial mirror at $3000–$3EFF), and palette RAM fills $3F00–$3FFF.

use crate::{
    bus::{Bus, BusDevice, DataBus, Devices},
    cartridge::Cartridge,
    error::BusError,
    memory::{Mirrored, NameTableRam, PaletteRam},
};

pub const PPU_ADDR_MASK: u16 = 0x3FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuDevice {
    PatternTables,
    NameTables,
    NameTablesMirror,
    Palette,
}

/// Wire the PPU address map.
pub fn ppu_map() -> Result<DataBus<PpuDevice>, BusError> {
    let mut map = DataBus::new(PPU_ADDR_MASK);
    map.connect(PpuDevice::PatternTables, 0x0000, 0x1FFF)?;
    map.connect(PpuDevice::NameTables, 0x2000, 0x2FFF)?;
    map.connect(PpuDevice::NameTablesMirror, 0x3000, 0x3EFF)?;
    map.connect(PpuDevice::Palette, 0x3F00, 0x3FFF)?;
    Ok(map)
}

/// The PPU's bus, borrowed from the console for the duration of one dot or one
/// register access.
pub struct PpuBus<'a> {
    map: &'a DataBus<PpuDevice>,
    cartridge: &'a mut Cartridge,
    nametables: &'a mut NameTableRam,
    palette: &'a mut PaletteRam,
}

impl<'a> PpuBus<'a> {
    pub fn new(
        map: &'a DataBus<PpuDevice>,
        cartridge: &'a mut Cartridge,
        nametables: &'a mut NameTableRam,
        palette: &'a mut PaletteRam,
    ) -> Self {
        Self {
            map,
            cartridge,
            nametables,
            palette,
        }
    }
}

impl Devices<PpuDevice> for PpuBus<'_> {
    fn with_device<R>(
        &mut self,
        device: PpuDevice,
        f: impl FnOnce(&mut dyn BusDevice) -> R,
    ) -> R {
        match device {
            PpuDevice::PatternTables => f(&mut self.cartridge.graphics()),
            PpuDevice::NameTables => f(&mut *self.nametables),
            PpuDevice::NameTablesMirror => f(&mut Mirrored::new(&mut *self.nametables, 0x1000)),
            PpuDevice::Palette => f(&mut *self.palette),
        }
    }
}

impl Bus for PpuBus<'_> {
    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        let map = self.map;
        map.read(self, addr & PPU_ADDR_MASK)
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        let map = self.map;
        map.write(self, addr & PPU_ADDR_MASK, data)
    }
}
