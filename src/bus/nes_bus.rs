//! The CPU's view of the console.
//!
//! Owns every device on both buses: 2 KiB work RAM, the PPU and its VRAM, the
//! $4000–$4017 I/O window, and the cartridge. The PPU register window at
//! $2000–$3FFF repeats every 8 bytes.

use crate::{
    bus::{
        Bus, BusDevice, DataBus, Devices,
        ppu_bus::{PpuBus, PpuDevice, ppu_map},
    },
    cartridge::Cartridge,
    controller::Controller,
    error::BusError,
    io::IoRegisters,
    memory::{Mirrored, NameTableRam, PaletteRam, Ram},
    ppu::{PPU, PpuTick, sprites::OAM_LEN},
};

pub const RAM_SIZE: usize = 0x800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuDevice {
    Ram,
    /// $0800–$1FFF: the same 2 KiB seen again at `base`.
    RamMirror { base: u16 },
    PpuRegisters,
    Io,
    Cartridge,
}

/// Main NES bus: RAM, PPU, I/O registers, and cartridge.
pub struct NesBus {
    cpu_map: DataBus<CpuDevice>,
    ppu_map: DataBus<PpuDevice>,
    ram: Ram,
    ppu: PPU,
    io: IoRegisters,
    cartridge: Cartridge,
    nametables: NameTableRam,
    palette: PaletteRam,
}

/// PPU registers as a CPU bus device; register accesses may touch VRAM.
struct PpuPort<'a> {
    ppu: &'a mut PPU,
    bus: PpuBus<'a>,
}

impl BusDevice for PpuPort<'_> {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        self.ppu.read_register(addr, &mut self.bus)
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.ppu.write_register(addr, data, &mut self.bus)
    }
}

impl NesBus {
    /// Wire both address maps around `cartridge`.
    pub fn new(cartridge: Cartridge) -> Result<Self, BusError> {
        let mut cpu_map = DataBus::new(0xFFFF);
        cpu_map.connect(CpuDevice::Ram, 0x0000, 0x07FF)?;
        for base in [0x0800, 0x1000, 0x1800] {
            cpu_map.connect(CpuDevice::RamMirror { base }, base, base + 0x07FF)?;
        }
        cpu_map.connect(CpuDevice::PpuRegisters, 0x2000, 0x3FFF)?;
        cpu_map.connect(CpuDevice::Io, 0x4000, 0x4017)?;
        // $4018–$401F (CPU test mode) stays unmapped.
        cpu_map.connect(CpuDevice::Cartridge, 0x4020, 0xFFFF)?;

        Ok(Self {
            cpu_map,
            ppu_map: ppu_map()?,
            ram: Ram::new(RAM_SIZE),
            ppu: PPU::new(),
            io: IoRegisters::new(),
            nametables: NameTableRam::new(cartridge.mirroring()),
            palette: PaletteRam::new(),
            cartridge,
        })
    }

    pub fn cpu_map(&self) -> &DataBus<CpuDevice> {
        &self.cpu_map
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn ppu(&self) -> &PPU {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut PPU {
        &mut self.ppu
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cartridge
    }

    pub fn controllers_mut(&mut self) -> &mut [Controller; 2] {
        &mut self.io.controllers
    }

    /// Advance the PPU one dot on its own bus.
    pub fn step_ppu(&mut self) -> Result<PpuTick, BusError> {
        let mut bus = PpuBus::new(
            &self.ppu_map,
            &mut self.cartridge,
            &mut self.nametables,
            &mut self.palette,
        );
        self.ppu.step(&mut bus)
    }

    /// PPU access from outside the frame loop (debuggers, tests).
    pub fn read_vram(&mut self, addr: u16) -> Result<u8, BusError> {
        PpuBus::new(
            &self.ppu_map,
            &mut self.cartridge,
            &mut self.nametables,
            &mut self.palette,
        )
        .read(addr)
    }

    /// Page written to $4014 since the last call, if any.
    pub fn take_dma_request(&mut self) -> Option<u8> {
        self.io.take_dma_request()
    }

    /// Copy CPU page `page` ($XX00–$XXFF) into OAM through the CPU bus.
    pub fn oam_dma(&mut self, page: u8) -> Result<(), BusError> {
        let base = (page as u16) << 8;
        log::debug!("OAM DMA from ${base:04X}");
        let mut block = [0u8; OAM_LEN];
        for (i, byte) in block.iter_mut().enumerate() {
            *byte = self.read(base | i as u16)?;
        }
        self.ppu.write_oam_block(&block);
        Ok(())
    }

    /// Reset the PPU's registers and timing; RAM and the cartridge keep their contents.
    pub fn reset(&mut self) {
        self.ppu.reset();
        self.io.take_dma_request();
    }
}

impl Devices<CpuDevice> for NesBus {
    fn with_device<R>(
        &mut self,
        device: CpuDevice,
        f: impl FnOnce(&mut dyn BusDevice) -> R,
    ) -> R {
        match device {
            CpuDevice::Ram => f(&mut self.ram),
            CpuDevice::RamMirror { base } => f(&mut Mirrored::new(&mut self.ram, base)),
            CpuDevice::PpuRegisters => f(&mut PpuPort {
                ppu: &mut self.ppu,
                bus: PpuBus::new(
                    &self.ppu_map,
                    &mut self.cartridge,
                    &mut self.nametables,
                    &mut self.palette,
                ),
            }),
            CpuDevice::Io => f(&mut self.io),
            CpuDevice::Cartridge => f(&mut self.cartridge.program()),
        }
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        let device = self.cpu_map.route(addr)?;
        self.with_device(device, |d| d.read_byte(addr))
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        let device = self.cpu_map.route(addr)?;
        self.with_device(device, |d| d.write_byte(addr, data))?;

        // Mapper writes can switch nametable mirroring.
        if device == CpuDevice::Cartridge {
            self.nametables.set_mirroring(self.cartridge.mirroring());
        }
        Ok(())
    }
}
