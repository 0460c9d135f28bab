//! The console: CPU and PPU clocked together over the shared buses.
//!
//! One [`Nes::step`] is one CPU cycle followed by three PPU dots (NTSC). NMI
//! requests and frame completion come back from the PPU as [`PpuTick`](crate::ppu::PpuTick)
//! values and are applied here, so neither chip holds a handle to the other.

use std::io;
use std::path::Path;

use crate::{
    bus::NesBus,
    cartridge::Cartridge,
    controller::Buttons,
    cpu::CPU,
    error::NesError,
};

pub const PPU_DOTS_PER_CPU_CYCLE: usize = 3;

/// Cycles the CPU is suspended for an OAM DMA; one more when it starts on an odd cycle.
pub const OAM_DMA_CYCLES: u32 = 513;

pub struct Nes {
    cpu: CPU<NesBus>,
    frame_ready: bool,
}

impl Nes {
    /// Wire a console around `cartridge`. Call [`Nes::reset`] before stepping.
    pub fn new(cartridge: Cartridge) -> Result<Self, NesError> {
        let bus = NesBus::new(cartridge)?;
        Ok(Self {
            cpu: CPU::new(bus),
            frame_ready: false,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NesError> {
        Self::new(Cartridge::load(path)?)
    }

    pub fn reset(&mut self) -> Result<(), NesError> {
        self.cpu.bus.reset();
        self.cpu.reset()?;
        self.frame_ready = false;
        Ok(())
    }

    pub fn cpu(&self) -> &CPU<NesBus> {
        &self.cpu
    }

    pub fn bus(&self) -> &NesBus {
        &self.cpu.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.cpu.bus
    }

    /// Advance one CPU cycle and three PPU dots.
    pub fn step(&mut self) -> Result<(), NesError> {
        self.cpu.clock()?;

        for _ in 0..PPU_DOTS_PER_CPU_CYCLE {
            let tick = self.cpu.bus.step_ppu()?;
            if tick.nmi {
                self.cpu.nmi();
            }
            if tick.frame_complete {
                self.frame_ready = true;
            }
        }

        if let Some(page) = self.cpu.bus.take_dma_request() {
            self.cpu.bus.oam_dma(page)?;
            let odd_cycle = self.cpu.cycles % 2 == 1;
            self.cpu.stall(OAM_DMA_CYCLES + odd_cycle as u32);
        }
        Ok(())
    }

    /// Step until the PPU enters vblank.
    pub fn run_frame(&mut self) -> Result<(), NesError> {
        self.frame_ready = false;
        while !self.frame_ready {
            self.step()?;
        }
        Ok(())
    }

    /// True once vblank has started since the flag was last taken.
    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    /// 256×240 pixels, 0xRRGGBB.
    pub fn frame_buffer(&self) -> &[u32] {
        self.cpu.bus.ppu().framebuffer()
    }

    /// Buttons held on controller port 0 or 1; other ports are ignored.
    pub fn set_buttons(&mut self, port: usize, buttons: Buttons) {
        match self.cpu.bus.controllers_mut().get_mut(port) {
            Some(controller) => controller.set_buttons(buttons),
            None => log::warn!("no controller port {port}"),
        }
    }

    /// Write battery RAM to disk now; it is also written when the console is dropped.
    pub fn persist_save(&mut self) -> io::Result<()> {
        self.cpu.bus.cartridge_mut().persist_save()
    }
}
