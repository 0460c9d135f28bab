//! The $4000–$4017 register window: joypads, OAM DMA trigger, and APU registers.
//!
//! Audio is not emulated: APU writes are accepted and dropped, reads return 0.
//! A write to $4014 only records the source page; the system driver performs
//! the transfer and stalls the CPU.

use crate::bus::BusDevice;
use crate::controller::Controller;
use crate::error::BusError;

pub const OAM_DMA: u16 = 0x4014;
pub const JOYPAD1: u16 = 0x4016;
pub const JOYPAD2: u16 = 0x4017;

#[derive(Debug, Default)]
pub struct IoRegisters {
    pub controllers: [Controller; 2],
    dma_page: Option<u8>,
}

impl IoRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// The page latched by the last $4014 write, cleared on take.
    pub fn take_dma_request(&mut self) -> Option<u8> {
        self.dma_page.take()
    }
}

impl BusDevice for IoRegisters {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        Ok(match addr {
            JOYPAD1 => self.controllers[0].read(),
            JOYPAD2 => self.controllers[1].read(),
            _ => 0,
        })
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        match addr {
            OAM_DMA => self.dma_page = Some(data),
            // One strobe line feeds both ports.
            JOYPAD1 => {
                self.controllers[0].write(data);
                self.controllers[1].write(data);
            }
            _ => log::trace!("APU write ${data:02X} to ${addr:04X} ignored"),
        }
        Ok(())
    }
}
