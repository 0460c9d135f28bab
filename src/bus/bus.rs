//! Address-range routing shared by the CPU and PPU buses.
//!
//! A [`DataBus`] maps every address of its space to at most one device tag. Devices
//! are attached once at wiring time with [`DataBus::connect`]; reads and writes are
//! resolved to the owning tag and handed to whoever owns the devices through
//! [`Devices::with_device`]. The CPU side is 16-bit ($0000–$FFFF), the PPU side
//! 14-bit ($0000–$3FFF).

use std::fmt;

use crate::error::BusError;

/// Byte-level access implemented by everything attached to a bus.
///
/// Reads take `&mut self` because some devices have read side effects
/// (PPUSTATUS clears vblank, PPUDATA advances its address, joypads shift).
pub trait BusDevice {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError>;
    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError>;
}

/// Memory access as seen by a processor (CPU or PPU).
pub trait Bus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError>;
    fn write(&mut self, addr: u16, data: u8) -> Result<(), BusError>;
}

/// Resolves a device tag to the device itself for the duration of one access.
pub trait Devices<D> {
    fn with_device<R>(&mut self, device: D, f: impl FnOnce(&mut dyn BusDevice) -> R) -> R;
}

/// Address-range router: each address belongs to exactly one device or none.
pub struct DataBus<D> {
    limit: u16,
    slots: Vec<Option<D>>,
}

impl<D: Copy + fmt::Debug> DataBus<D> {
    /// Create an empty bus whose highest valid address is `limit`.
    pub fn new(limit: u16) -> Self {
        Self {
            limit,
            slots: vec![None; limit as usize + 1],
        }
    }

    pub fn limit(&self) -> u16 {
        self.limit
    }

    /// Attach `device` to the inclusive range `start..=end`.
    ///
    /// Fails without changing the map if the range leaves the address space or
    /// touches an address another device already owns.
    pub fn connect(&mut self, device: D, start: u16, end: u16) -> Result<(), BusError> {
        if start > end {
            return Err(BusError::InvalidRange { start, end });
        }
        if end > self.limit {
            return Err(BusError::OutOfRange {
                start,
                end,
                limit: self.limit,
            });
        }

        let range = start as usize..=end as usize;
        if let Some(taken) = self.slots[range.clone()].iter().position(Option::is_some) {
            return Err(BusError::Overlap {
                address: start + taken as u16,
            });
        }

        self.slots[range].fill(Some(device));
        log::debug!("bus: {device:?} at ${start:04X}-${end:04X}");
        Ok(())
    }

    /// The device that owns `addr`, if any.
    pub fn owner(&self, addr: u16) -> Option<D> {
        self.slots.get(addr as usize).copied().flatten()
    }

    pub fn route(&self, addr: u16) -> Result<D, BusError> {
        self.owner(addr).ok_or(BusError::Unmapped { address: addr })
    }

    pub fn read(&self, devices: &mut impl Devices<D>, addr: u16) -> Result<u8, BusError> {
        let device = self.route(addr)?;
        devices.with_device(device, |d| d.read_byte(addr))
    }

    pub fn write(&self, devices: &mut impl Devices<D>, addr: u16, data: u8) -> Result<(), BusError> {
        let device = self.route(addr)?;
        devices.with_device(device, |d| d.write_byte(addr, data))
    }
}
