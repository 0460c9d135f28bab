//! Plain RAM and ROM blocks plus the mirror adapter.

use crate::bus::BusDevice;
use crate::error::BusError;

/// Power-of-two sized RAM. Addresses are masked into the block, so a 2 KiB
/// block answers any address and repeats every 2 KiB.
#[derive(Debug, Clone)]
pub struct Ram {
    data: Box<[u8]>,
    mask: usize,
}

impl Ram {
    pub fn new(size: usize) -> Self {
        assert!(size.is_power_of_two(), "RAM size {size} is not a power of two");
        Self {
            data: vec![0; size].into_boxed_slice(),
            mask: size - 1,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn read(&self, offset: usize) -> u8 {
        self.data[offset & self.mask]
    }

    pub fn write(&mut self, offset: usize, data: u8) {
        self.data[offset & self.mask] = data;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl BusDevice for Ram {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        Ok(self.read(addr as usize))
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.write(addr as usize, data);
        Ok(())
    }
}

/// Read-only image split into fixed-size banks. Indexing past the end panics:
/// callers wrap bank numbers with [`Rom::bank_count`] first.
#[derive(Debug, Clone)]
pub struct Rom {
    data: Box<[u8]>,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of whole `bank_size` banks, at least 1 so modulo arithmetic stays defined.
    pub fn bank_count(&self, bank_size: usize) -> usize {
        (self.data.len() / bank_size).max(1)
    }

    pub fn read(&self, offset: usize) -> u8 {
        self.data[offset]
    }

    /// Byte `offset` inside bank `bank`, with the bank number wrapped.
    pub fn read_banked(&self, bank: usize, bank_size: usize, offset: usize) -> u8 {
        let bank = bank % self.bank_count(bank_size);
        self.data[bank * bank_size + offset]
    }
}

/// Exposes a device at a second address range by shifting addresses down by `base`.
pub struct Mirrored<'a, D: BusDevice + ?Sized> {
    inner: &'a mut D,
    base: u16,
}

impl<'a, D: BusDevice + ?Sized> Mirrored<'a, D> {
    pub fn new(inner: &'a mut D, base: u16) -> Self {
        Self { inner, base }
    }
}

impl<D: BusDevice + ?Sized> BusDevice for Mirrored<'_, D> {
    fn read_byte(&mut self, addr: u16) -> Result<u8, BusError> {
        self.inner.read_byte(addr.wrapping_sub(self.base))
    }

    fn write_byte(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.inner.write_byte(addr.wrapping_sub(self.base), data)
    }
}
