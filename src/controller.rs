//! NES controller input handling.
//!
//! Implements the standard NES controller shift register protocol:
//! write 1 then 0 to $4016 to latch current state; then read $4016/$4017 repeatedly
//! to get one bit per read (A, B, Select, Start, Up, Down, Left, Right).
//! [Standard controller](https://www.nesdev.org/wiki/Standard_controller)

use bitflags::bitflags;

bitflags! {
    /// Button bits in the order the shift register reports them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const LEFT = 1 << 6;
        const RIGHT = 1 << 7;
    }
}

/// A standard joypad on one controller port.
#[derive(Debug, Default)]
pub struct Controller {
    /// Buttons currently held, as set by the host.
    pub buttons: Buttons,
    /// Shift register: latched from `buttons`; shifted out LSB-first on read.
    shift: u8,
    /// While high, the register reloads continuously and reads return A.
    strobe: bool,
}

impl Controller {
    /// Create a new controller with no buttons pressed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.buttons = buttons;
    }

    /// Read one button state. Returns bit 0 of the shift register OR'd with open bus ($40).
    /// After all eight buttons the official pad reports 1.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            self.shift = self.buttons.bits();
        }
        let bit = self.shift & 1;
        if !self.strobe {
            self.shift = (self.shift >> 1) | 0x80;
        }
        bit | 0x40
    }

    /// Write to $4016. Bit 0 drives the strobe line; the state is latched while it is high.
    pub fn write(&mut self, data: u8) {
        self.strobe = data & 1 != 0;
        if self.strobe {
            self.shift = self.buttons.bits();
        }
    }
}
