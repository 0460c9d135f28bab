//! 6502 processor status register (P) flag bits.

use bitflags::bitflags;

bitflags! {
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 1 << 0;
        const ZERO = 1 << 1;
        const INTERRUPT_DISABLE = 1 << 2;
        const DECIMAL = 1 << 3;  // Stored but ignored: the 2A03 has no decimal mode
        const BREAK = 1 << 4;    // Only exists in pushed copies of P
        const UNUSED = 1 << 5;   // Always 1 when read
        const OVERFLOW = 1 << 6;
        const NEGATIVE = 1 << 7;
    }
}
