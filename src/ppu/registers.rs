//! PPUCTRL, PPUMASK and PPUSTATUS bit layouts.

use bitflags::bitflags;

bitflags! {
    // 7  bit  0
    // ---- ----
    // VPHB SINN
    // |||| ||++- Base nametable (0 = $2000; 1 = $2400; 2 = $2800; 3 = $2C00)
    // |||| |+--- PPUDATA increment (0: add 1, across; 1: add 32, down)
    // |||| +---- Sprite pattern table for 8x8 sprites (0: $0000; 1: $1000)
    // |||+------ Background pattern table (0: $0000; 1: $1000)
    // ||+------- Sprite size (0: 8x8; 1: 8x16)
    // |+-------- Master/slave select, unused here
    // +--------- NMI at the start of vblank
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ControlRegister: u8 {
        const NAMETABLE_LOW = 0b0000_0001;
        const NAMETABLE_HIGH = 0b0000_0010;
        const VRAM_INCREMENT = 0b0000_0100;
        const SPRITE_PATTERN_ADDR = 0b0000_1000;
        const BACKGROUND_PATTERN_ADDR = 0b0001_0000;
        const SPRITE_SIZE = 0b0010_0000;
        const MASTER_SLAVE_SELECT = 0b0100_0000;
        const GENERATE_NMI = 0b1000_0000;
    }
}

impl ControlRegister {
    pub fn nametable_bits(&self) -> u16 {
        (self.bits() & 0b11) as u16
    }

    pub fn vram_increment(&self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Pattern table for 8x8 sprites. 8x16 sprites pick theirs from tile bit 0.
    pub fn sprite_table(&self) -> u16 {
        if self.contains(Self::SPRITE_PATTERN_ADDR) {
            0x1000
        } else {
            0
        }
    }

    pub fn background_table(&self) -> u16 {
        if self.contains(Self::BACKGROUND_PATTERN_ADDR) {
            0x1000
        } else {
            0
        }
    }

    pub fn sprite_height(&self) -> u8 {
        if self.contains(Self::SPRITE_SIZE) { 16 } else { 8 }
    }

    pub fn generate_nmi(&self) -> bool {
        self.contains(Self::GENERATE_NMI)
    }
}

bitflags! {
    // 7  bit  0
    // ---- ----
    // BGRs bMmG
    // |||| |||+- Greyscale
    // |||| ||+-- Show background in the leftmost 8 pixels
    // |||| |+--- Show sprites in the leftmost 8 pixels
    // |||| +---- Enable background rendering
    // |||+------ Enable sprite rendering
    // +++------- Colour emphasis, not emulated
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MaskRegister: u8 {
        const GREYSCALE = 0b0000_0001;
        const LEFTMOST_BACKGROUND = 0b0000_0010;
        const LEFTMOST_SPRITES = 0b0000_0100;
        const SHOW_BACKGROUND = 0b0000_1000;
        const SHOW_SPRITES = 0b0001_0000;
        const EMPHASIZE_RED = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl MaskRegister {
    pub fn show_background(&self) -> bool {
        self.contains(Self::SHOW_BACKGROUND)
    }

    pub fn show_sprites(&self) -> bool {
        self.contains(Self::SHOW_SPRITES)
    }

    /// Either layer on. With both off the PPU stops fetching and the address
    /// registers are left alone.
    pub fn rendering_enabled(&self) -> bool {
        self.intersects(Self::SHOW_BACKGROUND | Self::SHOW_SPRITES)
    }

    pub fn background_visible_at(&self, x: usize) -> bool {
        self.show_background() && (x >= 8 || self.contains(Self::LEFTMOST_BACKGROUND))
    }

    pub fn sprites_visible_at(&self, x: usize) -> bool {
        self.show_sprites() && (x >= 8 || self.contains(Self::LEFTMOST_SPRITES))
    }
}

bitflags! {
    // 7  bit  0
    // ---- ----
    // VSOx xxxx
    // |||+-++++- Open bus: last value written to any PPU register
    // ||+------- Sprite overflow
    // |+-------- Sprite 0 hit
    // +--------- Vblank started, cleared on read
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusRegister: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        const VBLANK_STARTED = 0b1000_0000;
    }
}
