//! Per-scanline sprite evaluation.
//!
//! Evaluation runs once at the start of each visible scanline. Up to eight sprites
//! covering the line are selected in OAM order and their pattern rows are decoded
//! straight into a 256-entry pixel buffer, so compositing is a single lookup per dot.

use crate::{bus::Bus, error::BusError};

/// OAM (Object Attribute Memory): 64 sprites × 4 bytes. Each entry: Y, tile, attr, X.
pub const OAM_LEN: usize = 256;

pub const SPRITES_PER_LINE: usize = 8;

const ATTR_PALETTE: u8 = 0x03;
const ATTR_BEHIND_BACKGROUND: u8 = 0x20;
const ATTR_FLIP_HORIZONTAL: u8 = 0x40;
const ATTR_FLIP_VERTICAL: u8 = 0x80;

/// The sprite pixel that wins a screen column. `color == 0` is transparent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpritePixel {
    pub color: u8,
    pub palette: u8,
    pub behind_background: bool,
    pub sprite_zero: bool,
}

impl SpritePixel {
    pub fn is_opaque(&self) -> bool {
        self.color != 0
    }
}

/// Decoded sprites for the scanline being drawn.
pub struct SpriteLine {
    pixels: [SpritePixel; 256],
    count: usize,
}

impl Default for SpriteLine {
    fn default() -> Self {
        Self {
            pixels: [SpritePixel::default(); 256],
            count: 0,
        }
    }
}

impl SpriteLine {
    pub fn clear(&mut self) {
        self.pixels.fill(SpritePixel::default());
        self.count = 0;
    }

    /// Sprites selected by the last evaluation (at most eight).
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn pixel(&self, x: usize) -> SpritePixel {
        self.pixels[x]
    }

    /// Select and decode the sprites for `scanline`. Returns true when a ninth
    /// sprite also covers the line (sprite overflow).
    ///
    /// OAM Y holds the line above the sprite's first row, so a sprite shows on
    /// `scanline` when `0 <= scanline - 1 - y < height`.
    pub fn evaluate(
        &mut self,
        oam: &[u8; OAM_LEN],
        scanline: u16,
        height: u8,
        table: u16,
        bus: &mut impl Bus,
    ) -> Result<bool, BusError> {
        self.clear();
        let line = scanline as i16 - 1;

        let mut overflow = false;
        for (index, entry) in oam.chunks_exact(4).enumerate() {
            let row = line - entry[0] as i16;
            if !(0..height as i16).contains(&row) {
                continue;
            }
            if self.count == SPRITES_PER_LINE {
                overflow = true;
                break;
            }
            self.count += 1;
            self.decode(index, entry, row as u8, height, table, bus)?;
        }
        Ok(overflow)
    }

    fn decode(
        &mut self,
        index: usize,
        entry: &[u8],
        row: u8,
        height: u8,
        table: u16,
        bus: &mut impl Bus,
    ) -> Result<(), BusError> {
        let (tile, attr, x) = (entry[1], entry[2], entry[3]);

        let row = if attr & ATTR_FLIP_VERTICAL != 0 {
            height - 1 - row
        } else {
            row
        };
        let (table, tile, row) = if height == 16 {
            let table = (tile & 1) as u16 * 0x1000;
            let top = tile & 0xFE;
            if row < 8 {
                (table, top, row)
            } else {
                (table, top + 1, row - 8)
            }
        } else {
            (table, tile, row)
        };

        let addr = table + tile as u16 * 16 + row as u16;
        let low = bus.read(addr)?;
        let high = bus.read(addr + 8)?;

        for px in 0..8u8 {
            let screen_x = x as usize + px as usize;
            if screen_x >= self.pixels.len() {
                break;
            }
            // Lower OAM index already claimed this column with an opaque pixel.
            if self.pixels[screen_x].is_opaque() {
                continue;
            }
            let col = if attr & ATTR_FLIP_HORIZONTAL != 0 { 7 - px } else { px };
            let bit = 7 - col;
            let color = (((high >> bit) & 1) << 1) | ((low >> bit) & 1);
            if color == 0 {
                continue;
            }
            self.pixels[screen_x] = SpritePixel {
                color,
                palette: attr & ATTR_PALETTE,
                behind_background: attr & ATTR_BEHIND_BACKGROUND != 0,
                sprite_zero: index == 0,
            };
        }
        Ok(())
    }
}
