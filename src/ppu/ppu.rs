//! NES PPU (Picture Processing Unit) implementation.
//!
//! Stepped one dot at a time: 341 dots per scanline, 262 scanlines per frame. The
//! background is fetched eight pixels ahead into 16-bit shift registers, sprites are
//! evaluated once per visible scanline, and each visible dot writes one pixel of the
//! 256×240 framebuffer. Registers: $2000–$2007 (mirrored through $3FFF on the CPU side).

use crate::{
    bus::Bus,
    error::BusError,
    ppu::{
        palette::NES_PALETTE_RGB,
        registers::{ControlRegister, MaskRegister, StatusRegister},
        sprites::{OAM_LEN, SpriteLine},
    },
};

pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 240;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
pub const VBLANK_LINE: u16 = 241;
pub const PRE_RENDER_LINE: u16 = 261;

const PALETTE_BASE: u16 = 0x3F00;
const SPRITE_PALETTE_BASE: u16 = 0x3F10;

// Loopy register fields: yyy NN YYYYY XXXXX
const COARSE_X: u16 = 0x001F;
const COARSE_Y: u16 = 0x03E0;
const NAMETABLE_X: u16 = 0x0400;
const NAMETABLE_Y: u16 = 0x0800;
const FINE_Y: u16 = 0x7000;
const HORIZONTAL_BITS: u16 = NAMETABLE_X | COARSE_X;
const VERTICAL_BITS: u16 = FINE_Y | NAMETABLE_Y | COARSE_Y;

/// What happened during one PPU dot, for the driver to act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PpuTick {
    /// Raise the CPU's NMI line.
    pub nmi: bool,
    /// Vblank just began; the framebuffer holds a complete picture.
    pub frame_complete: bool,
}

/// One background tile row as fetched from the nametable, attribute and pattern tables.
#[derive(Debug, Clone, Copy)]
struct Tile {
    low: u8,
    high: u8,
    palette: u8,
}

/// Background pipeline. The high byte of each register is the tile being drawn,
/// the low byte the next one.
#[derive(Debug, Default)]
struct BackgroundShifters {
    pattern_low: u16,
    pattern_high: u16,
    palette_low: u16,
    palette_high: u16,
}

impl BackgroundShifters {
    fn load_next(&mut self, tile: Tile) {
        self.pattern_low = (self.pattern_low & 0xFF00) | tile.low as u16;
        self.pattern_high = (self.pattern_high & 0xFF00) | tile.high as u16;
        self.palette_low = (self.palette_low & 0xFF00) | spread(tile.palette & 1);
        self.palette_high = (self.palette_high & 0xFF00) | spread(tile.palette >> 1);
    }

    fn load_first(&mut self, tile: Tile) {
        self.pattern_low = (tile.low as u16) << 8;
        self.pattern_high = (tile.high as u16) << 8;
        self.palette_low = spread(tile.palette & 1) << 8;
        self.palette_high = spread(tile.palette >> 1) << 8;
    }

    fn shift(&mut self) {
        self.pattern_low <<= 1;
        self.pattern_high <<= 1;
        self.palette_low <<= 1;
        self.palette_high <<= 1;
    }

    /// (color index, palette) of the current pixel, `fine_x` pixels into the tile.
    fn pixel(&self, fine_x: u8) -> (u8, u8) {
        let bit = 15 - fine_x as u16;
        let pick = |reg: u16| ((reg >> bit) & 1) as u8;
        (
            (pick(self.pattern_high) << 1) | pick(self.pattern_low),
            (pick(self.palette_high) << 1) | pick(self.palette_low),
        )
    }
}

fn spread(bit: u8) -> u16 {
    if bit & 1 != 0 { 0x00FF } else { 0 }
}

/// PPU state: registers, timing, OAM, and framebuffer. VRAM lives behind the bus.
pub struct PPU {
    ctrl: ControlRegister,
    mask: MaskRegister,
    status: StatusRegister,
    /// OAM address for $2003/$2004 (byte index 0..255).
    oam_addr: u8,
    /// OAM: 64 sprites × 4 bytes (Y, tile, attr, X). Written via $2003/$2004 or $4014 DMA.
    oam: [u8; OAM_LEN],
    /// Current VRAM address (15 bits).
    v: u16,
    /// Temporary VRAM address; the top-left onscreen tile.
    t: u16,
    fine_x: u8,
    /// Shared $2005/$2006 write toggle.
    w: bool,
    /// $2007 read buffer.
    read_buffer: u8,
    /// Last value written to any register; reads of write-only registers return it.
    latch: u8,
    /// NMI raised by a $2000 write during vblank, reported by the next step.
    nmi_pending: bool,
    scanline: u16,
    dot: u16,
    odd_frame: bool,
    frame: u64,
    background: BackgroundShifters,
    sprites: SpriteLine,
    /// 256×240 framebuffer (0xRRGGBB per pixel). Row-major, left-to-right, top-to-bottom.
    framebuffer: Vec<u32>,
}

impl Default for PPU {
    fn default() -> Self {
        Self::new()
    }
}

impl PPU {
    /// Create PPU in initial state (pre-render scanline, dot 0).
    pub fn new() -> Self {
        Self {
            ctrl: ControlRegister::empty(),
            mask: MaskRegister::empty(),
            status: StatusRegister::empty(),
            oam_addr: 0,
            oam: [0; OAM_LEN],
            v: 0,
            t: 0,
            fine_x: 0,
            w: false,
            read_buffer: 0,
            latch: 0,
            nmi_pending: false,
            scanline: PRE_RENDER_LINE,
            dot: 0,
            odd_frame: false,
            frame: 0,
            background: BackgroundShifters::default(),
            sprites: SpriteLine::default(),
            framebuffer: vec![0; WIDTH * HEIGHT],
        }
    }

    /// Return registers and timing to power-up state. OAM and the last picture survive.
    pub fn reset(&mut self) {
        self.ctrl = ControlRegister::empty();
        self.mask = MaskRegister::empty();
        self.status = StatusRegister::empty();
        self.oam_addr = 0;
        self.v = 0;
        self.t = 0;
        self.fine_x = 0;
        self.w = false;
        self.read_buffer = 0;
        self.latch = 0;
        self.nmi_pending = false;
        self.scanline = PRE_RENDER_LINE;
        self.dot = 0;
        self.odd_frame = false;
        self.background = BackgroundShifters::default();
        self.sprites.clear();
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// The dot the next `step` will process.
    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Frames completed since power-up.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn control(&self) -> ControlRegister {
        self.ctrl
    }

    pub fn mask(&self) -> MaskRegister {
        self.mask
    }

    /// PPUSTATUS without the read side effects.
    pub fn status(&self) -> StatusRegister {
        self.status
    }

    pub fn vram_addr(&self) -> u16 {
        self.v
    }

    pub fn oam(&self) -> &[u8; OAM_LEN] {
        &self.oam
    }

    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    /// Copy a DMA page into OAM starting at OAMADDR, wrapping within OAM.
    pub fn write_oam_block(&mut self, data: &[u8; OAM_LEN]) {
        for (i, &byte) in data.iter().enumerate() {
            let index = self.oam_addr.wrapping_add(i as u8);
            self.oam[index as usize] = byte;
        }
    }

    /// Advance one dot.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<PpuTick, BusError> {
        let mut tick = PpuTick {
            nmi: std::mem::take(&mut self.nmi_pending),
            frame_complete: false,
        };

        if self.dot == 1 {
            match self.scanline {
                VBLANK_LINE => {
                    self.status.insert(StatusRegister::VBLANK_STARTED);
                    self.frame += 1;
                    tick.frame_complete = true;
                    if self.ctrl.generate_nmi() {
                        tick.nmi = true;
                    }
                }
                PRE_RENDER_LINE => self.status.remove(
                    StatusRegister::VBLANK_STARTED
                        | StatusRegister::SPRITE_ZERO_HIT
                        | StatusRegister::SPRITE_OVERFLOW,
                ),
                _ => {}
            }
        }

        let rendering = self.mask.rendering_enabled();
        let visible = (self.scanline as usize) < HEIGHT;
        let render_line = visible || self.scanline == PRE_RENDER_LINE;

        if visible && self.dot == 0 {
            if rendering {
                self.evaluate_sprites(bus)?;
            } else {
                self.sprites.clear();
            }
        }

        if rendering && render_line {
            self.fetch_background(bus)?;
        }

        if visible && (self.dot as usize) < WIDTH {
            self.render_pixel(bus)?;
        }

        if rendering && render_line && (self.dot as usize) < WIDTH {
            self.background.shift();
        }

        self.advance(rendering);
        Ok(tick)
    }

    fn advance(&mut self, rendering: bool) {
        // Odd frames drop the last pre-render dot, but only while rendering.
        if self.odd_frame
            && rendering
            && self.scanline == PRE_RENDER_LINE
            && self.dot == DOTS_PER_SCANLINE - 2
        {
            self.dot = 0;
            self.scanline = 0;
            self.odd_frame = false;
            return;
        }

        self.dot += 1;
        if self.dot == DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline == SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.odd_frame = !self.odd_frame;
            }
        }
    }

    fn evaluate_sprites(&mut self, bus: &mut impl Bus) -> Result<(), BusError> {
        let overflow = self.sprites.evaluate(
            &self.oam,
            self.scanline,
            self.ctrl.sprite_height(),
            self.ctrl.sprite_table(),
            bus,
        )?;
        if overflow {
            self.status.insert(StatusRegister::SPRITE_OVERFLOW);
        }
        Ok(())
    }

    /// Tile fetches and scroll updates. The pipeline runs one tile ahead: dot 321
    /// loads the first tile of the next line, dots 0, 8, .., 248 the following ones.
    fn fetch_background(&mut self, bus: &mut impl Bus) -> Result<(), BusError> {
        match self.dot {
            dot if dot <= 248 && dot % 8 == 0 => {
                let tile = self.fetch_tile(bus)?;
                self.background.load_next(tile);
                if dot < 248 {
                    self.increment_x();
                } else {
                    self.v = (self.v & !HORIZONTAL_BITS) | (self.t & HORIZONTAL_BITS);
                    self.increment_y();
                }
            }
            280..=304 if self.scanline == PRE_RENDER_LINE => {
                self.v = (self.v & !VERTICAL_BITS) | (self.t & VERTICAL_BITS);
            }
            321 => {
                let tile = self.fetch_tile(bus)?;
                self.background.load_first(tile);
                self.increment_x();
            }
            _ => {}
        }
        Ok(())
    }

    fn fetch_tile(&mut self, bus: &mut impl Bus) -> Result<Tile, BusError> {
        let v = self.v;
        let name = bus.read(0x2000 | (v & 0x0FFF))?;

        let attr_addr = 0x23C0 | (v & 0x0C00) | ((v >> 4) & 0x38) | ((v >> 2) & 0x07);
        let attr = bus.read(attr_addr)?;
        // Quadrant within the 32x32 attribute area: bit 1 of coarse Y, bit 1 of coarse X.
        let shift = ((v >> 4) & 0x04) | (v & 0x02);
        let palette = (attr >> shift) & 0x03;

        let fine_y = (v & FINE_Y) >> 12;
        let addr = self.ctrl.background_table() + name as u16 * 16 + fine_y;
        Ok(Tile {
            low: bus.read(addr)?,
            high: bus.read(addr + 8)?,
            palette,
        })
    }

    fn increment_x(&mut self) {
        if self.v & COARSE_X == 31 {
            self.v &= !COARSE_X;
            self.v ^= NAMETABLE_X;
        } else {
            self.v += 1;
        }
    }

    fn increment_y(&mut self) {
        if self.v & FINE_Y != FINE_Y {
            self.v += 0x1000;
            return;
        }
        self.v &= !FINE_Y;
        let mut coarse_y = (self.v & COARSE_Y) >> 5;
        if coarse_y == 29 {
            coarse_y = 0;
            self.v ^= NAMETABLE_Y;
        } else if coarse_y == 31 {
            // Rows 30 and 31 are attribute bytes; wrapping from them skips the nametable switch.
            coarse_y = 0;
        } else {
            coarse_y += 1;
        }
        self.v = (self.v & !COARSE_Y) | (coarse_y << 5);
    }

    fn render_pixel(&mut self, bus: &mut impl Bus) -> Result<(), BusError> {
        let x = self.dot as usize;
        let y = self.scanline as usize;

        let palette_addr = if self.mask.rendering_enabled() {
            self.composite(x)
        } else if self.v & 0x3F00 == PALETTE_BASE {
            // Forced blanking with v inside palette space shows that entry.
            self.v & 0x3FFF
        } else {
            PALETTE_BASE
        };

        let mut color = bus.read(palette_addr)?;
        if self.mask.contains(MaskRegister::GREYSCALE) {
            color &= 0x30;
        }
        self.framebuffer[y * WIDTH + x] = NES_PALETTE_RGB[(color & 0x3F) as usize];
        Ok(())
    }

    /// Pick the palette entry for column `x`, flagging sprite 0 hits on the way.
    fn composite(&mut self, x: usize) -> u16 {
        let (bg_color, bg_palette) = if self.mask.background_visible_at(x) {
            self.background.pixel(self.fine_x)
        } else {
            (0, 0)
        };
        let sprite = if self.mask.sprites_visible_at(x) {
            self.sprites.pixel(x)
        } else {
            Default::default()
        };

        if sprite.sprite_zero && sprite.is_opaque() && bg_color != 0 && x != WIDTH - 1 {
            self.status.insert(StatusRegister::SPRITE_ZERO_HIT);
        }

        if sprite.is_opaque() && (!sprite.behind_background || bg_color == 0) {
            SPRITE_PALETTE_BASE + sprite.palette as u16 * 4 + sprite.color as u16
        } else if bg_color != 0 {
            PALETTE_BASE + bg_palette as u16 * 4 + bg_color as u16
        } else {
            PALETTE_BASE
        }
    }

    /// CPU read of register `register & 7`.
    pub fn read_register(&mut self, register: u16, bus: &mut impl Bus) -> Result<u8, BusError> {
        Ok(match register & 7 {
            2 => self.read_status(),
            4 => self.oam[self.oam_addr as usize],
            7 => self.read_data(bus)?,
            _ => self.latch,
        })
    }

    /// CPU write of register `register & 7`.
    pub fn write_register(
        &mut self,
        register: u16,
        data: u8,
        bus: &mut impl Bus,
    ) -> Result<(), BusError> {
        self.latch = data;
        match register & 7 {
            0 => self.write_ctrl(data),
            1 => self.mask = MaskRegister::from_bits_retain(data),
            2 => {} // read-only
            3 => self.oam_addr = data,
            4 => {
                self.oam[self.oam_addr as usize] = data;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            5 => self.write_scroll(data),
            6 => self.write_addr(data),
            _ => {
                bus.write(self.v & 0x3FFF, data)?;
                self.increment_addr();
            }
        }
        Ok(())
    }

    /// Read PPUSTATUS ($2002); clears vblank and the write toggle.
    fn read_status(&mut self) -> u8 {
        let value = self.status.bits() | (self.latch & 0x1F);
        self.status.remove(StatusRegister::VBLANK_STARTED);
        self.w = false;
        value
    }

    /// Write PPUCTRL ($2000). Enabling NMI while vblank is already set fires one at once.
    fn write_ctrl(&mut self, data: u8) {
        let was_enabled = self.ctrl.generate_nmi();
        self.ctrl = ControlRegister::from_bits_retain(data);
        self.t = (self.t & !(NAMETABLE_X | NAMETABLE_Y)) | (self.ctrl.nametable_bits() << 10);

        if !was_enabled
            && self.ctrl.generate_nmi()
            && self.status.contains(StatusRegister::VBLANK_STARTED)
        {
            self.nmi_pending = true;
        }
    }

    /// Write PPUSCROLL ($2005): X first, then Y.
    fn write_scroll(&mut self, data: u8) {
        if !self.w {
            self.t = (self.t & !COARSE_X) | (data >> 3) as u16;
            self.fine_x = data & 0x07;
        } else {
            self.t = (self.t & !(FINE_Y | COARSE_Y))
                | (((data & 0x07) as u16) << 12)
                | (((data & 0xF8) as u16) << 2);
        }
        self.w = !self.w;
    }

    /// Write PPUADDR ($2006): high six bits first, then low byte, which also loads v.
    fn write_addr(&mut self, data: u8) {
        if !self.w {
            self.t = (self.t & 0x00FF) | (((data & 0x3F) as u16) << 8);
        } else {
            self.t = (self.t & 0xFF00) | data as u16;
            self.v = self.t;
        }
        self.w = !self.w;
    }

    /// Read PPUDATA ($2007). Below palette space the value comes from the read
    /// buffer; palette reads are immediate and refill the buffer from the
    /// nametable underneath.
    fn read_data(&mut self, bus: &mut impl Bus) -> Result<u8, BusError> {
        let addr = self.v & 0x3FFF;
        let value = if addr >= PALETTE_BASE {
            self.read_buffer = bus.read(addr - 0x1000)?;
            bus.read(addr)?
        } else {
            std::mem::replace(&mut self.read_buffer, bus.read(addr)?)
        };
        self.increment_addr();
        Ok(value)
    }

    fn increment_addr(&mut self) {
        self.v = (self.v + self.ctrl.vram_increment()) & 0x7FFF;
    }
}
