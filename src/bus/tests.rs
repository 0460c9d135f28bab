use crate::{
    bus::{Bus, BusDevice, CpuDevice, DataBus, Devices, NesBus},
    cartridge::{Cartridge, mapper::Mirroring},
    controller::Buttons,
    error::BusError,
    memory::Ram,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chip {
    Low,
    High,
}

struct Chips {
    low: Ram,
    high: Ram,
}

impl Devices<Chip> for Chips {
    fn with_device<R>(&mut self, device: Chip, f: impl FnOnce(&mut dyn BusDevice) -> R) -> R {
        match device {
            Chip::Low => f(&mut self.low),
            Chip::High => f(&mut self.high),
        }
    }
}

/// iNES image with `prg_banks` of PRG ROM and CHR RAM; the reset vector points at $8000.
fn image(mapper: u8, prg_banks: u8, flags6: u8) -> Vec<u8> {
    let mut bytes = vec![0; 16];
    bytes[0..4].copy_from_slice(b"NES\x1A");
    bytes[4] = prg_banks;
    bytes[6] = flags6 | (mapper << 4);
    let mut prg = vec![0xEA; prg_banks as usize * 0x4000];
    let len = prg.len();
    prg[len - 4] = 0x00;
    prg[len - 3] = 0x80;
    bytes.extend(prg);
    bytes
}

fn nes_bus(mapper: u8, flags6: u8) -> NesBus {
    let cartridge = Cartridge::from_bytes(&image(mapper, 2, flags6), None).unwrap();
    NesBus::new(cartridge).unwrap()
}

#[test]
fn connect_rejects_bad_ranges() {
    let mut map = DataBus::new(0x3FFF);

    assert_eq!(
        map.connect(Chip::Low, 0x10, 0x0F),
        Err(BusError::InvalidRange {
            start: 0x10,
            end: 0x0F
        })
    );
    assert_eq!(
        map.connect(Chip::Low, 0x3000, 0x4000),
        Err(BusError::OutOfRange {
            start: 0x3000,
            end: 0x4000,
            limit: 0x3FFF
        })
    );
}

#[test]
fn overlapping_connect_fails_without_changing_the_map() {
    let mut map = DataBus::new(0xFF);
    map.connect(Chip::Low, 0x00, 0x7F).unwrap();

    assert_eq!(
        map.connect(Chip::High, 0x40, 0xFF),
        Err(BusError::Overlap { address: 0x40 })
    );
    assert_eq!(map.owner(0x40), Some(Chip::Low));
    assert_eq!(map.owner(0x80), None);
}

#[test]
fn routes_reads_and_writes_to_the_owner() {
    let mut map = DataBus::new(0xFF);
    map.connect(Chip::Low, 0x00, 0x7F).unwrap();
    map.connect(Chip::High, 0x80, 0xBF).unwrap();
    let mut chips = Chips {
        low: Ram::new(0x80),
        high: Ram::new(0x40),
    };

    map.write(&mut chips, 0x05, 0x11).unwrap();
    map.write(&mut chips, 0x85, 0x22).unwrap();

    assert_eq!(chips.low.read(0x05), 0x11);
    assert_eq!(map.read(&mut chips, 0x85), Ok(0x22));
    assert_eq!(
        map.read(&mut chips, 0xC0),
        Err(BusError::Unmapped { address: 0xC0 })
    );
}

#[test]
fn cpu_map_covers_everything_but_the_test_window() {
    let bus = nes_bus(0, 0);
    let map = bus.cpu_map();

    assert_eq!(map.owner(0x0000), Some(CpuDevice::Ram));
    assert_eq!(map.owner(0x1FFF), Some(CpuDevice::RamMirror { base: 0x1800 }));
    assert_eq!(map.owner(0x3FFF), Some(CpuDevice::PpuRegisters));
    assert_eq!(map.owner(0x4017), Some(CpuDevice::Io));
    assert_eq!(map.owner(0x4020), Some(CpuDevice::Cartridge));
    assert_eq!(map.owner(0xFFFF), Some(CpuDevice::Cartridge));
    for addr in 0x4018..=0x401F {
        assert_eq!(map.owner(addr), None);
    }
}

#[test]
fn unmapped_cpu_access_is_an_error() {
    let mut bus = nes_bus(0, 0);

    assert_eq!(bus.read(0x4018), Err(BusError::Unmapped { address: 0x4018 }));
    assert_eq!(
        bus.write(0x401F, 1),
        Err(BusError::Unmapped { address: 0x401F })
    );
}

#[test]
fn ram_round_trips_through_every_mirror() {
    let mut bus = nes_bus(0, 0);

    bus.write(0x0801, 0x5A).unwrap();
    assert_eq!(bus.read(0x0001), Ok(0x5A));
    assert_eq!(bus.read(0x1001), Ok(0x5A));
    assert_eq!(bus.read(0x1801), Ok(0x5A));

    bus.write(0x07FF, 0xA5).unwrap();
    assert_eq!(bus.read(0x1FFF), Ok(0xA5));
}

#[test]
fn program_rom_and_work_ram() {
    let mut bus = nes_bus(0, 0);

    assert_eq!(bus.read(0x8000), Ok(0xEA));
    assert_eq!(bus.read(0xFFFD), Ok(0x80));

    bus.write(0x6000, 0x42).unwrap();
    assert_eq!(bus.read(0x6000), Ok(0x42));
}

#[test]
fn palette_round_trips_through_ppu_registers() {
    let mut bus = nes_bus(0, 0);

    bus.write(0x2006, 0x3F).unwrap();
    bus.write(0x2006, 0x01).unwrap();
    bus.write(0x2007, 0x2C).unwrap();

    bus.write(0x2006, 0x3F).unwrap();
    bus.write(0x2006, 0x01).unwrap();
    assert_eq!(bus.read(0x2007), Ok(0x2C));
    assert_eq!(bus.read_vram(0x3F21), Ok(0x2C));
}

#[test]
fn ppu_registers_repeat_every_eight_bytes() {
    let mut bus = nes_bus(0, 0);

    bus.write(0x3FFE, 0x24).unwrap();
    bus.write(0x3FFE, 0x00).unwrap();
    bus.write(0x2FFF, 0x99).unwrap();

    assert_eq!(bus.read_vram(0x2400), Ok(0x99));
}

#[test]
fn nametable_mirroring_follows_the_header() {
    let mut bus = nes_bus(0, 0x01);

    bus.write(0x2006, 0x20).unwrap();
    bus.write(0x2006, 0x10).unwrap();
    bus.write(0x2007, 0x77).unwrap();

    // Vertical: $2800 mirrors $2000; $3000 mirrors $2000 too.
    assert_eq!(bus.read_vram(0x2810), Ok(0x77));
    assert_eq!(bus.read_vram(0x3010), Ok(0x77));
    assert_eq!(bus.read_vram(0x2410), Ok(0x00));
}

#[test]
fn mapper_writes_update_nametable_mirroring() {
    let mut bus = nes_bus(1, 0);
    assert_eq!(bus.cartridge().mirroring(), Mirroring::SingleScreenLower);

    // MMC1 control = %01011: horizontal mirroring.
    for bit in [1, 1, 0, 1, 0] {
        bus.write(0x8000, bit).unwrap();
    }
    assert_eq!(bus.cartridge().mirroring(), Mirroring::Horizontal);

    bus.write(0x2006, 0x20).unwrap();
    bus.write(0x2006, 0x00).unwrap();
    bus.write(0x2007, 0x31).unwrap();
    assert_eq!(bus.read_vram(0x2400), Ok(0x31));
    assert_eq!(bus.read_vram(0x2800), Ok(0x00));
}

#[test]
fn chr_ram_is_writable_from_the_cpu() {
    let mut bus = nes_bus(0, 0);

    bus.write(0x2006, 0x01).unwrap();
    bus.write(0x2006, 0x23).unwrap();
    bus.write(0x2007, 0x6E).unwrap();

    assert_eq!(bus.read_vram(0x0123), Ok(0x6E));
}

#[test]
fn oam_dma_copies_a_ram_page() {
    let mut bus = nes_bus(0, 0);
    for i in 0..=0xFFu16 {
        bus.write(0x0300 + i, i as u8 ^ 0xFF).unwrap();
    }

    bus.write(0x4014, 0x03).unwrap();
    let page = bus.take_dma_request().unwrap();
    bus.oam_dma(page).unwrap();

    assert_eq!(bus.take_dma_request(), None);
    assert_eq!(bus.ppu().oam()[0], 0xFF);
    assert_eq!(bus.ppu().oam()[0xFF], 0x00);
}

#[test]
fn joypads_read_through_4016_and_4017() {
    let mut bus = nes_bus(0, 0);
    bus.controllers_mut()[0].set_buttons(Buttons::A | Buttons::SELECT);
    bus.controllers_mut()[1].set_buttons(Buttons::B);

    bus.write(0x4016, 1).unwrap();
    bus.write(0x4016, 0).unwrap();

    let pad1: Vec<u8> = (0..3).map(|_| bus.read(0x4016).unwrap() & 1).collect();
    let pad2: Vec<u8> = (0..3).map(|_| bus.read(0x4017).unwrap() & 1).collect();
    assert_eq!(pad1, [1, 0, 1]);
    assert_eq!(pad2, [0, 1, 0]);
}

#[test]
fn apu_registers_are_accepted_and_read_zero() {
    let mut bus = nes_bus(0, 0);

    bus.write(0x4000, 0x3F).unwrap();
    assert_eq!(bus.read(0x4015), Ok(0));
}
