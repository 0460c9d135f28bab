use crate::{
    cartridge::{
        Cartridge, INesHeader,
        mapper::{ChrMemory, Mirroring},
    },
    error::LoadError,
};

fn header(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
    let mut bytes = vec![0; 16];
    bytes[0..4].copy_from_slice(b"NES\x1A");
    bytes[4] = prg_banks;
    bytes[5] = chr_banks;
    bytes[6] = flags6;
    bytes[7] = flags7;
    bytes
}

/// Image whose every PRG bank starts with its own bank number.
fn image(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
    let mut bytes = header(prg_banks, chr_banks, flags6, flags7);
    for bank in 0..prg_banks {
        let mut prg = vec![0; 0x4000];
        prg[0] = bank;
        bytes.extend(prg);
    }
    bytes.extend(vec![0x11; chr_banks as usize * 0x2000]);
    bytes
}

#[test]
fn mapper_number_combines_both_nibbles() {
    let header = INesHeader::parse(&header(1, 1, 0x10, 0x40)).unwrap();

    assert_eq!(header.mapper, 0x41);
    assert!(!header.nes2);
}

#[test]
fn nes2_header_extends_mapper_number() {
    let mut bytes = header(1, 1, 0x10, 0x08);
    bytes[8] = 0x52;

    let header = INesHeader::parse(&bytes).unwrap();
    assert!(header.nes2);
    assert_eq!(header.mapper, 0x201);
    assert_eq!(header.submapper, 5);
}

#[test]
fn flags6_selects_mirroring_battery_and_trainer() {
    let header_v = INesHeader::parse(&header(1, 1, 0x07, 0)).unwrap();
    assert_eq!(header_v.mirroring, Mirroring::Vertical);
    assert!(header_v.battery);
    assert!(header_v.trainer);
    assert_eq!(header_v.prg_offset(), 16 + 512);

    let header_4 = INesHeader::parse(&header(1, 1, 0x08, 0)).unwrap();
    assert_eq!(header_4.mirroring, Mirroring::FourScreen);
}

#[test]
fn rejects_short_and_unmarked_images() {
    assert!(matches!(
        INesHeader::parse(&[0x4E, 0x45, 0x53]),
        Err(LoadError::HeaderTooShort { len: 3 })
    ));

    let mut bytes = header(1, 1, 0, 0);
    bytes[3] = 0;
    assert!(matches!(INesHeader::parse(&bytes), Err(LoadError::BadMagic)));
}

#[test]
fn unsupported_mapper_reports_its_number() {
    let err = Cartridge::from_bytes(&image(1, 1, 0x40, 0), None).err().unwrap();

    assert!(matches!(err, LoadError::UnsupportedMapper { mapper: 4 }));
    assert_eq!(err.to_string(), "unsupported mapper 4");
}

#[test]
fn truncated_prg_is_an_error() {
    let mut bytes = image(2, 0, 0, 0);
    bytes.truncate(16 + 0x4000);

    assert!(matches!(
        Cartridge::from_bytes(&bytes, None),
        Err(LoadError::Truncated { section: "PRG ROM", .. })
    ));
}

#[test]
fn trainer_is_skipped() {
    let mut bytes = header(1, 1, 0x04, 0);
    bytes.extend(vec![0xEE; 512]);
    bytes.extend(vec![0x42; 0x4000]);
    bytes.extend(vec![0; 0x2000]);

    let mut cart = Cartridge::from_bytes(&bytes, None).unwrap();
    assert_eq!(cart.read_program(0x8000).unwrap(), 0x42);
}

#[test]
fn nrom_mirrors_a_single_prg_bank() {
    let mut cart = Cartridge::from_bytes(&image(1, 1, 0, 0), None).unwrap();
    cart.write_program(0x8000, 0x99).unwrap();

    assert_eq!(cart.read_program(0x8000).unwrap(), 0);
    assert_eq!(cart.read_program(0xC000).unwrap(), 0);
    assert_eq!(cart.read_graphics(0x0000), 0x11);
}

#[test]
fn two_prg_banks_fill_the_whole_32k_window() {
    let mut cart = Cartridge::from_bytes(&image(2, 1, 0, 0), None).unwrap();

    assert_eq!(cart.read_program(0x8000).unwrap(), 0);
    assert_eq!(cart.read_program(0xC000).unwrap(), 1);
}

#[test]
fn chr_memory_is_ram_only_without_chr_rom() {
    assert!(ChrMemory::new(Vec::new()).is_ram());
    assert!(!ChrMemory::new(vec![0x11; 0x2000]).is_ram());
}

#[test]
fn chr_ram_when_no_chr_banks() {
    let mut cart = Cartridge::from_bytes(&image(1, 0, 0, 0), None).unwrap();
    cart.write_graphics(0x1234, 0x77);

    assert_eq!(cart.read_graphics(0x1234), 0x77);
}

#[test]
fn chr_rom_ignores_writes() {
    let mut cart = Cartridge::from_bytes(&image(1, 1, 0, 0), None).unwrap();
    cart.write_graphics(0x0000, 0x77);

    assert_eq!(cart.read_graphics(0x0000), 0x11);
}

#[test]
fn uxrom_switches_low_bank_and_fixes_last() {
    let mut cart = Cartridge::from_bytes(&image(4, 0, 0x20, 0), None).unwrap();
    assert_eq!(cart.read_program(0xC000).unwrap(), 3);

    cart.write_program(0x8000, 2).unwrap();
    assert_eq!(cart.read_program(0x8000).unwrap(), 2);
    assert_eq!(cart.read_program(0xC000).unwrap(), 3);

    cart.write_program(0xFFFF, 5).unwrap();
    assert_eq!(cart.read_program(0x8000).unwrap(), 1);
}

#[test]
fn work_ram_sits_at_6000() {
    let mut cart = Cartridge::from_bytes(&image(1, 1, 0, 0), None).unwrap();
    cart.write_program(0x6000, 0xAB).unwrap();
    cart.write_program(0x7FFF, 0xCD).unwrap();

    assert_eq!(cart.read_program(0x6000).unwrap(), 0xAB);
    assert_eq!(cart.read_program(0x7FFF).unwrap(), 0xCD);
}

#[test]
fn uxrom_has_no_work_ram() {
    let mut cart = Cartridge::from_bytes(&image(2, 0, 0x20, 0), None).unwrap();
    cart.write_program(0x6000, 0xAB).unwrap();

    assert_eq!(cart.read_program(0x6000).unwrap(), 0);
}

#[test]
fn mmc1_mirroring_overrides_header() {
    let mut cart = Cartridge::from_bytes(&image(2, 0, 0x11, 0), None).unwrap();
    // Power-on control $0C selects one-screen lower.
    assert_eq!(cart.mirroring(), Mirroring::SingleScreenLower);

    for bit in [1, 1, 0, 1, 0] {
        cart.write_program(0x8000, bit).unwrap();
    }
    assert_eq!(cart.mirroring(), Mirroring::Horizontal);
}

#[test]
fn four_screen_header_wins() {
    let cart = Cartridge::from_bytes(&image(2, 0, 0x18, 0), None).unwrap();

    assert_eq!(cart.mirroring(), Mirroring::FourScreen);
}
