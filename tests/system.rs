//! Whole-console tests: tiny NROM programs run through `Nes`.

use famicore::{
    Nes,
    cartridge::Cartridge,
    controller::Buttons,
    error::{CpuError, NesError},
};

const NMI_HANDLER: u16 = 0x9000;

/// 32 KiB NROM image with `program` at $8000, `nmi` at $9000, and CHR RAM.
fn rom(program: &[u8], nmi: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0; 16];
    bytes[0..4].copy_from_slice(b"NES\x1A");
    bytes[4] = 2;

    let mut prg = vec![0xEA; 0x8000];
    prg[..program.len()].copy_from_slice(program);
    let handler = (NMI_HANDLER - 0x8000) as usize;
    prg[handler..handler + nmi.len()].copy_from_slice(nmi);
    // NMI, reset and IRQ vectors.
    prg[0x7FFA..0x8000].copy_from_slice(&[0x00, 0x90, 0x00, 0x80, 0x00, 0x80]);

    bytes.extend(prg);
    bytes
}

fn console(program: &[u8], nmi: &[u8]) -> Nes {
    let cartridge = Cartridge::from_bytes(&rom(program, nmi), None).unwrap();
    let mut nes = Nes::new(cartridge).unwrap();
    nes.reset().unwrap();
    nes
}

fn ram(nes: &Nes, addr: usize) -> u8 {
    nes.bus().ram().read(addr)
}

fn run_until_pc(nes: &mut Nes, pc: u16) {
    for _ in 0..1000 {
        nes.step().unwrap();
        if nes.cpu().pc == pc {
            return;
        }
    }
    panic!("PC never reached ${pc:04X}");
}

#[test]
fn frames_are_about_29781_cpu_cycles_apart() {
    // JMP $8000
    let mut nes = console(&[0x4C, 0x00, 0x80], &[0x40]);

    nes.run_frame().unwrap();
    assert!(nes.frame_ready());
    let first = nes.cpu().cycles;
    nes.run_frame().unwrap();
    let second = nes.cpu().cycles;

    assert!((29780..=29781).contains(&(second - first)));
    assert!(nes.take_frame_ready());
    assert!(!nes.frame_ready());
}

#[test]
fn vblank_nmi_runs_the_handler_once_per_frame() {
    let program = [
        0xA9, 0x80, // LDA #$80
        0x8D, 0x00, 0x20, // STA $2000
        0x4C, 0x05, 0x80, // JMP $8005
    ];
    let handler = [
        0xE6, 0x10, // INC $10
        0x40, // RTI
    ];
    let mut nes = console(&program, &handler);

    for _ in 0..3 {
        nes.run_frame().unwrap();
    }

    // The third frame's NMI is latched but not yet taken.
    assert_eq!(ram(&nes, 0x10), 2);
}

#[test]
fn oam_dma_copies_the_page_and_stalls_the_cpu() {
    let program = [
        0xA9, 0x02, // LDA #$02
        0x8D, 0x00, 0x02, // STA $0200
        0x8D, 0x14, 0x40, // STA $4014
        0x4C, 0x08, 0x80, // JMP $8008
    ];
    let mut nes = console(&program, &[0x40]);

    run_until_pc(&mut nes, 0x8008);

    // STA's last 3 cycles plus 513, since the write landed on an even cycle.
    assert_eq!(nes.cpu().cycles % 2, 0);
    assert_eq!(nes.cpu().remaining_cycles(), 3 + 513);
    assert_eq!(nes.bus().ppu().oam()[0], 0x02);
}

#[test]
fn oam_dma_on_an_odd_cycle_takes_one_more() {
    let program = [
        0xA9, 0x02, // LDA #$02
        0x24, 0x00, // BIT $00
        0x8D, 0x14, 0x40, // STA $4014
        0x4C, 0x07, 0x80, // JMP $8007
    ];
    let mut nes = console(&program, &[0x40]);

    run_until_pc(&mut nes, 0x8007);

    assert_eq!(nes.cpu().cycles % 2, 1);
    assert_eq!(nes.cpu().remaining_cycles(), 3 + 514);
}

#[test]
fn program_reads_controller_through_4016() {
    let program = [
        0xA9, 0x01, // LDA #$01
        0x8D, 0x16, 0x40, // STA $4016
        0xA9, 0x00, // LDA #$00
        0x8D, 0x16, 0x40, // STA $4016
        0xAD, 0x16, 0x40, // LDA $4016
        0x85, 0x20, // STA $20
        0xAD, 0x16, 0x40, // LDA $4016
        0x85, 0x21, // STA $21
        0x4C, 0x14, 0x80, // JMP $8014
    ];
    let mut nes = console(&program, &[0x40]);
    nes.set_buttons(0, Buttons::A);

    run_until_pc(&mut nes, 0x8014);

    assert_eq!(ram(&nes, 0x20), 0x41);
    assert_eq!(ram(&nes, 0x21), 0x40);
}

#[test]
fn illegal_opcode_stops_the_console() {
    // $02 is a JAM opcode.
    let mut nes = console(&[0x02], &[0x40]);

    let err = nes.run_frame().unwrap_err();
    assert!(matches!(
        err,
        NesError::Cpu(CpuError::IllegalOpcode {
            opcode: 0x02,
            address: 0x8000
        })
    ));
    assert!(nes.cpu().is_jammed());

    nes.reset().unwrap();
    assert!(!nes.cpu().is_jammed());
}

#[test]
fn frame_buffer_shows_the_backdrop_colour() {
    let program = [
        0xA9, 0x3F, // LDA #$3F
        0x8D, 0x06, 0x20, // STA $2006
        0xA9, 0x00, // LDA #$00
        0x8D, 0x06, 0x20, // STA $2006
        0xA9, 0x21, // LDA #$21
        0x8D, 0x07, 0x20, // STA $2007
        0xA9, 0x20, // LDA #$20
        0x8D, 0x06, 0x20, // STA $2006
        0xA9, 0x00, // LDA #$00
        0x8D, 0x06, 0x20, // STA $2006
        0x4C, 0x19, 0x80, // JMP $8019
    ];
    let mut nes = console(&program, &[0x40]);

    nes.run_frame().unwrap();
    nes.run_frame().unwrap();

    let backdrop = famicore::ppu::palette::NES_PALETTE_RGB[0x21];
    assert_eq!(nes.frame_buffer().len(), 256 * 240);
    assert!(nes.frame_buffer().iter().all(|&pixel| pixel == backdrop));
}

#[test]
fn buttons_on_a_missing_port_are_ignored() {
    let mut nes = console(&[0x4C, 0x00, 0x80], &[0x40]);

    nes.set_buttons(2, Buttons::A);
    nes.set_buttons(usize::MAX, Buttons::START);
    nes.step().unwrap();
}
