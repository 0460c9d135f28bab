//! The 256-entry opcode table.
//!
//! Each entry names the operation, the addressing mode that produces its operand,
//! and the base cycle count. Indexed reads that cross a page cost one more cycle;
//! taken branches add their own cycles. Opcodes with no stable behaviour (JAM and
//! the unstable undocumented group) are [`Operation::Illegal`].
//! See [6502 instructions](https://www.nesdev.org/wiki/Instruction_reference) and
//! [CPU unofficial opcodes](https://www.nesdev.org/wiki/CPU_unofficial_opcodes).

use AddressingMode::*;
use Operation::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    /// `(zp,X)`
    IndexedIndirect,
    /// `(zp),Y`
    IndirectIndexed,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            Implied | Accumulator => 0,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // Official
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Unofficial, stable
    Alr,
    Anc,
    Arr,
    Axs,
    Dcp,
    Isc,
    Lax,
    Rla,
    Rra,
    Sax,
    Slo,
    Sre,
    /// JAM and unstable opcodes: executing one is a fault.
    Illegal,
}

impl Operation {
    /// Operations that pay the extra cycle when their indexed operand crosses a page.
    pub const fn page_penalty(self) -> bool {
        matches!(
            self,
            Adc | And | Cmp | Eor | Lax | Lda | Ldx | Ldy | Nop | Ora | Sbc
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub operation: Operation,
    pub mode: AddressingMode,
    pub cycles: u8,
}

const fn op(mnemonic: &'static str, operation: Operation, mode: AddressingMode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        operation,
        mode,
        cycles,
    }
}

const ILLEGAL: Instruction = op("???", Illegal, Implied, 2);

pub const INSTRUCTIONS: [Instruction; 256] = {
    let mut t = [ILLEGAL; 256];

    // Loads and stores
    t[0xA9] = op("LDA", Lda, Immediate, 2);
    t[0xA5] = op("LDA", Lda, ZeroPage, 3);
    t[0xB5] = op("LDA", Lda, ZeroPageX, 4);
    t[0xAD] = op("LDA", Lda, Absolute, 4);
    t[0xBD] = op("LDA", Lda, AbsoluteX, 4);
    t[0xB9] = op("LDA", Lda, AbsoluteY, 4);
    t[0xA1] = op("LDA", Lda, IndexedIndirect, 6);
    t[0xB1] = op("LDA", Lda, IndirectIndexed, 5);
    t[0xA2] = op("LDX", Ldx, Immediate, 2);
    t[0xA6] = op("LDX", Ldx, ZeroPage, 3);
    t[0xB6] = op("LDX", Ldx, ZeroPageY, 4);
    t[0xAE] = op("LDX", Ldx, Absolute, 4);
    t[0xBE] = op("LDX", Ldx, AbsoluteY, 4);
    t[0xA0] = op("LDY", Ldy, Immediate, 2);
    t[0xA4] = op("LDY", Ldy, ZeroPage, 3);
    t[0xB4] = op("LDY", Ldy, ZeroPageX, 4);
    t[0xAC] = op("LDY", Ldy, Absolute, 4);
    t[0xBC] = op("LDY", Ldy, AbsoluteX, 4);
    t[0x85] = op("STA", Sta, ZeroPage, 3);
    t[0x95] = op("STA", Sta, ZeroPageX, 4);
    t[0x8D] = op("STA", Sta, Absolute, 4);
    t[0x9D] = op("STA", Sta, AbsoluteX, 5);
    t[0x99] = op("STA", Sta, AbsoluteY, 5);
    t[0x81] = op("STA", Sta, IndexedIndirect, 6);
    t[0x91] = op("STA", Sta, IndirectIndexed, 6);
    t[0x86] = op("STX", Stx, ZeroPage, 3);
    t[0x96] = op("STX", Stx, ZeroPageY, 4);
    t[0x8E] = op("STX", Stx, Absolute, 4);
    t[0x84] = op("STY", Sty, ZeroPage, 3);
    t[0x94] = op("STY", Sty, ZeroPageX, 4);
    t[0x8C] = op("STY", Sty, Absolute, 4);

    // Transfers and stack
    t[0xAA] = op("TAX", Tax, Implied, 2);
    t[0xA8] = op("TAY", Tay, Implied, 2);
    t[0xBA] = op("TSX", Tsx, Implied, 2);
    t[0x8A] = op("TXA", Txa, Implied, 2);
    t[0x9A] = op("TXS", Txs, Implied, 2);
    t[0x98] = op("TYA", Tya, Implied, 2);
    t[0x48] = op("PHA", Pha, Implied, 3);
    t[0x08] = op("PHP", Php, Implied, 3);
    t[0x68] = op("PLA", Pla, Implied, 4);
    t[0x28] = op("PLP", Plp, Implied, 4);

    // Arithmetic and logic
    t[0x69] = op("ADC", Adc, Immediate, 2);
    t[0x65] = op("ADC", Adc, ZeroPage, 3);
    t[0x75] = op("ADC", Adc, ZeroPageX, 4);
    t[0x6D] = op("ADC", Adc, Absolute, 4);
    t[0x7D] = op("ADC", Adc, AbsoluteX, 4);
    t[0x79] = op("ADC", Adc, AbsoluteY, 4);
    t[0x61] = op("ADC", Adc, IndexedIndirect, 6);
    t[0x71] = op("ADC", Adc, IndirectIndexed, 5);
    t[0xE9] = op("SBC", Sbc, Immediate, 2);
    t[0xEB] = op("SBC", Sbc, Immediate, 2);
    t[0xE5] = op("SBC", Sbc, ZeroPage, 3);
    t[0xF5] = op("SBC", Sbc, ZeroPageX, 4);
    t[0xED] = op("SBC", Sbc, Absolute, 4);
    t[0xFD] = op("SBC", Sbc, AbsoluteX, 4);
    t[0xF9] = op("SBC", Sbc, AbsoluteY, 4);
    t[0xE1] = op("SBC", Sbc, IndexedIndirect, 6);
    t[0xF1] = op("SBC", Sbc, IndirectIndexed, 5);
    t[0x29] = op("AND", And, Immediate, 2);
    t[0x25] = op("AND", And, ZeroPage, 3);
    t[0x35] = op("AND", And, ZeroPageX, 4);
    t[0x2D] = op("AND", And, Absolute, 4);
    t[0x3D] = op("AND", And, AbsoluteX, 4);
    t[0x39] = op("AND", And, AbsoluteY, 4);
    t[0x21] = op("AND", And, IndexedIndirect, 6);
    t[0x31] = op("AND", And, IndirectIndexed, 5);
    t[0x09] = op("ORA", Ora, Immediate, 2);
    t[0x05] = op("ORA", Ora, ZeroPage, 3);
    t[0x15] = op("ORA", Ora, ZeroPageX, 4);
    t[0x0D] = op("ORA", Ora, Absolute, 4);
    t[0x1D] = op("ORA", Ora, AbsoluteX, 4);
    t[0x19] = op("ORA", Ora, AbsoluteY, 4);
    t[0x01] = op("ORA", Ora, IndexedIndirect, 6);
    t[0x11] = op("ORA", Ora, IndirectIndexed, 5);
    t[0x49] = op("EOR", Eor, Immediate, 2);
    t[0x45] = op("EOR", Eor, ZeroPage, 3);
    t[0x55] = op("EOR", Eor, ZeroPageX, 4);
    t[0x4D] = op("EOR", Eor, Absolute, 4);
    t[0x5D] = op("EOR", Eor, AbsoluteX, 4);
    t[0x59] = op("EOR", Eor, AbsoluteY, 4);
    t[0x41] = op("EOR", Eor, IndexedIndirect, 6);
    t[0x51] = op("EOR", Eor, IndirectIndexed, 5);
    t[0x24] = op("BIT", Bit, ZeroPage, 3);
    t[0x2C] = op("BIT", Bit, Absolute, 4);

    // Compares
    t[0xC9] = op("CMP", Cmp, Immediate, 2);
    t[0xC5] = op("CMP", Cmp, ZeroPage, 3);
    t[0xD5] = op("CMP", Cmp, ZeroPageX, 4);
    t[0xCD] = op("CMP", Cmp, Absolute, 4);
    t[0xDD] = op("CMP", Cmp, AbsoluteX, 4);
    t[0xD9] = op("CMP", Cmp, AbsoluteY, 4);
    t[0xC1] = op("CMP", Cmp, IndexedIndirect, 6);
    t[0xD1] = op("CMP", Cmp, IndirectIndexed, 5);
    t[0xE0] = op("CPX", Cpx, Immediate, 2);
    t[0xE4] = op("CPX", Cpx, ZeroPage, 3);
    t[0xEC] = op("CPX", Cpx, Absolute, 4);
    t[0xC0] = op("CPY", Cpy, Immediate, 2);
    t[0xC4] = op("CPY", Cpy, ZeroPage, 3);
    t[0xCC] = op("CPY", Cpy, Absolute, 4);

    // Increments and decrements
    t[0xE6] = op("INC", Inc, ZeroPage, 5);
    t[0xF6] = op("INC", Inc, ZeroPageX, 6);
    t[0xEE] = op("INC", Inc, Absolute, 6);
    t[0xFE] = op("INC", Inc, AbsoluteX, 7);
    t[0xC6] = op("DEC", Dec, ZeroPage, 5);
    t[0xD6] = op("DEC", Dec, ZeroPageX, 6);
    t[0xCE] = op("DEC", Dec, Absolute, 6);
    t[0xDE] = op("DEC", Dec, AbsoluteX, 7);
    t[0xE8] = op("INX", Inx, Implied, 2);
    t[0xC8] = op("INY", Iny, Implied, 2);
    t[0xCA] = op("DEX", Dex, Implied, 2);
    t[0x88] = op("DEY", Dey, Implied, 2);

    // Shifts and rotates
    t[0x0A] = op("ASL", Asl, Accumulator, 2);
    t[0x06] = op("ASL", Asl, ZeroPage, 5);
    t[0x16] = op("ASL", Asl, ZeroPageX, 6);
    t[0x0E] = op("ASL", Asl, Absolute, 6);
    t[0x1E] = op("ASL", Asl, AbsoluteX, 7);
    t[0x4A] = op("LSR", Lsr, Accumulator, 2);
    t[0x46] = op("LSR", Lsr, ZeroPage, 5);
    t[0x56] = op("LSR", Lsr, ZeroPageX, 6);
    t[0x4E] = op("LSR", Lsr, Absolute, 6);
    t[0x5E] = op("LSR", Lsr, AbsoluteX, 7);
    t[0x2A] = op("ROL", Rol, Accumulator, 2);
    t[0x26] = op("ROL", Rol, ZeroPage, 5);
    t[0x36] = op("ROL", Rol, ZeroPageX, 6);
    t[0x2E] = op("ROL", Rol, Absolute, 6);
    t[0x3E] = op("ROL", Rol, AbsoluteX, 7);
    t[0x6A] = op("ROR", Ror, Accumulator, 2);
    t[0x66] = op("ROR", Ror, ZeroPage, 5);
    t[0x76] = op("ROR", Ror, ZeroPageX, 6);
    t[0x6E] = op("ROR", Ror, Absolute, 6);
    t[0x7E] = op("ROR", Ror, AbsoluteX, 7);

    // Jumps, calls, interrupts
    t[0x4C] = op("JMP", Jmp, Absolute, 3);
    t[0x6C] = op("JMP", Jmp, Indirect, 5);
    t[0x20] = op("JSR", Jsr, Absolute, 6);
    t[0x60] = op("RTS", Rts, Implied, 6);
    t[0x00] = op("BRK", Brk, Implied, 7);
    t[0x40] = op("RTI", Rti, Implied, 6);

    // Branches
    t[0x90] = op("BCC", Bcc, Relative, 2);
    t[0xB0] = op("BCS", Bcs, Relative, 2);
    t[0xF0] = op("BEQ", Beq, Relative, 2);
    t[0x30] = op("BMI", Bmi, Relative, 2);
    t[0xD0] = op("BNE", Bne, Relative, 2);
    t[0x10] = op("BPL", Bpl, Relative, 2);
    t[0x50] = op("BVC", Bvc, Relative, 2);
    t[0x70] = op("BVS", Bvs, Relative, 2);

    // Flags
    t[0x18] = op("CLC", Clc, Implied, 2);
    t[0xD8] = op("CLD", Cld, Implied, 2);
    t[0x58] = op("CLI", Cli, Implied, 2);
    t[0xB8] = op("CLV", Clv, Implied, 2);
    t[0x38] = op("SEC", Sec, Implied, 2);
    t[0xF8] = op("SED", Sed, Implied, 2);
    t[0x78] = op("SEI", Sei, Implied, 2);

    // NOPs, official and not
    t[0xEA] = op("NOP", Nop, Implied, 2);
    t[0x1A] = op("NOP", Nop, Implied, 2);
    t[0x3A] = op("NOP", Nop, Implied, 2);
    t[0x5A] = op("NOP", Nop, Implied, 2);
    t[0x7A] = op("NOP", Nop, Implied, 2);
    t[0xDA] = op("NOP", Nop, Implied, 2);
    t[0xFA] = op("NOP", Nop, Implied, 2);
    t[0x80] = op("NOP", Nop, Immediate, 2);
    t[0x82] = op("NOP", Nop, Immediate, 2);
    t[0x89] = op("NOP", Nop, Immediate, 2);
    t[0xC2] = op("NOP", Nop, Immediate, 2);
    t[0xE2] = op("NOP", Nop, Immediate, 2);
    t[0x04] = op("NOP", Nop, ZeroPage, 3);
    t[0x44] = op("NOP", Nop, ZeroPage, 3);
    t[0x64] = op("NOP", Nop, ZeroPage, 3);
    t[0x14] = op("NOP", Nop, ZeroPageX, 4);
    t[0x34] = op("NOP", Nop, ZeroPageX, 4);
    t[0x54] = op("NOP", Nop, ZeroPageX, 4);
    t[0x74] = op("NOP", Nop, ZeroPageX, 4);
    t[0xD4] = op("NOP", Nop, ZeroPageX, 4);
    t[0xF4] = op("NOP", Nop, ZeroPageX, 4);
    t[0x0C] = op("NOP", Nop, Absolute, 4);
    t[0x1C] = op("NOP", Nop, AbsoluteX, 4);
    t[0x3C] = op("NOP", Nop, AbsoluteX, 4);
    t[0x5C] = op("NOP", Nop, AbsoluteX, 4);
    t[0x7C] = op("NOP", Nop, AbsoluteX, 4);
    t[0xDC] = op("NOP", Nop, AbsoluteX, 4);
    t[0xFC] = op("NOP", Nop, AbsoluteX, 4);

    // Unofficial combined operations
    t[0xA7] = op("LAX", Lax, ZeroPage, 3);
    t[0xB7] = op("LAX", Lax, ZeroPageY, 4);
    t[0xAF] = op("LAX", Lax, Absolute, 4);
    t[0xBF] = op("LAX", Lax, AbsoluteY, 4);
    t[0xA3] = op("LAX", Lax, IndexedIndirect, 6);
    t[0xB3] = op("LAX", Lax, IndirectIndexed, 5);
    t[0x87] = op("SAX", Sax, ZeroPage, 3);
    t[0x97] = op("SAX", Sax, ZeroPageY, 4);
    t[0x8F] = op("SAX", Sax, Absolute, 4);
    t[0x83] = op("SAX", Sax, IndexedIndirect, 6);

    t[0xC7] = op("DCP", Dcp, ZeroPage, 5);
    t[0xD7] = op("DCP", Dcp, ZeroPageX, 6);
    t[0xCF] = op("DCP", Dcp, Absolute, 6);
    t[0xDF] = op("DCP", Dcp, AbsoluteX, 7);
    t[0xDB] = op("DCP", Dcp, AbsoluteY, 7);
    t[0xC3] = op("DCP", Dcp, IndexedIndirect, 8);
    t[0xD3] = op("DCP", Dcp, IndirectIndexed, 8);
    t[0xE7] = op("ISC", Isc, ZeroPage, 5);
    t[0xF7] = op("ISC", Isc, ZeroPageX, 6);
    t[0xEF] = op("ISC", Isc, Absolute, 6);
    t[0xFF] = op("ISC", Isc, AbsoluteX, 7);
    t[0xFB] = op("ISC", Isc, AbsoluteY, 7);
    t[0xE3] = op("ISC", Isc, IndexedIndirect, 8);
    t[0xF3] = op("ISC", Isc, IndirectIndexed, 8);
    t[0x07] = op("SLO", Slo, ZeroPage, 5);
    t[0x17] = op("SLO", Slo, ZeroPageX, 6);
    t[0x0F] = op("SLO", Slo, Absolute, 6);
    t[0x1F] = op("SLO", Slo, AbsoluteX, 7);
    t[0x1B] = op("SLO", Slo, AbsoluteY, 7);
    t[0x03] = op("SLO", Slo, IndexedIndirect, 8);
    t[0x13] = op("SLO", Slo, IndirectIndexed, 8);
    t[0x27] = op("RLA", Rla, ZeroPage, 5);
    t[0x37] = op("RLA", Rla, ZeroPageX, 6);
    t[0x2F] = op("RLA", Rla, Absolute, 6);
    t[0x3F] = op("RLA", Rla, AbsoluteX, 7);
    t[0x3B] = op("RLA", Rla, AbsoluteY, 7);
    t[0x23] = op("RLA", Rla, IndexedIndirect, 8);
    t[0x33] = op("RLA", Rla, IndirectIndexed, 8);
    t[0x47] = op("SRE", Sre, ZeroPage, 5);
    t[0x57] = op("SRE", Sre, ZeroPageX, 6);
    t[0x4F] = op("SRE", Sre, Absolute, 6);
    t[0x5F] = op("SRE", Sre, AbsoluteX, 7);
    t[0x5B] = op("SRE", Sre, AbsoluteY, 7);
    t[0x43] = op("SRE", Sre, IndexedIndirect, 8);
    t[0x53] = op("SRE", Sre, IndirectIndexed, 8);
    t[0x67] = op("RRA", Rra, ZeroPage, 5);
    t[0x77] = op("RRA", Rra, ZeroPageX, 6);
    t[0x6F] = op("RRA", Rra, Absolute, 6);
    t[0x7F] = op("RRA", Rra, AbsoluteX, 7);
    t[0x7B] = op("RRA", Rra, AbsoluteY, 7);
    t[0x63] = op("RRA", Rra, IndexedIndirect, 8);
    t[0x73] = op("RRA", Rra, IndirectIndexed, 8);

    t[0x0B] = op("ANC", Anc, Immediate, 2);
    t[0x2B] = op("ANC", Anc, Immediate, 2);
    t[0x4B] = op("ALR", Alr, Immediate, 2);
    t[0x6B] = op("ARR", Arr, Immediate, 2);
    t[0xCB] = op("AXS", Axs, Immediate, 2);

    t
};
