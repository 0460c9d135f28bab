use crate::{
    bus::Bus,
    cpu::{
        flags::StatusFlags,
        instructions::{AddressingMode, INSTRUCTIONS, Operation},
    },
    error::{BusError, CpuError},
};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

const STACK_BASE: u16 = 0x0100;
const STACK_RESET: u8 = 0xFD;

/// Cycles spent entering an interrupt handler or leaving reset.
const INTERRUPT_CYCLES: u32 = 7;

/// Where an instruction's operand lives once its addressing mode has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Accumulator,
    Memory(u16),
    Relative(i8),
}

/// Ricoh 2A03 core: a 6502 without decimal mode.
///
/// The CPU is clocked one cycle at a time. Each instruction executes on the first
/// cycle of its window and the remaining cycles are then burned, so bus side effects
/// land at instruction granularity while the total cycle count stays exact.
pub struct CPU<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: StatusFlags,
    pub cycles: u64,
    pub bus: B,
    remaining: u32,
    nmi_pending: bool,
    irq_line: bool,
    fault: Option<CpuError>,
}

impl<B: Bus> CPU<B> {
    pub fn new(bus: B) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: STACK_RESET,
            pc: 0,
            status: StatusFlags::INTERRUPT_DISABLE | StatusFlags::UNUSED,
            cycles: 0,
            bus,
            remaining: 0,
            nmi_pending: false,
            irq_line: false,
            fault: None,
        }
    }

    /// Load PC from the reset vector and return registers to their power-up values.
    /// The reset sequence's cycles are consumed by the following clocks.
    pub fn reset(&mut self) -> Result<(), CpuError> {
        self.pc = self.read_word(RESET_VECTOR)?;

        self.sp = STACK_RESET; // resets at 0xFD instead of 0xFF: three phantom pushes
        self.status = StatusFlags::INTERRUPT_DISABLE | StatusFlags::UNUSED;

        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.nmi_pending = false;
        self.irq_line = false;
        self.fault = None;

        self.remaining = INTERRUPT_CYCLES;
        log::info!("CPU reset, PC=${:04X}", self.pc);
        Ok(())
    }

    /// Latch a non-maskable interrupt; it is serviced at the next instruction boundary.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drive the level-triggered IRQ line.
    pub fn set_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// Suspend instruction fetch for `cycles` more cycles (OAM DMA).
    pub fn stall(&mut self, cycles: u32) {
        self.remaining += cycles;
    }

    /// Cycles left before the next instruction boundary.
    pub fn remaining_cycles(&self) -> u32 {
        self.remaining
    }

    pub fn is_jammed(&self) -> bool {
        self.fault.is_some()
    }

    /// Advance one CPU cycle.
    ///
    /// At an instruction boundary a pending NMI, then an unmasked IRQ, is serviced
    /// before the next opcode is fetched. A fault leaves the CPU jammed: every later
    /// clock returns the same error until [`CPU::reset`].
    pub fn clock(&mut self) -> Result<(), CpuError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        if self.remaining == 0 {
            let result = if self.nmi_pending {
                self.nmi_pending = false;
                self.interrupt(NMI_VECTOR).map_err(CpuError::from)
            } else if self.irq_line && !self.status.contains(StatusFlags::INTERRUPT_DISABLE) {
                self.interrupt(IRQ_VECTOR).map_err(CpuError::from)
            } else {
                self.execute_next()
            };

            if let Err(err) = result {
                log::error!("CPU halted: {err}");
                self.fault = Some(err.clone());
                return Err(err);
            }
        }

        self.remaining -= 1;
        self.cycles += 1;
        Ok(())
    }

    /// Finish any in-flight work, then run one whole instruction (or interrupt
    /// entry). Returns the cycles that instruction took.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        while self.remaining > 0 {
            self.clock()?;
        }

        let start = self.cycles;
        loop {
            self.clock()?;
            if self.remaining == 0 {
                break;
            }
        }
        Ok((self.cycles - start) as u32)
    }

    fn execute_next(&mut self) -> Result<(), CpuError> {
        let address = self.pc;
        let opcode = self.read(address)?;
        let instruction = INSTRUCTIONS[opcode as usize];

        if instruction.operation == Operation::Illegal {
            return Err(CpuError::IllegalOpcode { opcode, address });
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", self.trace_line()?);
        }

        self.pc = self.pc.wrapping_add(1);
        self.status.insert(StatusFlags::UNUSED);
        self.remaining = instruction.cycles as u32;

        let (operand, page_crossed) = self.resolve(instruction.mode)?;
        self.execute(instruction.operation, operand)?;

        if page_crossed && instruction.operation.page_penalty() {
            self.remaining += 1;
        }
        self.status.insert(StatusFlags::UNUSED);
        Ok(())
    }

    /// nestest-style line for the instruction at PC: address, raw bytes, mnemonic
    /// and registers before it runs.
    pub fn trace_line(&mut self) -> Result<String, BusError> {
        let pc = self.pc;
        let opcode = self.read(pc)?;
        let instruction = INSTRUCTIONS[opcode as usize];
        let operands = (1..=instruction.mode.operand_len())
            .map(|offset| self.read(pc.wrapping_add(offset)))
            .collect::<Result<Vec<u8>, _>>()?;
        let bytes = std::iter::once(opcode)
            .chain(operands)
            .map(|byte| format!("{byte:02X}"))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(format!(
            "{:04X}  {:<8}  {}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            pc,
            bytes,
            instruction.mnemonic,
            self.a,
            self.x,
            self.y,
            self.status.bits(),
            self.sp,
            self.cycles
        ))
    }

    /// Run an addressing mode: consume operand bytes and report whether indexing
    /// crossed a page.
    fn resolve(&mut self, mode: AddressingMode) -> Result<(Operand, bool), BusError> {
        let resolved = match mode {
            AddressingMode::Implied => (Operand::Implied, false),
            AddressingMode::Accumulator => (Operand::Accumulator, false),
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (Operand::Memory(addr), false)
            }
            AddressingMode::ZeroPage => (Operand::Memory(self.fetch_byte()? as u16), false),
            AddressingMode::ZeroPageX => {
                let addr = self.fetch_byte()?.wrapping_add(self.x);
                (Operand::Memory(addr as u16), false)
            }
            AddressingMode::ZeroPageY => {
                let addr = self.fetch_byte()?.wrapping_add(self.y);
                (Operand::Memory(addr as u16), false)
            }
            AddressingMode::Relative => (Operand::Relative(self.fetch_byte()? as i8), false),
            AddressingMode::Absolute => (Operand::Memory(self.fetch_word()?), false),
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word()?;
                let addr = base.wrapping_add(self.x as u16);
                (Operand::Memory(addr), page_crossed(base, addr))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word()?;
                let addr = base.wrapping_add(self.y as u16);
                (Operand::Memory(addr), page_crossed(base, addr))
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word()?;
                // The high byte comes from the same page: JMP ($10FF) reads $10FF and $1000.
                let lo = self.read(ptr)? as u16;
                let hi = self.read((ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF))? as u16;
                (Operand::Memory((hi << 8) | lo), false)
            }
            AddressingMode::IndexedIndirect => {
                let zp = self.fetch_byte()?.wrapping_add(self.x);
                (Operand::Memory(self.read_zero_page_word(zp)?), false)
            }
            AddressingMode::IndirectIndexed => {
                let zp = self.fetch_byte()?;
                let base = self.read_zero_page_word(zp)?;
                let addr = base.wrapping_add(self.y as u16);
                (Operand::Memory(addr), page_crossed(base, addr))
            }
        };
        Ok(resolved)
    }

    fn execute(&mut self, operation: Operation, operand: Operand) -> Result<(), BusError> {
        match operation {
            Operation::Lda => {
                self.a = self.load(operand)?;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Ldx => {
                self.x = self.load(operand)?;
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::Ldy => {
                self.y = self.load(operand)?;
                self.update_zero_and_negative_flags(self.y);
            }
            Operation::Sta => self.store(operand, self.a)?,
            Operation::Stx => self.store(operand, self.x)?,
            Operation::Sty => self.store(operand, self.y)?,

            Operation::Tax => {
                self.x = self.a;
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::Tay => {
                self.y = self.a;
                self.update_zero_and_negative_flags(self.y);
            }
            Operation::Tsx => {
                self.x = self.sp;
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::Txa => {
                self.a = self.x;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Txs => self.sp = self.x,
            Operation::Tya => {
                self.a = self.y;
                self.update_zero_and_negative_flags(self.a);
            }

            Operation::Pha => self.push(self.a)?,
            Operation::Php => {
                let status = self.status | StatusFlags::BREAK | StatusFlags::UNUSED;
                self.push(status.bits())?;
            }
            Operation::Pla => {
                self.a = self.pop()?;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Plp => {
                let status = self.pop()?;
                self.restore_status(status);
            }

            Operation::Adc => {
                let value = self.load(operand)?;
                self.add_with_carry(value);
            }
            Operation::Sbc => {
                let value = self.load(operand)?;
                self.add_with_carry(value ^ 0xFF);
            }
            Operation::And => {
                let value = self.load(operand)?;
                self.a &= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Ora => {
                let value = self.load(operand)?;
                self.a |= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Eor => {
                let value = self.load(operand)?;
                self.a ^= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Bit => {
                let value = self.load(operand)?;
                self.status.set(StatusFlags::ZERO, self.a & value == 0);
                self.status.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
                self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
            }

            Operation::Cmp => {
                let value = self.load(operand)?;
                self.compare(self.a, value);
            }
            Operation::Cpx => {
                let value = self.load(operand)?;
                self.compare(self.x, value);
            }
            Operation::Cpy => {
                let value = self.load(operand)?;
                self.compare(self.y, value);
            }

            Operation::Inc => {
                let value = self.load(operand)?.wrapping_add(1);
                self.store(operand, value)?;
                self.update_zero_and_negative_flags(value);
            }
            Operation::Dec => {
                let value = self.load(operand)?.wrapping_sub(1);
                self.store(operand, value)?;
                self.update_zero_and_negative_flags(value);
            }
            Operation::Inx => {
                self.x = self.x.wrapping_add(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::Iny => {
                self.y = self.y.wrapping_add(1);
                self.update_zero_and_negative_flags(self.y);
            }
            Operation::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.y);
            }

            Operation::Asl => {
                self.asl(operand)?;
            }
            Operation::Lsr => {
                self.lsr(operand)?;
            }
            Operation::Rol => {
                self.rol(operand)?;
            }
            Operation::Ror => {
                self.ror(operand)?;
            }

            Operation::Jmp => self.pc = self.target(operand),
            Operation::Jsr => {
                self.push_word(self.pc.wrapping_sub(1))?;
                self.pc = self.target(operand);
            }
            Operation::Rts => {
                self.pc = self.pop_word()?.wrapping_add(1);
            }
            Operation::Brk => {
                // The byte after BRK is padding.
                self.push_word(self.pc.wrapping_add(1))?;
                let status = self.status | StatusFlags::BREAK | StatusFlags::UNUSED;
                self.push(status.bits())?;
                self.status.insert(StatusFlags::INTERRUPT_DISABLE);
                self.pc = self.read_word(IRQ_VECTOR)?;
            }
            Operation::Rti => {
                let status = self.pop()?;
                self.restore_status(status);
                self.pc = self.pop_word()?;
            }

            Operation::Bcc => self.branch(!self.status.contains(StatusFlags::CARRY), operand),
            Operation::Bcs => self.branch(self.status.contains(StatusFlags::CARRY), operand),
            Operation::Bne => self.branch(!self.status.contains(StatusFlags::ZERO), operand),
            Operation::Beq => self.branch(self.status.contains(StatusFlags::ZERO), operand),
            Operation::Bpl => self.branch(!self.status.contains(StatusFlags::NEGATIVE), operand),
            Operation::Bmi => self.branch(self.status.contains(StatusFlags::NEGATIVE), operand),
            Operation::Bvc => self.branch(!self.status.contains(StatusFlags::OVERFLOW), operand),
            Operation::Bvs => self.branch(self.status.contains(StatusFlags::OVERFLOW), operand),

            Operation::Clc => self.status.remove(StatusFlags::CARRY),
            Operation::Cld => self.status.remove(StatusFlags::DECIMAL),
            Operation::Cli => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            Operation::Clv => self.status.remove(StatusFlags::OVERFLOW),
            Operation::Sec => self.status.insert(StatusFlags::CARRY),
            Operation::Sed => self.status.insert(StatusFlags::DECIMAL),
            Operation::Sei => self.status.insert(StatusFlags::INTERRUPT_DISABLE),

            Operation::Nop => {}

            Operation::Lax => {
                let value = self.load(operand)?;
                self.a = value;
                self.x = value;
                self.update_zero_and_negative_flags(value);
            }
            Operation::Sax => self.store(operand, self.a & self.x)?,
            Operation::Dcp => {
                let value = self.load(operand)?.wrapping_sub(1);
                self.store(operand, value)?;
                self.compare(self.a, value);
            }
            Operation::Isc => {
                let value = self.load(operand)?.wrapping_add(1);
                self.store(operand, value)?;
                self.add_with_carry(value ^ 0xFF);
            }
            Operation::Slo => {
                let value = self.asl(operand)?;
                self.a |= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Rla => {
                let value = self.rol(operand)?;
                self.a &= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Sre => {
                let value = self.lsr(operand)?;
                self.a ^= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::Rra => {
                let value = self.ror(operand)?;
                self.add_with_carry(value);
            }
            Operation::Anc => {
                let value = self.load(operand)?;
                self.a &= value;
                self.update_zero_and_negative_flags(self.a);
                self.status.set(StatusFlags::CARRY, self.a & 0x80 != 0);
            }
            Operation::Alr => {
                let value = self.load(operand)?;
                self.a &= value;
                self.lsr(Operand::Accumulator)?;
            }
            Operation::Arr => {
                let value = self.load(operand)? & self.a;
                let carry = self.status.contains(StatusFlags::CARRY) as u8;
                self.a = (value >> 1) | (carry << 7);
                self.update_zero_and_negative_flags(self.a);
                self.status.set(StatusFlags::CARRY, self.a & 0x40 != 0);
                self.status
                    .set(StatusFlags::OVERFLOW, ((self.a >> 6) ^ (self.a >> 5)) & 1 != 0);
            }
            Operation::Axs => {
                let value = self.load(operand)?;
                let masked = self.a & self.x;
                self.x = masked.wrapping_sub(value);
                self.status.set(StatusFlags::CARRY, masked >= value);
                self.update_zero_and_negative_flags(self.x);
            }

            Operation::Illegal => {}
        }
        Ok(())
    }

    fn add_with_carry(&mut self, value: u8) {
        let carry = self.status.contains(StatusFlags::CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;

        self.status.set(StatusFlags::CARRY, sum > 0xFF);
        // Signed overflow: both inputs share a sign the result does not.
        self.status
            .set(StatusFlags::OVERFLOW, (self.a ^ result) & (value ^ result) & 0x80 != 0);

        self.a = result;
        self.update_zero_and_negative_flags(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(StatusFlags::CARRY, register >= value);
        self.update_zero_and_negative_flags(register.wrapping_sub(value));
    }

    fn asl(&mut self, operand: Operand) -> Result<u8, BusError> {
        let value = self.load(operand)?;
        let result = value << 1;
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        self.store(operand, result)?;
        self.update_zero_and_negative_flags(result);
        Ok(result)
    }

    fn lsr(&mut self, operand: Operand) -> Result<u8, BusError> {
        let value = self.load(operand)?;
        let result = value >> 1;
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        self.store(operand, result)?;
        self.update_zero_and_negative_flags(result);
        Ok(result)
    }

    fn rol(&mut self, operand: Operand) -> Result<u8, BusError> {
        let value = self.load(operand)?;
        let carry = self.status.contains(StatusFlags::CARRY) as u8;
        let result = (value << 1) | carry;
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        self.store(operand, result)?;
        self.update_zero_and_negative_flags(result);
        Ok(result)
    }

    fn ror(&mut self, operand: Operand) -> Result<u8, BusError> {
        let value = self.load(operand)?;
        let carry = self.status.contains(StatusFlags::CARRY) as u8;
        let result = (value >> 1) | (carry << 7);
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        self.store(operand, result)?;
        self.update_zero_and_negative_flags(result);
        Ok(result)
    }

    /// Taken branches cost one extra cycle, two when the target is on another page.
    fn branch(&mut self, condition: bool, operand: Operand) {
        let Operand::Relative(offset) = operand else {
            return;
        };
        if !condition {
            return;
        }

        let old_pc = self.pc;
        self.pc = self.pc.wrapping_add(offset as u16);
        self.remaining += 1;

        if (old_pc & 0xFF00) != (self.pc & 0xFF00) {
            self.remaining += 1;
        }
    }

    /// Push PC and P (break clear), mask IRQs, and jump through `vector`.
    fn interrupt(&mut self, vector: u16) -> Result<(), BusError> {
        self.push_word(self.pc)?;
        let status = (self.status - StatusFlags::BREAK) | StatusFlags::UNUSED;
        self.push(status.bits())?;

        self.status.insert(StatusFlags::INTERRUPT_DISABLE);
        self.pc = self.read_word(vector)?;

        self.remaining = INTERRUPT_CYCLES;
        Ok(())
    }

    fn restore_status(&mut self, bits: u8) {
        self.status = StatusFlags::from_bits_retain(bits) - StatusFlags::BREAK | StatusFlags::UNUSED;
    }

    fn update_zero_and_negative_flags(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }

    /// Value an operation consumes. Only operations that need a value read it, so
    /// stores never touch their target before writing.
    fn load(&mut self, operand: Operand) -> Result<u8, BusError> {
        match operand {
            Operand::Memory(addr) => self.read(addr),
            _ => Ok(self.a),
        }
    }

    fn store(&mut self, operand: Operand, value: u8) -> Result<(), BusError> {
        match operand {
            Operand::Memory(addr) => self.write(addr, value),
            _ => {
                self.a = value;
                Ok(())
            }
        }
    }

    fn target(&self, operand: Operand) -> u16 {
        match operand {
            Operand::Memory(addr) => addr,
            _ => self.pc,
        }
    }

    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        self.bus.read(addr)
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        self.bus.write(addr, data)
    }

    fn read_word(&mut self, addr: u16) -> Result<u16, BusError> {
        let lo = self.read(addr)? as u16;
        let hi = self.read(addr.wrapping_add(1))? as u16;
        Ok((hi << 8) | lo)
    }

    /// Pointer fetch that wraps inside the zero page: ($FF) reads $FF and $00.
    fn read_zero_page_word(&mut self, zp: u8) -> Result<u16, BusError> {
        let lo = self.read(zp as u16)? as u16;
        let hi = self.read(zp.wrapping_add(1) as u16)? as u16;
        Ok((hi << 8) | lo)
    }

    fn fetch_byte(&mut self) -> Result<u8, BusError> {
        let byte = self.read(self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(byte)
    }

    fn fetch_word(&mut self) -> Result<u16, BusError> {
        let lo = self.fetch_byte()? as u16;
        let hi = self.fetch_byte()? as u16;
        Ok((hi << 8) | lo)
    }

    fn push(&mut self, value: u8) -> Result<(), BusError> {
        let addr = STACK_BASE | self.sp as u16;
        self.write(addr, value)?;
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    fn pop(&mut self) -> Result<u8, BusError> {
        self.sp = self.sp.wrapping_add(1);
        let addr = STACK_BASE | self.sp as u16;
        self.read(addr)
    }

    fn push_word(&mut self, value: u16) -> Result<(), BusError> {
        self.push((value >> 8) as u8)?;
        self.push(value as u8)
    }

    fn pop_word(&mut self) -> Result<u16, BusError> {
        let lo = self.pop()? as u16;
        let hi = self.pop()? as u16;
        Ok((hi << 8) | lo)
    }
}

fn page_crossed(base: u16, addr: u16) -> bool {
    base & 0xFF00 != addr & 0xFF00
}
