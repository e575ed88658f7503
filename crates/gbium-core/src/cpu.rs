use std::fmt::Display;

use tracing::{debug, error, trace};

use crate::cpu::flags::Flags;
use crate::cpu::instruction::{Instruction, R8, R16, Stk};
use crate::cpu::interrupt::Interrupt;
use crate::cpu::lookup::{CB_TABLE, LOOKUP_TABLE};
use crate::cpu::mnemonic::Mnemonic;
use crate::cpu::phase::Phase;
use crate::cpu::registers::Registers;
use crate::error::Error;
use crate::memory::MemoryView;

pub mod flags;
pub mod interrupt;
pub mod phase;
pub mod registers;

mod instruction;
mod lookup;
mod mnemonic;
mod timing;

/// Machine cycles spent entering an interrupt service routine.
pub const INTERRUPT_DISPATCH_CYCLES: u8 = 5;

/// Condition that stops the engine for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Fault {
    IllegalOpcode { opcode: u8, pc: u16 },
    StackUnderflow { sp: u16, pc: u16 },
}

impl Fault {
    fn from_error(err: &Error) -> Option<Self> {
        match *err {
            Error::IllegalOpcode { opcode, pc } => Some(Fault::IllegalOpcode { opcode, pc }),
            Error::StackUnderflow { sp, pc } => Some(Fault::StackUnderflow { sp, pc }),
            _ => None,
        }
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::IllegalOpcode { opcode, pc } => Error::IllegalOpcode { opcode, pc },
            Fault::StackUnderflow { sp, pc } => Error::StackUnderflow { sp, pc },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cpu {
    pub(crate) regs: Registers,

    /// Interrupt master enable.
    pub(crate) ime: bool,
    /// Opcode fetches left before a pending EI sets `ime`.
    pub(crate) ime_delay: u8,
    pub(crate) halted: bool,
    pub(crate) stopped: bool,

    // Dispatch state for the instruction in flight.
    pub(crate) phase: Phase,
    pub(crate) opcode: u8,
    pub(crate) opcode_pc: u16,
    pub(crate) instr: Instruction,
    pub(crate) operand: [u8; 2],
    pub(crate) remaining: u8,

    fault: Option<Fault>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU with the register file the boot ROM leaves behind, about to fetch
    /// from the cartridge entry point.
    pub fn new() -> Self {
        Self::with_registers(Registers::power_on())
    }

    pub fn with_registers(regs: Registers) -> Self {
        Self {
            regs,
            ime: false,
            ime_delay: 0,
            halted: false,
            stopped: false,
            phase: Phase::FetchOpcode,
            opcode: 0,
            opcode_pc: regs.pc,
            instr: LOOKUP_TABLE[0],
            operand: [0; 2],
            remaining: 0,
            fault: None,
        }
    }

    /// Advance the dispatch engine by exactly one machine cycle.
    ///
    /// Once an illegal opcode or a stack underflow has been reported, every
    /// further call returns the same error without touching state.
    pub fn clock(&mut self, mem: &mut MemoryView<'_>) -> Result<(), Error> {
        if let Some(fault) = self.fault {
            return Err(fault.into());
        }

        let result = match self.phase {
            Phase::FetchOpcode => self.fetch_opcode(mem),
            Phase::Fetch(n) => self.fetch_operand(mem, n),
            Phase::Execute(n) => {
                self.wait_state(n);
                Ok(())
            }
        };

        if let Err(err) = &result {
            if let Some(fault) = Fault::from_error(err) {
                error!(%err, regs = %self.regs, "cpu jammed");
                self.fault = Some(fault);
            }
        }
        result
    }

    fn fetch_opcode(&mut self, mem: &mut MemoryView<'_>) -> Result<(), Error> {
        if self.ime_delay > 0 {
            self.ime_delay -= 1;
            if self.ime_delay == 0 {
                self.ime = true;
            }
        }

        if self.stopped {
            if !mem.memory().interrupt_flags().contains(Interrupt::JOYPAD) {
                return Ok(());
            }
            self.stopped = false;
            debug!(pc = self.regs.pc, "joypad input resumes cpu");
        }

        if self.halted {
            if mem.memory().pending_interrupts().is_empty() {
                return Ok(());
            }
            self.halted = false;
            self.regs.pc = self.regs.pc.wrapping_add(1);
            trace!(pc = self.regs.pc, "halt broken by pending interrupt");
        }

        if self.ime {
            if let Some(interrupt) = mem.memory().pending_interrupts().highest_priority() {
                self.service_interrupt(mem, interrupt);
                self.begin_execute(INTERRUPT_DISPATCH_CYCLES - 1);
                return Ok(());
            }
        }

        self.opcode_pc = self.regs.pc;
        self.opcode = mem.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.instr = LOOKUP_TABLE[self.opcode as usize];
        self.operand = [0; 2];

        if self.instr.operand.len() == 0 {
            self.complete(mem, 0)
        } else {
            self.phase = Phase::Fetch(1);
            Ok(())
        }
    }

    fn fetch_operand(&mut self, mem: &mut MemoryView<'_>, n: u8) -> Result<(), Error> {
        let byte = mem.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.operand[usize::from(n - 1)] = byte;

        if matches!(self.instr.mnemonic, Mnemonic::Prefix) {
            self.instr = CB_TABLE[byte as usize];
            return self.complete(mem, n);
        }

        if n < self.instr.operand.len() {
            self.phase = Phase::Fetch(n + 1);
            Ok(())
        } else {
            self.complete(mem, n)
        }
    }

    /// Apply the instruction and schedule the wait states that remain of its
    /// cycle budget.
    fn complete(&mut self, mem: &mut MemoryView<'_>, fetched: u8) -> Result<(), Error> {
        let taken = self.execute(mem)?;
        let total = self.instr.timing.cycles(taken);
        self.begin_execute(total.saturating_sub(1 + fetched));
        Ok(())
    }

    fn begin_execute(&mut self, remaining: u8) {
        self.remaining = remaining;
        self.phase = if remaining == 0 {
            Phase::FetchOpcode
        } else {
            Phase::Execute(1)
        };
    }

    fn wait_state(&mut self, n: u8) {
        self.remaining = self.remaining.saturating_sub(1);
        self.phase = if self.remaining == 0 {
            Phase::FetchOpcode
        } else {
            Phase::Execute(n + 1)
        };
    }

    /// `true` when the next call to [`Cpu::clock`] starts a new instruction.
    pub fn at_instruction_boundary(&self) -> bool {
        self.phase == Phase::FetchOpcode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_jammed(&self) -> bool {
        self.fault.is_some()
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            registers: self.regs,
            ime: self.ime,
            ime_delay: self.ime_delay,
            halted: self.halted,
            stopped: self.stopped,
            jammed: self.is_jammed(),
        }
    }

    /// Load a snapshot taken at an instruction boundary.
    pub fn restore(&mut self, snapshot: &CpuSnapshot) {
        *self = Self::with_registers(snapshot.registers);
        self.ime = snapshot.ime;
        self.ime_delay = snapshot.ime_delay;
        self.halted = snapshot.halted;
        self.stopped = snapshot.stopped;
    }

    #[inline]
    pub(crate) fn imm16(&self) -> u16 {
        u16::from_be_bytes([self.operand[1], self.operand[0]])
    }

    /// CPU-side write. Rejected writes are not errors for the program.
    #[inline]
    pub(crate) fn write(&self, mem: &mut MemoryView<'_>, addr: u16, value: u8) {
        if let Err(err) = mem.write(addr, value) {
            trace!(%err, pc = self.opcode_pc, "cpu write dropped");
        }
    }

    pub(crate) fn read_r8(&self, mem: &MemoryView<'_>, reg: R8) -> u8 {
        match reg {
            R8::B => self.regs.b,
            R8::C => self.regs.c,
            R8::D => self.regs.d,
            R8::E => self.regs.e,
            R8::H => self.regs.h,
            R8::L => self.regs.l,
            R8::HlInd => mem.read(self.regs.hl()),
            R8::A => self.regs.a,
        }
    }

    pub(crate) fn write_r8(&mut self, mem: &mut MemoryView<'_>, reg: R8, value: u8) {
        match reg {
            R8::B => self.regs.b = value,
            R8::C => self.regs.c = value,
            R8::D => self.regs.d = value,
            R8::E => self.regs.e = value,
            R8::H => self.regs.h = value,
            R8::L => self.regs.l = value,
            R8::HlInd => self.write(mem, self.regs.hl(), value),
            R8::A => self.regs.a = value,
        }
    }

    pub(crate) fn r16(&self, pair: R16) -> u16 {
        match pair {
            R16::BC => self.regs.bc(),
            R16::DE => self.regs.de(),
            R16::HL => self.regs.hl(),
            R16::SP => self.regs.sp,
        }
    }

    pub(crate) fn set_r16(&mut self, pair: R16, value: u16) {
        match pair {
            R16::BC => self.regs.set_bc(value),
            R16::DE => self.regs.set_de(value),
            R16::HL => self.regs.set_hl(value),
            R16::SP => self.regs.sp = value,
        }
    }

    pub(crate) fn stk(&self, pair: Stk) -> u16 {
        match pair {
            Stk::BC => self.regs.bc(),
            Stk::DE => self.regs.de(),
            Stk::HL => self.regs.hl(),
            Stk::AF => self.regs.af(),
        }
    }

    pub(crate) fn set_stk(&mut self, pair: Stk, value: u16) {
        match pair {
            Stk::BC => self.regs.set_bc(value),
            Stk::DE => self.regs.set_de(value),
            Stk::HL => self.regs.set_hl(value),
            Stk::AF => self.regs.set_af(value),
        }
    }
}

impl Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.snapshot())
    }
}

/// Register file and control latches at an instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuSnapshot {
    pub registers: Registers,
    pub ime: bool,
    pub ime_delay: u8,
    pub halted: bool,
    pub stopped: bool,
    pub jammed: bool,
}

impl CpuSnapshot {
    pub fn flags(&self) -> Flags {
        self.registers.f
    }
}

impl Display for CpuSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ime:{} halt:{} stop:{}",
            self.registers,
            u8::from(self.ime),
            u8::from(self.halted),
            u8::from(self.stopped)
        )?;
        if self.jammed {
            f.write_str(" JAMMED")?;
        }
        Ok(())
    }
}
