#![allow(dead_code)]

use anyhow::{Result, bail};
use gbium_core::{
    Gameboy, RunOutcome,
    cartridge::header::{self, CARTRIDGE_TYPE_ADDR, RAM_SIZE_ADDR, ROM_SIZE_ADDR},
    config::Config,
};

pub const BANK_SIZE: usize = 0x4000;
/// Entry point jumped to by the cartridge header stub.
pub const PROGRAM_START: u16 = 0x0150;

/// Assembles a cartridge image in memory.
pub struct RomBuilder {
    bytes: Vec<u8>,
}

impl RomBuilder {
    /// `rom_code` is the header size code: `2 << rom_code` banks.
    pub fn new(cartridge_type: u8, rom_code: u8, ram_code: u8) -> Self {
        let banks = 2usize << rom_code;
        let mut bytes = vec![0u8; banks * BANK_SIZE];
        // $0100: NOP ; JP $0150
        bytes[0x100..0x104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
        bytes[0x134..0x13A].copy_from_slice(b"GBIUM\0");
        bytes[usize::from(CARTRIDGE_TYPE_ADDR)] = cartridge_type;
        bytes[usize::from(ROM_SIZE_ADDR)] = rom_code;
        bytes[usize::from(RAM_SIZE_ADDR)] = ram_code;
        Self { bytes }
    }

    pub fn rom_only() -> Self {
        Self::new(0x00, 0x00, 0x00)
    }

    /// Places `code` at `addr` of ROM bank 0 / 1 (flat image offset).
    pub fn code(mut self, addr: u16, code: &[u8]) -> Self {
        let start = usize::from(addr);
        self.bytes[start..start + code.len()].copy_from_slice(code);
        self
    }

    /// Writes `code` at `offset` within switchable bank `bank`.
    pub fn bank(mut self, bank: usize, offset: usize, code: &[u8]) -> Self {
        let start = bank * BANK_SIZE + offset;
        self.bytes[start..start + code.len()].copy_from_slice(code);
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let sum = header::checksum(&self.bytes);
        self.bytes[usize::from(header::HEADER_CHECKSUM_ADDR)] = sum;
        self.bytes
    }

    pub fn boot(self) -> Result<Gameboy> {
        Ok(Gameboy::from_rom(&self.build(), Config::default())?)
    }
}

/// Runs until the CPU reaches `pc` or bails after `budget` cycles.
pub fn run_to(gb: &mut Gameboy, pc: u16, budget: u64) -> Result<u64> {
    match gb.run_until(pc, budget)? {
        RunOutcome::Breakpoint { cycles } => Ok(cycles),
        RunOutcome::CycleLimit => bail!(
            "cpu did not reach {pc:#06X} within {budget} cycles ({})",
            gb.snapshot()
        ),
    }
}
