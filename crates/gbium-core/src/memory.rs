//! Banked, permission-partitioned 64 KiB memory space.
//!
//! [`Memory`] owns the flat address space plus the cartridge ROM/RAM banks.
//! Components never hold it directly: each cycle they receive a short-lived
//! [`MemoryView`] that pairs the borrow with the component's [`Permission`],
//! which is what the VRAM/DMA locks are checked against.

use tracing::trace;

use crate::{
    cartridge::header::{CartridgeKind, Header},
    cpu::interrupt::Interrupt,
    error::{BankKind, Error},
    joypad::JoypadState,
    mem_block::layout::{AddressSpace, RamBank, RomBank},
};

pub(crate) mod banking;
pub mod map;
mod permission;
mod register;

use banking::BankController;
pub use permission::Permission;
pub use register::RegisterHandle;

/// Value the CPU sees for locked regions during OAM DMA.
const DMA_LOCKED_READ: u8 = 0xFF;
/// MBC2 RAM is 512 half-bytes mirrored across the window.
const MBC2_RAM_MASK: u16 = 0x01FF;

/// Ordinary "not permitted" outcomes of a write or a lock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("write to unwritable address {0:#06X}")]
    Unwritable(u16),
    #[error("write to {0:#06X} while VRAM is locked")]
    VramLocked(u16),
    #[error("access to {0:#06X} while OAM DMA holds the bus")]
    DmaLocked(u16),
    #[error("{0} may not take this lock")]
    PermissionDenied(Permission),
}

#[derive(Debug, Clone)]
pub struct Memory {
    flat: AddressSpace,
    rom_banks: Vec<RomBank>,
    ram_banks: Vec<RamBank>,
    banking: BankController,
    joypad: JoypadState,
    vram_locked: bool,
    dma_locked: bool,
}

impl Default for Memory {
    /// A ROM-only board with no bank storage: every access hits the flat array.
    fn default() -> Self {
        Self::new(CartridgeKind::RomOnly, 0, 0)
    }
}

impl Memory {
    /// Allocate a memory space with `rom_banks` 16 KiB slots (bank 0 included)
    /// and `ram_banks` 8 KiB slots, all zeroed.
    pub fn new(kind: CartridgeKind, rom_banks: usize, ram_banks: usize) -> Self {
        Self {
            flat: AddressSpace::new(),
            rom_banks: (0..rom_banks).map(|_| RomBank::new()).collect(),
            ram_banks: (0..ram_banks).map(|_| RamBank::new()).collect(),
            banking: BankController::new(kind),
            joypad: JoypadState::empty(),
            vram_locked: false,
            dma_locked: false,
        }
    }

    /// Size the bank arrays from a parsed cartridge header.
    pub fn for_header(header: &Header) -> Self {
        Self::new(header.kind, header.rom_banks, header.ram_banks)
    }

    /// Bind a permission to a short-lived borrow of this memory.
    #[inline]
    pub fn view(&mut self, permission: Permission) -> MemoryView<'_> {
        MemoryView {
            memory: self,
            permission,
        }
    }

    pub fn kind(&self) -> CartridgeKind {
        self.banking.kind()
    }

    /// Mapped read without lock checks.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            map::ROM_BANK_N_START..=map::ROM_BANK_N_END if !self.rom_banks.is_empty() => {
                let bank = self.banking.rom_bank() % self.rom_banks.len();
                self.rom_banks[bank][usize::from(addr - map::ROM_BANK_N_START)]
            }
            map::EXTERNAL_RAM_START..=map::EXTERNAL_RAM_END if self.ram_mapped() => {
                match self.kind() {
                    CartridgeKind::Mbc2 => {
                        let offset = usize::from((addr - map::EXTERNAL_RAM_START) & MBC2_RAM_MASK);
                        self.ram_banks[0][offset] | 0xF0
                    }
                    _ => {
                        let (bank, offset) = self.ram_slot(addr);
                        self.ram_banks[bank][offset]
                    }
                }
            }
            _ => self.flat[usize::from(addr)],
        }
    }

    /// Copy `data` into the flat array starting at `addr`, clipped to the end
    /// of the address space. Returns the number of bytes copied.
    pub fn dump(&mut self, addr: u16, data: &[u8]) -> usize {
        self.flat.load(usize::from(addr), data)
    }

    /// Fill ROM bank slot `bank` from `data`. Short input leaves the tail untouched.
    pub fn copy_rom_bank(&mut self, data: &[u8], bank: usize) -> Result<(), Error> {
        let count = self.rom_banks.len();
        let slot = self.rom_banks.get_mut(bank).ok_or(Error::BankOutOfRange {
            kind: BankKind::Rom,
            bank,
            count,
        })?;
        slot.load(0, data);
        Ok(())
    }

    /// Fill RAM bank slot `bank` from `data`, e.g. when restoring battery RAM.
    pub fn copy_ram_bank(&mut self, data: &[u8], bank: usize) -> Result<(), Error> {
        let count = self.ram_banks.len();
        let slot = self.ram_banks.get_mut(bank).ok_or(Error::BankOutOfRange {
            kind: BankKind::Ram,
            bank,
            count,
        })?;
        slot.load(0, data);
        Ok(())
    }

    pub fn rom_bank_count(&self) -> usize {
        self.rom_banks.len()
    }

    /// Save RAM banks in slot order.
    pub fn ram_banks(&self) -> &[RamBank] {
        &self.ram_banks
    }

    /// Live alias for an I/O register (`$FF00-$FFFF`).
    pub fn register(&self, addr: u16) -> Result<RegisterHandle, Error> {
        RegisterHandle::new(addr)
    }

    /// Latch new pad state. P1 reflects it on the next select write.
    pub fn set_joypad(&mut self, state: JoypadState) {
        self.joypad = state;
    }

    pub fn joypad(&self) -> JoypadState {
        self.joypad
    }

    pub fn vram_locked(&self) -> bool {
        self.vram_locked
    }

    pub fn dma_locked(&self) -> bool {
        self.dma_locked
    }

    #[inline]
    pub(crate) fn interrupt_flags(&self) -> Interrupt {
        Interrupt::from_bits_truncate(self.flat[usize::from(map::io::IF)])
    }

    #[inline]
    pub(crate) fn set_interrupt_flags(&mut self, flags: Interrupt) {
        let raw = &mut self.flat[usize::from(map::io::IF)];
        *raw = (*raw & !Interrupt::all().bits()) | flags.bits();
    }

    #[inline]
    pub(crate) fn interrupt_enable(&self) -> Interrupt {
        Interrupt::from_bits_truncate(self.flat[usize::from(map::io::IE)])
    }

    /// Interrupts both requested and enabled.
    #[inline]
    pub(crate) fn pending_interrupts(&self) -> Interrupt {
        self.interrupt_flags() & self.interrupt_enable()
    }

    /// Copy out everything a save state needs. ROM banks are left out since
    /// they are reloaded from the cartridge image.
    pub fn save_state(&self) -> MemoryState {
        MemoryState {
            kind: self.kind(),
            flat: self.flat.to_vec(),
            ram_banks: self.ram_banks.iter().map(|bank| bank.to_vec()).collect(),
            banking: self.banking,
            joypad: self.joypad,
            vram_locked: self.vram_locked,
            dma_locked: self.dma_locked,
        }
    }

    pub fn load_state(&mut self, state: &MemoryState) -> Result<(), Error> {
        if state.kind != self.kind() {
            return Err(Error::StateMismatch("cartridge kind"));
        }
        if state.ram_banks.len() != self.ram_banks.len() {
            return Err(Error::StateMismatch("RAM bank count"));
        }
        if state.flat.len() != map::ADDRESS_SPACE_SIZE {
            return Err(Error::StateMismatch("address space size"));
        }

        self.flat.load(0, &state.flat);
        for (bank, data) in state.ram_banks.iter().enumerate() {
            self.copy_ram_bank(data, bank)?;
        }
        self.banking = state.banking;
        self.joypad = state.joypad;
        self.vram_locked = state.vram_locked;
        self.dma_locked = state.dma_locked;
        Ok(())
    }

    fn ram_mapped(&self) -> bool {
        self.banking.ram_enabled() && !self.ram_banks.is_empty()
    }

    fn ram_slot(&self, addr: u16) -> (usize, usize) {
        let bank = self.banking.ram_bank() % self.ram_banks.len();
        (bank, usize::from(addr - map::EXTERNAL_RAM_START))
    }

    fn store(&mut self, addr: u16, value: u8) -> Result<(), AccessError> {
        if map::is_unwritable(addr) {
            return Err(AccessError::Unwritable(addr));
        }

        match addr {
            map::io::P1 => {
                self.flat[usize::from(addr)] = self.joypad.latch(value);
            }
            map::ROM_BANK_0_START..=map::ROM_BANK_N_END => self.banking.write(addr, value),
            map::EXTERNAL_RAM_START..=map::EXTERNAL_RAM_END if self.ram_mapped() => {
                match self.kind() {
                    CartridgeKind::Mbc2 => {
                        let offset = usize::from((addr - map::EXTERNAL_RAM_START) & MBC2_RAM_MASK);
                        self.ram_banks[0][offset] = value & 0x0F;
                    }
                    _ => {
                        let (bank, offset) = self.ram_slot(addr);
                        self.ram_banks[bank][offset] = value;
                    }
                }
            }
            _ => self.flat[usize::from(addr)] = value,
        }
        Ok(())
    }
}

/// Mutable contents of a [`Memory`], as captured by [`Memory::save_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryState {
    kind: CartridgeKind,
    flat: Vec<u8>,
    ram_banks: Vec<Vec<u8>>,
    banking: BankController,
    joypad: JoypadState,
    vram_locked: bool,
    dma_locked: bool,
}

/// A component's borrow of [`Memory`] for the duration of one cycle.
#[derive(Debug)]
pub struct MemoryView<'a> {
    memory: &'a mut Memory,
    permission: Permission,
}

impl<'a> MemoryView<'a> {
    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn read(&self, addr: u16) -> u8 {
        if self.permission.is_lockable() && self.memory.dma_locked && !map::is_hram(addr) {
            return DMA_LOCKED_READ;
        }
        self.memory.peek(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), AccessError> {
        if map::is_unwritable(addr) {
            return Err(AccessError::Unwritable(addr));
        }
        if self.permission.is_lockable() {
            if self.memory.dma_locked && !map::is_hram(addr) {
                return Err(AccessError::DmaLocked(addr));
            }
            if self.memory.vram_locked && map::is_vram(addr) {
                return Err(AccessError::VramLocked(addr));
            }
        }
        self.memory.store(addr, value)
    }

    /// Read a little-endian word (`addr` low byte, `addr + 1` high byte).
    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr);
        let hi = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    pub fn lock_vram(&mut self) -> Result<(), AccessError> {
        self.require(Permission::Ppu)?;
        self.memory.vram_locked = true;
        Ok(())
    }

    pub fn unlock_vram(&mut self) -> Result<(), AccessError> {
        self.require(Permission::Ppu)?;
        self.memory.vram_locked = false;
        Ok(())
    }

    pub fn lock_dma(&mut self) -> Result<(), AccessError> {
        self.require(Permission::Dma)?;
        self.memory.dma_locked = true;
        Ok(())
    }

    pub fn unlock_dma(&mut self) -> Result<(), AccessError> {
        self.require(Permission::Dma)?;
        self.memory.dma_locked = false;
        Ok(())
    }

    #[inline]
    pub fn load(&self, handle: RegisterHandle) -> u8 {
        handle.get(&*self.memory)
    }

    #[inline]
    pub fn store(&mut self, handle: RegisterHandle, value: u8) {
        handle.set(self.memory, value);
    }

    /// Raise an interrupt request bit in `IF`.
    pub fn request_interrupt(&mut self, interrupt: Interrupt) {
        let flags = self.memory.interrupt_flags() | interrupt;
        trace!(?interrupt, by = %self.permission, "interrupt requested");
        self.memory.set_interrupt_flags(flags);
    }

    pub(crate) fn memory(&self) -> &Memory {
        &*self.memory
    }

    pub(crate) fn memory_mut(&mut self) -> &mut Memory {
        &mut *self.memory
    }

    fn require(&self, permission: Permission) -> Result<(), AccessError> {
        if self.permission == permission {
            Ok(())
        } else {
            Err(AccessError::PermissionDenied(self.permission))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::map::io;

    fn mbc(kind: CartridgeKind, rom_banks: usize, ram_banks: usize) -> Memory {
        let mut memory = Memory::new(kind, rom_banks, ram_banks);
        for bank in 0..rom_banks {
            let data = vec![bank as u8; map::ROM_BANK_SIZE];
            memory.copy_rom_bank(&data, bank).expect("bank in range");
        }
        memory
    }

    #[test]
    fn echo_and_unusable_writes_are_rejected_without_mutation() {
        let mut memory = Memory::default();
        let mut cpu = memory.view(Permission::Cpu);
        for addr in [map::ECHO_START, 0xF000, map::ECHO_END, map::UNUSABLE_START, 0xFEFF] {
            let before = cpu.read(addr);
            assert_eq!(cpu.write(addr, 0x5A), Err(AccessError::Unwritable(addr)));
            assert_eq!(cpu.read(addr), before);
        }
        // Unwritable for every permission, not just the CPU.
        let mut system = memory.view(Permission::System);
        assert!(system.write(map::ECHO_START, 1).is_err());
    }

    #[test]
    fn wram_write_then_read() {
        let mut memory = Memory::default();
        let mut cpu = memory.view(Permission::Cpu);
        cpu.write(0xC123, 0x99).expect("wram is writable");
        assert_eq!(cpu.read(0xC123), 0x99);
    }

    #[test]
    fn rom_window_follows_selected_bank() {
        let mut memory = mbc(CartridgeKind::Mbc1, 8, 0);
        let mut cpu = memory.view(Permission::Cpu);
        assert_eq!(cpu.read(0x4000), 1);
        for bank in 0u8..=0x1F {
            cpu.write(0x2000, bank).expect("control write");
            let expected = banking::effective_bank(bank, 0x1F) as usize % 8;
            assert_eq!(cpu.read(0x4000), expected as u8, "bank {bank:#04X}");
            assert_eq!(cpu.read(0x7FFF), expected as u8);
        }
    }

    #[test]
    fn control_writes_do_not_touch_rom() {
        let mut memory = mbc(CartridgeKind::Mbc1, 4, 0);
        memory.dump(0x2000, &[0x77]);
        let mut cpu = memory.view(Permission::Cpu);
        cpu.write(0x2000, 0x02).expect("control write");
        assert_eq!(cpu.read(0x2000), 0x77);
    }

    #[test]
    fn mbc1_ram_banks_need_enable_and_mode() {
        let mut memory = mbc(CartridgeKind::Mbc1, 4, 4);
        let mut cpu = memory.view(Permission::Cpu);

        // Disabled: falls through to the flat array.
        cpu.write(0xA000, 0x11).expect("flat write");
        assert_eq!(cpu.read(0xA000), 0x11);

        cpu.write(0x0000, 0x0A).expect("enable ram");
        cpu.write(0x6000, 0x01).expect("ram banking mode");
        cpu.write(0x4000, 0x02).expect("ram bank 2");
        cpu.write(0xA000, 0x22).expect("bank write");
        assert_eq!(cpu.read(0xA000), 0x22);

        cpu.write(0x4000, 0x00).expect("ram bank 0");
        assert_eq!(cpu.read(0xA000), 0x00);

        assert_eq!(memory.ram_banks()[2][0], 0x22);
        assert_eq!(memory.peek(0xA000), 0x00);
        memory.view(Permission::Cpu).write(0x0000, 0x00).expect("disable ram");
        assert_eq!(memory.peek(0xA000), 0x11);
    }

    #[test]
    fn mbc2_ram_is_mirrored_nibbles() {
        let mut memory = mbc(CartridgeKind::Mbc2, 4, 1);
        let mut cpu = memory.view(Permission::Cpu);
        cpu.write(0x0000, 0x0A).expect("enable ram");
        cpu.write(0xA005, 0xAB).expect("ram write");
        assert_eq!(cpu.read(0xA005), 0xFB);
        assert_eq!(cpu.read(0xA205), 0xFB);
        assert_eq!(cpu.read(0xBE05), 0xFB);

        cpu.write(0x2100, 0x03).expect("rom bank");
        assert_eq!(cpu.read(0x4000), 3);
    }

    #[test]
    fn vram_lock_rejects_cpu_writes_but_keeps_reads() {
        let mut memory = Memory::default();
        memory
            .view(Permission::Cpu)
            .write(0x8000, 0x12)
            .expect("vram unlocked");

        assert_eq!(
            memory.view(Permission::Cpu).lock_vram(),
            Err(AccessError::PermissionDenied(Permission::Cpu))
        );
        memory.view(Permission::Ppu).lock_vram().expect("ppu owns vram");

        let mut cpu = memory.view(Permission::Cpu);
        assert_eq!(cpu.write(0x8000, 0x34), Err(AccessError::VramLocked(0x8000)));
        assert_eq!(cpu.read(0x8000), 0x12);

        let mut ppu = memory.view(Permission::Ppu);
        ppu.write(0x8000, 0x56).expect("ppu bypasses the lock");
        ppu.unlock_vram().expect("ppu owns vram");
        assert_eq!(memory.view(Permission::Cpu).read(0x8000), 0x56);
    }

    #[test]
    fn dma_lock_confines_cpu_to_hram() {
        let mut memory = Memory::default();
        memory.dump(0xC000, &[0x42]);
        memory.view(Permission::Dma).lock_dma().expect("dma owns the lock");

        let mut cpu = memory.view(Permission::Cpu);
        assert_eq!(cpu.read(0xC000), 0xFF);
        assert_eq!(cpu.write(0xC000, 1), Err(AccessError::DmaLocked(0xC000)));
        cpu.write(0xFF80, 0x99).expect("hram stays reachable");
        assert_eq!(cpu.read(0xFF80), 0x99);

        assert_eq!(memory.view(Permission::Dma).read(0xC000), 0x42);
        memory.view(Permission::Dma).unlock_dma().expect("dma owns the lock");
        assert_eq!(memory.view(Permission::Cpu).read(0xC000), 0x42);
    }

    #[test]
    fn p1_reflects_selected_row() {
        let mut memory = Memory::default();
        memory.set_joypad(JoypadState::A | JoypadState::DOWN);
        let mut cpu = memory.view(Permission::Cpu);

        cpu.write(io::P1, 0x10).expect("select buttons");
        assert_eq!(cpu.read(io::P1), 0xD0 | 0x0E);

        cpu.write(io::P1, 0x20).expect("select directions");
        assert_eq!(cpu.read(io::P1), 0xE0 | 0x07);

        cpu.write(io::P1, 0x30).expect("deselect");
        assert_eq!(cpu.read(io::P1), 0xFF);
    }

    #[test]
    fn copy_bank_out_of_range_is_an_error() {
        let mut memory = Memory::new(CartridgeKind::Mbc1, 2, 1);
        assert!(matches!(
            memory.copy_rom_bank(&[0; 4], 2),
            Err(Error::BankOutOfRange {
                kind: BankKind::Rom,
                bank: 2,
                count: 2
            })
        ));
        assert!(memory.copy_ram_bank(&[0; 4], 1).is_err());
        assert!(memory.copy_ram_bank(&[1; 4], 0).is_ok());
    }

    #[test]
    fn dump_clips_at_the_top_of_memory() {
        let mut memory = Memory::default();
        assert_eq!(memory.dump(0xFFFE, &[1, 2, 3]), 2);
        assert_eq!(memory.peek(0xFFFF), 2);
    }

    #[test]
    fn requested_interrupts_land_in_if() {
        let mut memory = Memory::default();
        memory
            .view(Permission::Counter)
            .request_interrupt(Interrupt::TIMER);
        assert_eq!(memory.peek(io::IF) & 0x1F, Interrupt::TIMER.bits());
    }

    #[test]
    fn state_round_trip_restores_banks_and_latches() {
        let mut memory = mbc(CartridgeKind::Mbc1, 8, 4);
        {
            let mut cpu = memory.view(Permission::Cpu);
            cpu.write(0x0000, 0x0A).expect("enable ram");
            cpu.write(0x6000, 0x01).expect("ram banking");
            cpu.write(0x4000, 0x02).expect("ram bank 2");
            cpu.write(0x2000, 0x05).expect("rom bank 5");
            cpu.write(0xA010, 0x99).expect("ram write");
            cpu.write(0xC000, 0x42).expect("wram write");
        }
        let state = memory.save_state();

        let mut fresh = mbc(CartridgeKind::Mbc1, 8, 4);
        fresh.load_state(&state).expect("same board");
        assert_eq!(fresh.peek(0x4000), 5);
        assert_eq!(fresh.peek(0xA010), 0x99);
        assert_eq!(fresh.peek(0xC000), 0x42);

        let mut other = mbc(CartridgeKind::Mbc2, 8, 1);
        assert!(matches!(
            other.load_state(&state),
            Err(Error::StateMismatch(_))
        ));
    }
}
