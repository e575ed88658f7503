//! Address map of the handheld's 16-bit bus.
//!
//! Centralizing the ranges keeps magic numbers out of the CPU and the banking
//! logic, and mirrors the layout tables in the hardware documentation.

/// Size of the full address bus.
pub const ADDRESS_SPACE_SIZE: usize = 0x1_0000;

/// Size of one switchable program bank.
pub const ROM_BANK_SIZE: usize = 0x4000;
/// Size of one switchable save bank.
pub const RAM_BANK_SIZE: usize = 0x2000;

/// Fixed program bank 0.
pub const ROM_BANK_0_START: u16 = 0x0000;
pub const ROM_BANK_0_END: u16 = 0x3FFF;
/// Window showing the currently selected program bank.
pub const ROM_BANK_N_START: u16 = 0x4000;
pub const ROM_BANK_N_END: u16 = 0x7FFF;

/// Cartridge entry point executed after the boot sequence.
pub const ENTRY_POINT: u16 = 0x0100;

/// Video RAM.
pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;

/// Window showing the currently selected external (cartridge) RAM bank.
pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;

/// Internal work RAM.
pub const WRAM_START: u16 = 0xC000;
pub const WRAM_END: u16 = 0xDFFF;

/// Echo of work RAM. Unwritable in this core.
pub const ECHO_START: u16 = 0xE000;
pub const ECHO_END: u16 = 0xFDFF;

/// Object attribute memory.
pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;

/// Unconnected region between OAM and the I/O page.
pub const UNUSABLE_START: u16 = 0xFEA0;
pub const UNUSABLE_END: u16 = 0xFEFF;

/// Memory-mapped I/O registers.
pub const IO_START: u16 = 0xFF00;
pub const IO_END: u16 = 0xFF7F;

/// High RAM, the only region the CPU may touch during OAM DMA.
pub const HRAM_START: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;

/// Mapper control ranges (meaning depends on the cartridge kind).
pub mod control {
    pub const RAM_ENABLE_START: u16 = 0x0000;
    pub const RAM_ENABLE_END: u16 = 0x1FFF;
    pub const ROM_BANK_START: u16 = 0x2000;
    pub const ROM_BANK_END: u16 = 0x3FFF;
    pub const RAM_BANK_START: u16 = 0x4000;
    pub const RAM_BANK_END: u16 = 0x5FFF;
    pub const BANKING_MODE_START: u16 = 0x6000;
    pub const BANKING_MODE_END: u16 = 0x7FFF;

    /// Low nibble that enables external RAM when written to the enable range.
    pub const RAM_ENABLE_KEY: u8 = 0x0A;
}

/// I/O register addresses.
pub mod io {
    /// Joypad select / input (P1).
    pub const P1: u16 = 0xFF00;
    /// Serial transfer data.
    pub const SB: u16 = 0xFF01;
    /// Serial transfer control.
    pub const SC: u16 = 0xFF02;
    /// Divider register.
    pub const DIV: u16 = 0xFF04;
    /// Timer counter.
    pub const TIMA: u16 = 0xFF05;
    /// Timer modulo.
    pub const TMA: u16 = 0xFF06;
    /// Timer control.
    pub const TAC: u16 = 0xFF07;
    /// Interrupt request flags.
    pub const IF: u16 = 0xFF0F;
    /// LCD control.
    pub const LCDC: u16 = 0xFF40;
    /// LCD status.
    pub const STAT: u16 = 0xFF41;
    /// Current scanline.
    pub const LY: u16 = 0xFF44;
    /// OAM DMA source page.
    pub const DMA: u16 = 0xFF46;
    /// Background palette.
    pub const BGP: u16 = 0xFF47;
    /// Object palette 0.
    pub const OBP0: u16 = 0xFF48;
    /// Object palette 1.
    pub const OBP1: u16 = 0xFF49;
    /// Interrupt enable mask.
    pub const IE: u16 = 0xFFFF;
}

#[inline]
pub const fn is_unwritable(addr: u16) -> bool {
    matches!(addr, ECHO_START..=ECHO_END | UNUSABLE_START..=UNUSABLE_END)
}

#[inline]
pub const fn is_hram(addr: u16) -> bool {
    matches!(addr, HRAM_START..=HRAM_END)
}

#[inline]
pub const fn is_vram(addr: u16) -> bool {
    matches!(addr, VRAM_START..=VRAM_END)
}
