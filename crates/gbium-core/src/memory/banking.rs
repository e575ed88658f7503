//! Bank controller registers for the supported cartridge boards.
//!
//! Writes to `$0000-$7FFF` never reach ROM; they program these latches, which
//! in turn decide which ROM bank shows at `$4000-$7FFF` and which RAM bank (if
//! any) shows at `$A000-$BFFF`.

use tracing::debug;

use crate::{cartridge::header::CartridgeKind, memory::map::control};

/// Address bit that splits the MBC2 control range into RAM enable / ROM bank.
const MBC2_ROM_SELECT_BIT: u16 = 0x0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct BankController {
    kind: CartridgeKind,
    ram_enabled: bool,
    /// Last value written to the ROM bank register, already masked.
    rom_bank: u8,
    /// MBC1 two-bit secondary register.
    upper: u8,
    /// MBC1 banking mode. `false` routes `upper` to the ROM bank.
    ram_banking_mode: bool,
}

impl BankController {
    pub(crate) fn new(kind: CartridgeKind) -> Self {
        Self {
            kind,
            ram_enabled: false,
            rom_bank: 1,
            upper: 0,
            ram_banking_mode: false,
        }
    }

    pub(crate) fn kind(&self) -> CartridgeKind {
        self.kind
    }

    /// RAM on ROM-only boards has no enable latch.
    pub(crate) fn ram_enabled(&self) -> bool {
        match self.kind {
            CartridgeKind::RomOnly => true,
            CartridgeKind::Mbc1 | CartridgeKind::Mbc2 => self.ram_enabled,
        }
    }

    /// Bank currently mapped at `$4000-$7FFF`, before wrapping by the loaded
    /// bank count.
    pub(crate) fn rom_bank(&self) -> usize {
        let low = usize::from(effective_bank(self.rom_bank, self.kind.rom_bank_mask()));
        match self.kind {
            CartridgeKind::RomOnly => 1,
            CartridgeKind::Mbc1 if !self.ram_banking_mode => low | (usize::from(self.upper) << 5),
            CartridgeKind::Mbc1 | CartridgeKind::Mbc2 => low,
        }
    }

    /// Bank currently mapped at `$A000-$BFFF`.
    pub(crate) fn ram_bank(&self) -> usize {
        match self.kind {
            CartridgeKind::Mbc1 if self.ram_banking_mode => usize::from(self.upper),
            _ => 0,
        }
    }

    /// Handle a write into the control range `$0000-$7FFF`.
    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match self.kind {
            CartridgeKind::RomOnly => {}
            CartridgeKind::Mbc1 => self.write_mbc1(addr, value),
            CartridgeKind::Mbc2 => self.write_mbc2(addr, value),
        }
    }

    fn write_mbc1(&mut self, addr: u16, value: u8) {
        match addr {
            control::RAM_ENABLE_START..=control::RAM_ENABLE_END => {
                self.set_ram_enabled(value);
            }
            control::ROM_BANK_START..=control::ROM_BANK_END => {
                self.rom_bank = effective_bank(value, self.kind.rom_bank_mask());
                debug!(bank = self.rom_bank(), "mbc1 rom bank switch");
            }
            control::RAM_BANK_START..=control::RAM_BANK_END => {
                self.upper = value & 0x03;
                debug!(
                    upper = self.upper,
                    ram_mode = self.ram_banking_mode,
                    "mbc1 secondary bank register"
                );
            }
            control::BANKING_MODE_START..=control::BANKING_MODE_END => {
                self.ram_banking_mode = value & 0x01 != 0;
                debug!(ram_mode = self.ram_banking_mode, "mbc1 banking mode");
            }
            _ => {}
        }
    }

    fn write_mbc2(&mut self, addr: u16, value: u8) {
        if addr > control::ROM_BANK_END {
            return;
        }
        if addr & MBC2_ROM_SELECT_BIT == 0 {
            self.set_ram_enabled(value);
        } else {
            self.rom_bank = effective_bank(value, self.kind.rom_bank_mask());
            debug!(bank = self.rom_bank, "mbc2 rom bank switch");
        }
    }

    fn set_ram_enabled(&mut self, value: u8) {
        let enabled = value & 0x0F == control::RAM_ENABLE_KEY;
        if enabled != self.ram_enabled {
            debug!(enabled, kind = %self.kind, "external ram enable");
        }
        self.ram_enabled = enabled;
    }
}

/// Bank number selected by a register write: masked, with bank 0 remapped to 1.
#[inline]
pub(crate) const fn effective_bank(value: u8, mask: u8) -> u8 {
    let bank = value & mask;
    if bank == 0 { 1 } else { bank }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_selects_bank_one() {
        assert_eq!(effective_bank(0x00, 0x1F), 1);
        assert_eq!(effective_bank(0x20, 0x1F), 1);
        assert_eq!(effective_bank(0x10, 0x0F), 1);
        assert_eq!(effective_bank(0x07, 0x1F), 7);
    }

    #[test]
    fn mbc1_upper_bits_extend_rom_bank_in_mode_zero() {
        let mut mbc = BankController::new(CartridgeKind::Mbc1);
        mbc.write(0x2000, 0x03);
        mbc.write(0x4000, 0x01);
        assert_eq!(mbc.rom_bank(), 0x23);
        assert_eq!(mbc.ram_bank(), 0);

        mbc.write(0x6000, 0x01);
        assert_eq!(mbc.rom_bank(), 0x03);
        assert_eq!(mbc.ram_bank(), 1);
    }

    #[test]
    fn mbc1_ram_enable_needs_the_key() {
        let mut mbc = BankController::new(CartridgeKind::Mbc1);
        assert!(!mbc.ram_enabled());
        mbc.write(0x0000, 0x1A);
        assert!(mbc.ram_enabled());
        mbc.write(0x1FFF, 0x00);
        assert!(!mbc.ram_enabled());
    }

    #[test]
    fn mbc2_splits_control_on_address_bit_eight() {
        let mut mbc = BankController::new(CartridgeKind::Mbc2);
        mbc.write(0x0000, 0x0A);
        assert!(mbc.ram_enabled());
        mbc.write(0x2100, 0x05);
        assert_eq!(mbc.rom_bank(), 5);
        // Bit 8 clear in the upper half still targets RAM enable.
        mbc.write(0x2000, 0x00);
        assert!(!mbc.ram_enabled());
        assert_eq!(mbc.rom_bank(), 5);
        // Writes above $3FFF do nothing on MBC2.
        mbc.write(0x4100, 0x03);
        assert_eq!(mbc.rom_bank(), 5);
    }

    #[test]
    fn rom_only_ignores_control_writes() {
        let mut mbc = BankController::new(CartridgeKind::RomOnly);
        mbc.write(0x2000, 0x05);
        assert_eq!(mbc.rom_bank(), 1);
        assert!(mbc.ram_enabled());
    }
}
