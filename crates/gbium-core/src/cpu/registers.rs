use std::fmt;

use crate::{cpu::flags::Flags, memory::map};

/// Names of the eight 8-bit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// The LR35902 register file.
///
/// Pairs are formed high byte first: `BC` is `B << 8 | C`, `AF` is `A << 8 | F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self::power_on()
    }
}

impl Registers {
    /// Values left behind by the boot ROM when it hands control to the cartridge.
    pub const fn power_on() -> Self {
        Self {
            a: 0x01,
            f: Flags::ZERO,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: map::ENTRY_POINT,
        }
    }

    /// Everything zero except the stack pointer, which starts at the top of HRAM.
    pub const fn cleared() -> Self {
        Self {
            a: 0,
            f: Flags::empty(),
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: 0xFFFE,
            pc: 0,
        }
    }

    pub fn reg(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::F => self.f.bits(),
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    /// Writes to `F` drop the low nibble.
    pub fn set_reg(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.a = value,
            Reg8::F => self.f = Flags::from_byte(value),
            Reg8::B => self.b = value,
            Reg8::C => self.c = value,
            Reg8::D => self.d = value,
            Reg8::E => self.e = value,
            Reg8::H => self.h = value,
            Reg8::L => self.l = value,
        }
    }

    pub fn reg_pair(&self, msr: Reg8, lsr: Reg8) -> u16 {
        u16::from_be_bytes([self.reg(msr), self.reg(lsr)])
    }

    pub fn set_reg_pair(&mut self, msr: Reg8, lsr: Reg8, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.set_reg(msr, hi);
        self.set_reg(lsr, lo);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        self.reg_pair(Reg8::A, Reg8::F)
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.reg_pair(Reg8::B, Reg8::C)
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.reg_pair(Reg8::D, Reg8::E)
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.reg_pair(Reg8::H, Reg8::L)
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.set_reg_pair(Reg8::A, Reg8::F, value);
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.set_reg_pair(Reg8::B, Reg8::C, value);
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.set_reg_pair(Reg8::D, Reg8::E, value);
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.set_reg_pair(Reg8::H, Reg8::L, value);
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[a:0x{:02X}, f:{}, b:0x{:02X}, c:0x{:02X}, d:0x{:02X}, e:0x{:02X}, h:0x{:02X}, l:0x{:02X}, sp:0x{:04X}, pc:0x{:04X}]",
            self.a, self.f, self.b, self.c, self.d, self.e, self.h, self.l, self.sp, self.pc
        )
    }
}
