use bitflags::bitflags;

bitflags! {
    /// Flag register (F) of the LR35902.
    ///
    /// Bit layout:
    /// 7 6 5 4 3 2 1 0
    /// Z N H C 0 0 0 0
    ///
    /// The low nibble does not exist in hardware and always reads as zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Flags: u8 {
        /// Zero flag (Z)
        /// Set when the result of an operation is zero.
        const ZERO       = 0b1000_0000;

        /// Subtract flag (N)
        /// Set when the last arithmetic operation was a subtraction. Only DAA reads it.
        const SUBTRACT   = 0b0100_0000;

        /// Half-carry flag (H)
        /// Carry out of bit 3 (bit 11 for 16-bit adds), or borrow into bit 4.
        const HALF_CARRY = 0b0010_0000;

        /// Carry flag (C)
        /// Carry out of bit 7 (bit 15), borrow, or the bit shifted out by a rotate.
        const CARRY      = 0b0001_0000;
    }
}

impl Flags {
    /// Build a full flag set in one go, the way most ALU ops report results.
    #[inline]
    pub const fn from_znhc(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Self {
        let mut bits = 0;
        if zero {
            bits |= Flags::ZERO.bits();
        }
        if subtract {
            bits |= Flags::SUBTRACT.bits();
        }
        if half_carry {
            bits |= Flags::HALF_CARRY.bits();
        }
        if carry {
            bits |= Flags::CARRY.bits();
        }
        Flags::from_bits_retain(bits)
    }

    /// Set or clear the Zero flag based on a value.
    #[inline]
    pub fn update_zero(&mut self, value: u8) {
        self.set(Flags::ZERO, value == 0);
    }

    /// Load flags from a byte value. The low nibble is dropped.
    #[inline]
    pub const fn from_byte(byte: u8) -> Self {
        Flags::from_bits_truncate(byte)
    }

    #[inline]
    pub(crate) fn carry_bit(&self) -> u8 {
        u8::from(self.contains(Flags::CARRY))
    }
}

impl std::fmt::Display for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = |flag: Flags, c: char| if self.contains(flag) { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            mark(Flags::ZERO, 'Z'),
            mark(Flags::SUBTRACT, 'N'),
            mark(Flags::HALF_CARRY, 'H'),
            mark(Flags::CARRY, 'C')
        )
    }
}
