use crate::cpu::{Cpu, flags::Flags, instruction::R16};

impl Cpu {
    // ================================================================
    //  INC - Increment 8-bit
    // ================================================================
    /// 🧩 Flags Affected:
    ///     Z, N (cleared), H (carry from bit 3), C unchanged
    pub(crate) fn inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.f.update_zero(result);
        self.regs.f.remove(Flags::SUBTRACT);
        self.regs.f.set(Flags::HALF_CARRY, value & 0x0F == 0x0F);
        result
    }

    // ================================================================
    //  DEC - Decrement 8-bit
    // ================================================================
    /// 🧩 Flags Affected:
    ///     Z, N (set), H (borrow from bit 4), C unchanged
    pub(crate) fn dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.f.update_zero(result);
        self.regs.f.insert(Flags::SUBTRACT);
        self.regs.f.set(Flags::HALF_CARRY, value & 0x0F == 0x00);
        result
    }

    /// 16-bit increment. No flags.
    pub(crate) fn inc16(&mut self, pair: R16) {
        let value = self.r16(pair).wrapping_add(1);
        self.set_r16(pair, value);
    }

    /// 16-bit decrement. No flags.
    pub(crate) fn dec16(&mut self, pair: R16) {
        let value = self.r16(pair).wrapping_sub(1);
        self.set_r16(pair, value);
    }
}
