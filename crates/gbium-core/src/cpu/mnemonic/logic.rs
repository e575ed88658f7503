use crate::cpu::{Cpu, flags::Flags};

impl Cpu {
    // ================================================================
    //  AND - Logical AND
    // ================================================================
    /// ⚙️ Operation:
    ///     A ← A & M
    ///
    /// 🧩 Flags Affected:
    ///     Z, N (cleared), H (set), C (cleared)
    pub(crate) fn and8(&mut self, value: u8) {
        self.regs.a &= value;
        self.regs.f = Flags::from_znhc(self.regs.a == 0, false, true, false);
    }

    // ================================================================
    //  XOR - Exclusive OR
    // ================================================================
    /// ⚙️ Operation:
    ///     A ← A ^ M
    ///
    /// 🧩 Flags Affected:
    ///     Z, N/H/C (cleared)
    pub(crate) fn xor8(&mut self, value: u8) {
        self.regs.a ^= value;
        self.regs.f = Flags::from_znhc(self.regs.a == 0, false, false, false);
    }

    // ================================================================
    //  OR - Logical Inclusive OR
    // ================================================================
    /// ⚙️ Operation:
    ///     A ← A | M
    ///
    /// 🧩 Flags Affected:
    ///     Z, N/H/C (cleared)
    pub(crate) fn or8(&mut self, value: u8) {
        self.regs.a |= value;
        self.regs.f = Flags::from_znhc(self.regs.a == 0, false, false, false);
    }

    // ================================================================
    //  CPL - Complement Accumulator
    // ================================================================
    /// ⚙️ Operation:
    ///     A ← !A
    ///
    /// 🧩 Flags Affected:
    ///     N (set), H (set), Z/C unchanged
    pub(crate) fn cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.regs.f.insert(Flags::SUBTRACT | Flags::HALF_CARRY);
    }
}
