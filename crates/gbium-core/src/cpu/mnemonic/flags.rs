use crate::cpu::{Cpu, flags::Flags};

impl Cpu {
    // ================================================================
    //  SCF - Set Carry Flag
    // ================================================================
    /// 🧩 Flags Affected:
    ///     N/H (cleared), C (set), Z unchanged
    pub(crate) fn scf(&mut self) {
        self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
        self.regs.f.insert(Flags::CARRY);
    }

    // ================================================================
    //  CCF - Complement Carry Flag
    // ================================================================
    /// 🧩 Flags Affected:
    ///     N/H (cleared), C (toggled), Z unchanged
    pub(crate) fn ccf(&mut self) {
        self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
        self.regs.f.toggle(Flags::CARRY);
    }
}
