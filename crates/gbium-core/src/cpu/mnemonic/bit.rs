use crate::{
    cpu::{Cpu, flags::Flags, instruction::R8},
    memory::MemoryView,
};

impl Cpu {
    // ================================================================
    //  BIT - Test Bit
    // ================================================================
    /// 🧩 Flags Affected:
    ///     Z (set if the bit is clear), N (cleared), H (set), C unchanged
    pub(crate) fn bit(&mut self, mem: &mut MemoryView<'_>, bit: u8, target: R8) {
        let value = self.read_r8(mem, target);
        self.regs.f.set(Flags::ZERO, value & (1 << bit) == 0);
        self.regs.f.remove(Flags::SUBTRACT);
        self.regs.f.insert(Flags::HALF_CARRY);
    }

    /// Clear one bit. No flags.
    pub(crate) fn res(&mut self, mem: &mut MemoryView<'_>, bit: u8, target: R8) {
        let value = self.read_r8(mem, target) & !(1 << bit);
        self.write_r8(mem, target, value);
    }

    /// Set one bit. No flags.
    pub(crate) fn set(&mut self, mem: &mut MemoryView<'_>, bit: u8, target: R8) {
        let value = self.read_r8(mem, target) | (1 << bit);
        self.write_r8(mem, target, value);
    }
}
