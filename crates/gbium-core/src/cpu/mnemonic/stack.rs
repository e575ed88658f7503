use crate::{
    cpu::{Cpu, instruction::Stk},
    error::Error,
    memory::MemoryView,
};

/// SP value of an empty stack after power-on.
pub(crate) const STACK_EMPTY: u16 = 0xFFFE;

impl Cpu {
    /// Predecrement SP and store the high byte, then the low byte.
    pub(crate) fn push_word(&mut self, mem: &mut MemoryView<'_>, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write(mem, self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write(mem, self.regs.sp, lo);
    }

    /// Load the low byte, then the high byte, post-incrementing SP.
    pub(crate) fn pop_word(&mut self, mem: &mut MemoryView<'_>) -> u16 {
        let lo = mem.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = mem.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_be_bytes([hi, lo])
    }

    // ================================================================
    //  PUSH - Push Register Pair
    // ================================================================
    pub(crate) fn push(&mut self, mem: &mut MemoryView<'_>, pair: Stk) {
        let value = self.stk(pair);
        self.push_word(mem, value);
    }

    // ================================================================
    //  POP - Pop Register Pair
    // ================================================================
    /// Popping into AF drops the low nibble of F. Popping while SP still sits
    /// at its empty-stack value is a program error.
    pub(crate) fn pop(&mut self, mem: &mut MemoryView<'_>, pair: Stk) -> Result<(), Error> {
        if self.regs.sp == STACK_EMPTY {
            return Err(Error::StackUnderflow {
                sp: self.regs.sp,
                pc: self.opcode_pc,
            });
        }
        let value = self.pop_word(mem);
        self.set_stk(pair, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use crate::{
        cpu::{Cpu, instruction::Stk},
        error::Error,
        memory::{Memory, Permission},
        tests::TEST_COUNT,
    };

    #[test]
    fn push_then_pop_restores_pair_and_sp() {
        let mut rng = StdRng::seed_from_u64(0x57AC);
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        for _ in 0..TEST_COUNT {
            let value: u16 = rng.random();
            cpu.regs.sp = rng.random_range(0xC002..=0xDFFF);
            let sp = cpu.regs.sp;
            cpu.regs.set_bc(value);
            cpu.push(&mut view, Stk::BC);
            assert_eq!(cpu.regs.sp, sp - 2);
            cpu.regs.set_bc(!value);
            cpu.pop(&mut view, Stk::BC).expect("stack is not empty");
            assert_eq!(cpu.regs.bc(), value);
            assert_eq!(cpu.regs.sp, sp);
        }
    }

    #[test]
    fn push_stores_high_byte_above_low_byte() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.set_de(0xABCD);
        cpu.push(&mut view, Stk::DE);
        assert_eq!(cpu.regs.sp, 0xFFFC);
        assert_eq!(view.read(0xFFFD), 0xAB);
        assert_eq!(view.read(0xFFFC), 0xCD);
    }

    #[test]
    fn pop_af_masks_flag_low_nibble() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.set_bc(0x12FF);
        cpu.push(&mut view, Stk::BC);
        cpu.pop(&mut view, Stk::AF).expect("stack is not empty");
        assert_eq!(cpu.regs.af(), 0x12F0);
    }

    #[test]
    fn pop_on_empty_stack_is_an_error() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        assert!(matches!(
            cpu.pop(&mut view, Stk::HL),
            Err(Error::StackUnderflow { sp: 0xFFFE, .. })
        ));
    }
}
