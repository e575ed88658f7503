use tracing::trace;

use crate::{
    cpu::{
        Cpu,
        flags::Flags,
        instruction::Cond,
        interrupt::Interrupt,
    },
    memory::MemoryView,
};

impl Cpu {
    pub(crate) fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::NZ => !self.regs.f.contains(Flags::ZERO),
            Cond::Z => self.regs.f.contains(Flags::ZERO),
            Cond::NC => !self.regs.f.contains(Flags::CARRY),
            Cond::C => self.regs.f.contains(Flags::CARRY),
        }
    }

    // ================================================================
    //  JP - Absolute Jump
    // ================================================================
    pub(crate) fn jp(&mut self, target: u16) {
        self.regs.pc = target;
    }

    pub(crate) fn jp_cond(&mut self, cond: Cond, target: u16) -> bool {
        let taken = self.condition(cond);
        if taken {
            self.jp(target);
        }
        taken
    }

    // ================================================================
    //  JR - Relative Jump
    // ================================================================
    /// The signed offset is relative to the address after the operand byte.
    pub(crate) fn jr(&mut self, offset: u8) {
        self.regs.pc = self.regs.pc.wrapping_add_signed(i16::from(offset as i8));
    }

    pub(crate) fn jr_cond(&mut self, cond: Cond, offset: u8) -> bool {
        let taken = self.condition(cond);
        if taken {
            self.jr(offset);
        }
        taken
    }

    // ================================================================
    //  CALL - Call Subroutine
    // ================================================================
    /// PC already points past the operand bytes here, so the pushed address
    /// is where `RET` resumes.
    pub(crate) fn call(&mut self, mem: &mut MemoryView<'_>, target: u16) {
        self.push_word(mem, self.regs.pc);
        self.regs.pc = target;
    }

    pub(crate) fn call_cond(&mut self, mem: &mut MemoryView<'_>, cond: Cond, target: u16) -> bool {
        let taken = self.condition(cond);
        if taken {
            self.call(mem, target);
        }
        taken
    }

    /// Internal call made by interrupt dispatch: acknowledge the request, mask
    /// further interrupts and push the address of the instruction that has
    /// not run yet.
    pub(crate) fn service_interrupt(&mut self, mem: &mut MemoryView<'_>, interrupt: Interrupt) {
        let flags = mem.memory().interrupt_flags() - interrupt;
        mem.memory_mut().set_interrupt_flags(flags);
        self.ime = false;
        self.ime_delay = 0;
        trace!(?interrupt, pc = self.regs.pc, "servicing interrupt");
        self.call(mem, interrupt.vector());
    }

    // ================================================================
    //  RET / RETI - Return
    // ================================================================
    pub(crate) fn ret(&mut self, mem: &mut MemoryView<'_>) {
        self.regs.pc = self.pop_word(mem);
    }

    pub(crate) fn ret_cond(&mut self, mem: &mut MemoryView<'_>, cond: Cond) -> bool {
        let taken = self.condition(cond);
        if taken {
            self.ret(mem);
        }
        taken
    }

    /// Return and re-enable interrupts with no delay.
    pub(crate) fn reti(&mut self, mem: &mut MemoryView<'_>) {
        self.ret(mem);
        self.ime = true;
        self.ime_delay = 0;
    }

    // ================================================================
    //  RST - Restart
    // ================================================================
    pub(crate) fn rst(&mut self, mem: &mut MemoryView<'_>, vector: u8) {
        self.call(mem, u16::from(vector));
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        cpu::{Cpu, flags::Flags, instruction::Cond, interrupt::Interrupt},
        memory::{Memory, Permission, map::io},
    };

    #[test]
    fn jr_wraps_in_both_directions() {
        let mut cpu = Cpu::new();
        cpu.regs.pc = 0x0102;
        cpu.jr(0xFE);
        assert_eq!(cpu.regs.pc, 0x0100);
        cpu.jr(0x10);
        assert_eq!(cpu.regs.pc, 0x0110);
    }

    #[test]
    fn conditional_forms_report_whether_they_branched() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.f = Flags::CARRY;
        cpu.regs.pc = 0x0200;

        assert!(!cpu.jp_cond(Cond::NC, 0x1234));
        assert_eq!(cpu.regs.pc, 0x0200);
        assert!(cpu.jp_cond(Cond::C, 0x1234));
        assert_eq!(cpu.regs.pc, 0x1234);

        let sp = cpu.regs.sp;
        assert!(!cpu.call_cond(&mut view, Cond::Z, 0x4000));
        assert_eq!(cpu.regs.sp, sp);
        assert!(cpu.call_cond(&mut view, Cond::NZ, 0x4000));
        assert_eq!(cpu.regs.sp, sp - 2);
        assert_eq!(cpu.regs.pc, 0x4000);

        assert!(!cpu.ret_cond(&mut view, Cond::Z));
        assert!(cpu.ret_cond(&mut view, Cond::C));
        assert_eq!(cpu.regs.pc, 0x1234);
        assert_eq!(cpu.regs.sp, sp);
    }

    #[test]
    fn rst_pushes_return_address() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.pc = 0x0151;
        cpu.rst(&mut view, 0x38);
        assert_eq!(cpu.regs.pc, 0x0038);
        cpu.ret(&mut view);
        assert_eq!(cpu.regs.pc, 0x0151);
    }

    #[test]
    fn servicing_acknowledges_only_the_dispatched_source() {
        let mut memory = Memory::default();
        memory.dump(io::IF, &[0x05]);
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.ime = true;
        cpu.regs.pc = 0x0160;

        cpu.service_interrupt(&mut view, Interrupt::VBLANK);
        assert!(!cpu.ime);
        assert_eq!(cpu.regs.pc, 0x0040);
        assert_eq!(view.read(io::IF) & 0x1F, Interrupt::TIMER.bits());

        cpu.reti(&mut view);
        assert!(cpu.ime);
        assert_eq!(cpu.regs.pc, 0x0160);
    }
}
