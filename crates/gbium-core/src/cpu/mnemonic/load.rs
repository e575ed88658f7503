use crate::{
    cpu::{
        Cpu,
        instruction::{Ptr, R8},
    },
    memory::MemoryView,
};

impl Cpu {
    /// `LD r,r'` including the `(HL)` forms.
    pub(crate) fn ld(&mut self, mem: &mut MemoryView<'_>, dst: R8, src: R8) {
        let value = self.read_r8(mem, src);
        self.write_r8(mem, dst, value);
    }

    /// `LD (rr),A` / `LD (HL±),A`
    pub(crate) fn store_a(&mut self, mem: &mut MemoryView<'_>, ptr: Ptr) {
        let addr = self.ptr_addr(ptr);
        self.write(mem, addr, self.regs.a);
    }

    /// `LD A,(rr)` / `LD A,(HL±)`
    pub(crate) fn load_a(&mut self, mem: &mut MemoryView<'_>, ptr: Ptr) {
        let addr = self.ptr_addr(ptr);
        self.regs.a = mem.read(addr);
    }

    /// `LD (a16),SP`: low byte first.
    pub(crate) fn ld_a16_sp(&mut self, mem: &mut MemoryView<'_>, addr: u16) {
        let [hi, lo] = self.regs.sp.to_be_bytes();
        self.write(mem, addr, lo);
        self.write(mem, addr.wrapping_add(1), hi);
    }

    /// Resolve an indirect address, applying the HL post-increment/decrement.
    fn ptr_addr(&mut self, ptr: Ptr) -> u16 {
        match ptr {
            Ptr::BC => self.regs.bc(),
            Ptr::DE => self.regs.de(),
            Ptr::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Ptr::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        cpu::{
            Cpu,
            instruction::{Ptr, R8},
        },
        memory::{Memory, Permission},
    };

    #[test]
    fn hl_post_increment_and_decrement() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.a = 0x11;
        cpu.regs.set_hl(0xC000);

        cpu.store_a(&mut view, Ptr::HlInc);
        assert_eq!(cpu.regs.hl(), 0xC001);
        cpu.store_a(&mut view, Ptr::HlDec);
        assert_eq!(cpu.regs.hl(), 0xC000);
        assert_eq!(view.read(0xC000), 0x11);
        assert_eq!(view.read(0xC001), 0x11);

        cpu.regs.a = 0;
        cpu.load_a(&mut view, Ptr::HlInc);
        assert_eq!(cpu.regs.a, 0x11);
    }

    #[test]
    fn ld_moves_between_registers_and_memory() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.set_hl(0xD000);
        cpu.regs.e = 0x5E;
        cpu.ld(&mut view, R8::HlInd, R8::E);
        cpu.ld(&mut view, R8::B, R8::HlInd);
        assert_eq!(cpu.regs.b, 0x5E);
    }

    #[test]
    fn stores_sp_little_endian() {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.sp = 0xBEEF;
        cpu.ld_a16_sp(&mut view, 0xC100);
        assert_eq!(view.read_word(0xC100), 0xBEEF);
    }
}
