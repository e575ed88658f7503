use crate::{
    cpu::{
        Cpu,
        flags::Flags,
        instruction::{R8, Shift},
    },
    memory::MemoryView,
};

/// Which encoding issued a rotate.
///
/// The single-byte accumulator rotates (RLCA, RRCA, RLA, RRA) always clear Z,
/// while the CB-prefixed forms set it from the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShiftStyle {
    Prefixed,
    Legacy,
}

impl Cpu {
    /// Rotate or shift `target` in place. C receives the bit shifted out
    /// (cleared for SWAP); N and H are cleared.
    pub(crate) fn shift(
        &mut self,
        mem: &mut MemoryView<'_>,
        op: Shift,
        target: R8,
        style: ShiftStyle,
    ) {
        let value = self.read_r8(mem, target);
        let carry_in = self.regs.f.carry_bit();

        let (result, carry) = match op {
            Shift::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            Shift::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            Shift::Rl => ((value << 1) | carry_in, value & 0x80 != 0),
            Shift::Rr => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            Shift::Sla => (value << 1, value & 0x80 != 0),
            Shift::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            Shift::Swap => (value.rotate_left(4), false),
            Shift::Srl => (value >> 1, value & 0x01 != 0),
        };

        let zero = style == ShiftStyle::Prefixed && result == 0;
        self.regs.f = Flags::from_znhc(zero, false, false, carry);
        self.write_r8(mem, target, result);
    }
}

#[cfg(test)]
mod tests {
    use super::ShiftStyle;
    use crate::{
        cpu::{
            Cpu,
            flags::Flags,
            instruction::{R8, Shift},
        },
        memory::{Memory, Permission},
    };

    fn run(op: Shift, value: u8, carry: bool, style: ShiftStyle) -> (u8, Flags) {
        let mut memory = Memory::default();
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.b = value;
        cpu.regs.f = if carry { Flags::CARRY } else { Flags::empty() };
        cpu.shift(&mut view, op, R8::B, style);
        (cpu.regs.b, cpu.regs.f)
    }

    #[test]
    fn rotates_through_and_around_carry() {
        assert_eq!(
            run(Shift::Rlc, 0x85, false, ShiftStyle::Prefixed),
            (0x0B, Flags::CARRY)
        );
        assert_eq!(
            run(Shift::Rl, 0x80, false, ShiftStyle::Prefixed),
            (0x00, Flags::ZERO | Flags::CARRY)
        );
        assert_eq!(
            run(Shift::Rr, 0x01, true, ShiftStyle::Prefixed),
            (0x80, Flags::CARRY)
        );
        assert_eq!(
            run(Shift::Rrc, 0x01, false, ShiftStyle::Prefixed),
            (0x80, Flags::CARRY)
        );
    }

    #[test]
    fn shifts_keep_or_drop_the_sign() {
        assert_eq!(
            run(Shift::Sra, 0x81, false, ShiftStyle::Prefixed),
            (0xC0, Flags::CARRY)
        );
        assert_eq!(
            run(Shift::Srl, 0x81, false, ShiftStyle::Prefixed),
            (0x40, Flags::CARRY)
        );
        assert_eq!(
            run(Shift::Sla, 0x40, true, ShiftStyle::Prefixed),
            (0x80, Flags::empty())
        );
        assert_eq!(
            run(Shift::Swap, 0xF1, true, ShiftStyle::Prefixed),
            (0x1F, Flags::empty())
        );
    }

    #[test]
    fn legacy_rotates_never_set_zero() {
        assert_eq!(
            run(Shift::Rl, 0x80, false, ShiftStyle::Legacy),
            (0x00, Flags::CARRY)
        );
        assert_eq!(
            run(Shift::Rl, 0x80, false, ShiftStyle::Prefixed).1,
            Flags::ZERO | Flags::CARRY
        );
    }

    #[test]
    fn operates_on_hl_indirect() {
        let mut memory = Memory::default();
        memory.dump(0xC000, &[0x0F]);
        let mut view = memory.view(Permission::Cpu);
        let mut cpu = Cpu::new();
        cpu.regs.set_hl(0xC000);
        cpu.shift(&mut view, Shift::Swap, R8::HlInd, ShiftStyle::Prefixed);
        assert_eq!(view.read(0xC000), 0xF0);
    }
}
