use crate::cpu::{Cpu, flags::Flags, instruction::Alu};

impl Cpu {
    /// Route an 8-bit ALU operation against the accumulator.
    pub(crate) fn alu(&mut self, op: Alu, value: u8) {
        match op {
            Alu::Add => self.add8(value),
            Alu::Adc => self.adc8(value),
            Alu::Sub => self.sub8(value),
            Alu::Sbc => self.sbc8(value),
            Alu::And => self.and8(value),
            Alu::Xor => self.xor8(value),
            Alu::Or => self.or8(value),
            Alu::Cp => self.cp8(value),
        }
    }

    // ================================================================
    //  ADD - Add to Accumulator
    // ================================================================
    /// 🕹️ Purpose:
    ///     Adds a value to the accumulator.
    ///
    /// ⚙️ Operation:
    ///     A ← A + M
    ///
    /// 🧩 Flags Affected:
    ///     Z, N (cleared), H (carry from bit 3), C (carry from bit 7)
    pub(crate) fn add8(&mut self, value: u8) {
        self.regs.a = self.add_with_carry(value, 0);
    }

    // ================================================================
    //  ADC - Add with Carry
    // ================================================================
    /// 🕹️ Purpose:
    ///     Adds a value plus the carry flag to the accumulator.
    ///
    /// ⚙️ Operation:
    ///     A ← A + M + C
    ///
    /// 🧩 Flags Affected:
    ///     Z, N (cleared), H, C
    pub(crate) fn adc8(&mut self, value: u8) {
        let carry = self.regs.f.carry_bit();
        self.regs.a = self.add_with_carry(value, carry);
    }

    // ================================================================
    //  SUB - Subtract from Accumulator
    // ================================================================
    /// ⚙️ Operation:
    ///     A ← A - M
    ///
    /// 🧩 Flags Affected:
    ///     Z, N (set), H (borrow from bit 4), C (borrow)
    pub(crate) fn sub8(&mut self, value: u8) {
        self.regs.a = self.sub_with_borrow(value, 0);
    }

    // ================================================================
    //  SBC - Subtract with Carry
    // ================================================================
    /// ⚙️ Operation:
    ///     A ← A - M - C
    ///
    /// 🧩 Flags Affected:
    ///     Z, N (set), H, C
    pub(crate) fn sbc8(&mut self, value: u8) {
        let carry = self.regs.f.carry_bit();
        self.regs.a = self.sub_with_borrow(value, carry);
    }

    // ================================================================
    //  CP - Compare
    // ================================================================
    /// 🕹️ Purpose:
    ///     Subtracts without storing the result; only the flags change.
    ///
    /// 🧩 Flags Affected:
    ///     Z, N (set), H, C
    pub(crate) fn cp8(&mut self, value: u8) {
        self.sub_with_borrow(value, 0);
    }

    fn add_with_carry(&mut self, value: u8, carry: u8) -> u8 {
        let a = self.regs.a;
        let result = a.wrapping_add(value).wrapping_add(carry);
        let half = (a & 0x0F) + (value & 0x0F) + carry > 0x0F;
        let full = u16::from(a) + u16::from(value) + u16::from(carry) > 0xFF;
        self.regs.f = Flags::from_znhc(result == 0, false, half, full);
        result
    }

    fn sub_with_borrow(&mut self, value: u8, carry: u8) -> u8 {
        let a = self.regs.a;
        let result = a.wrapping_sub(value).wrapping_sub(carry);
        let half = (a & 0x0F) < (value & 0x0F) + carry;
        let full = u16::from(a) < u16::from(value) + u16::from(carry);
        self.regs.f = Flags::from_znhc(result == 0, true, half, full);
        result
    }

    // ================================================================
    //  ADD HL,rr - 16-bit Add
    // ================================================================
    /// Performed as two chained 8-bit adds (low byte first), so H reports the
    /// carry out of bit 11 and C the carry out of bit 15.
    ///
    /// 🧩 Flags Affected:
    ///     Z (unchanged), N (cleared), H, C
    pub(crate) fn add_hl(&mut self, value: u16) {
        let [h, l] = self.regs.hl().to_be_bytes();
        let [hi, lo] = value.to_be_bytes();

        let (low, low_carry) = l.overflowing_add(lo);
        let carry_in = u8::from(low_carry);
        let high = h.wrapping_add(hi).wrapping_add(carry_in);

        self.regs.f.remove(Flags::SUBTRACT);
        self.regs
            .f
            .set(Flags::HALF_CARRY, (h & 0x0F) + (hi & 0x0F) + carry_in > 0x0F);
        self.regs.f.set(
            Flags::CARRY,
            u16::from(h) + u16::from(hi) + u16::from(carry_in) > 0xFF,
        );
        self.regs.set_hl(u16::from_be_bytes([high, low]));
    }

    /// `ADD SP,e8`
    pub(crate) fn add_sp_e8(&mut self, offset: u8) {
        self.regs.sp = self.sp_plus_offset(offset);
    }

    /// `LD HL,SP+e8`
    pub(crate) fn ld_hl_sp_e8(&mut self, offset: u8) {
        let value = self.sp_plus_offset(offset);
        self.regs.set_hl(value);
    }

    /// Signed offset added to SP. H and C come from the unsigned add of the
    /// low byte; Z and N are cleared.
    fn sp_plus_offset(&mut self, offset: u8) -> u16 {
        let sp = self.regs.sp;
        let low = sp & 0x00FF;
        let offset16 = u16::from(offset);
        let half = (low & 0x0F) + (offset16 & 0x0F) > 0x0F;
        let full = low + offset16 > 0xFF;
        self.regs.f = Flags::from_znhc(false, false, half, full);
        sp.wrapping_add_signed(i16::from(offset as i8))
    }

    // ================================================================
    //  DAA - Decimal Adjust Accumulator
    // ================================================================
    /// 🕹️ Purpose:
    ///     Corrects A after a BCD addition or subtraction, using N to tell
    ///     which one happened.
    ///
    /// 🧩 Flags Affected:
    ///     Z, N (unchanged), H (cleared), C (set if a correction of 0x60 applied)
    pub(crate) fn daa(&mut self) {
        let flags = self.regs.f;
        let mut a = self.regs.a;
        let mut carry = flags.contains(Flags::CARRY);

        if flags.contains(Flags::SUBTRACT) {
            if carry {
                a = a.wrapping_sub(0x60);
            }
            if flags.contains(Flags::HALF_CARRY) {
                a = a.wrapping_sub(0x06);
            }
        } else {
            if carry || a > 0x99 {
                a = a.wrapping_add(0x60);
                carry = true;
            }
            if flags.contains(Flags::HALF_CARRY) || a & 0x0F > 0x09 {
                a = a.wrapping_add(0x06);
            }
        }

        self.regs.a = a;
        self.regs.f.update_zero(a);
        self.regs.f.remove(Flags::HALF_CARRY);
        self.regs.f.set(Flags::CARRY, carry);
    }
}
