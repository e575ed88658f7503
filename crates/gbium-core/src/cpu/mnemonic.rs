use crate::{
    cpu::{
        Cpu,
        instruction::{Alu, Cond, Ptr, R8, R16, Shift, Stk},
        mnemonic::shift::ShiftStyle,
    },
    error::Error,
    memory::MemoryView,
};

pub mod arith;
pub mod bit;
pub mod bra;
pub mod ctrl;
pub mod flags;
pub mod inc;
pub mod load;
pub mod logic;
pub mod shift;
pub mod stack;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Mnemonic {
    //Control
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    //Flags / accumulator
    Daa,
    Cpl,
    Scf,
    Ccf,
    //Load/Store
    Ld(R8, R8),
    LdImm(R8),
    LdImm16(R16),
    StoreA(Ptr),
    LoadA(Ptr),
    LdA16Sp,
    LdhA8A,
    LdhAA8,
    LdhCA,
    LdhAC,
    LdA16A,
    LdAA16,
    LdSpHl,
    LdHlSpE8,
    //Arithmetic / logic
    Alu(Alu, R8),
    AluImm(Alu),
    Inc(R8),
    Dec(R8),
    Inc16(R16),
    Dec16(R16),
    AddHl(R16),
    AddSpE8,
    //Accumulator rotates
    Rlca,
    Rrca,
    Rla,
    Rra,
    //Branch
    Jp,
    JpCond(Cond),
    JpHl,
    Jr,
    JrCond(Cond),
    Call,
    CallCond(Cond),
    Ret,
    RetCond(Cond),
    Reti,
    Rst(u8),
    //Stack
    Push(Stk),
    Pop(Stk),
    //CB prefix
    Prefix,
    Shift(Shift, R8),
    Bit(u8, R8),
    Res(u8, R8),
    Set(u8, R8),
    //No defined behaviour
    Illegal,
}

impl Mnemonic {
    pub(crate) const fn is_illegal(&self) -> bool {
        matches!(self, Mnemonic::Illegal)
    }
}

impl Cpu {
    /// Apply the effect of the current instruction using the collected
    /// operand bytes. Returns whether a conditional branch was taken.
    pub(crate) fn execute(&mut self, mem: &mut MemoryView<'_>) -> Result<bool, Error> {
        let imm8 = self.operand[0];
        let imm16 = self.imm16();
        let mut taken = false;

        match self.instr.mnemonic {
            Mnemonic::Nop | Mnemonic::Prefix => {}
            Mnemonic::Stop => self.stop(),
            Mnemonic::Halt => self.halt(),
            Mnemonic::Di => self.di(),
            Mnemonic::Ei => self.ei(),

            Mnemonic::Daa => self.daa(),
            Mnemonic::Cpl => self.cpl(),
            Mnemonic::Scf => self.scf(),
            Mnemonic::Ccf => self.ccf(),

            Mnemonic::Ld(dst, src) => self.ld(mem, dst, src),
            Mnemonic::LdImm(dst) => self.write_r8(mem, dst, imm8),
            Mnemonic::LdImm16(pair) => self.set_r16(pair, imm16),
            Mnemonic::StoreA(ptr) => self.store_a(mem, ptr),
            Mnemonic::LoadA(ptr) => self.load_a(mem, ptr),
            Mnemonic::LdA16Sp => self.ld_a16_sp(mem, imm16),
            Mnemonic::LdhA8A => self.write(mem, high_page(imm8), self.regs.a),
            Mnemonic::LdhAA8 => self.regs.a = mem.read(high_page(imm8)),
            Mnemonic::LdhCA => self.write(mem, high_page(self.regs.c), self.regs.a),
            Mnemonic::LdhAC => self.regs.a = mem.read(high_page(self.regs.c)),
            Mnemonic::LdA16A => self.write(mem, imm16, self.regs.a),
            Mnemonic::LdAA16 => self.regs.a = mem.read(imm16),
            Mnemonic::LdSpHl => self.regs.sp = self.regs.hl(),
            Mnemonic::LdHlSpE8 => self.ld_hl_sp_e8(imm8),

            Mnemonic::Alu(op, src) => {
                let value = self.read_r8(mem, src);
                self.alu(op, value);
            }
            Mnemonic::AluImm(op) => self.alu(op, imm8),
            Mnemonic::Inc(target) => {
                let value = self.read_r8(mem, target);
                let result = self.inc8(value);
                self.write_r8(mem, target, result);
            }
            Mnemonic::Dec(target) => {
                let value = self.read_r8(mem, target);
                let result = self.dec8(value);
                self.write_r8(mem, target, result);
            }
            Mnemonic::Inc16(pair) => self.inc16(pair),
            Mnemonic::Dec16(pair) => self.dec16(pair),
            Mnemonic::AddHl(pair) => self.add_hl(self.r16(pair)),
            Mnemonic::AddSpE8 => self.add_sp_e8(imm8),

            Mnemonic::Rlca => self.shift(mem, Shift::Rlc, R8::A, ShiftStyle::Legacy),
            Mnemonic::Rrca => self.shift(mem, Shift::Rrc, R8::A, ShiftStyle::Legacy),
            Mnemonic::Rla => self.shift(mem, Shift::Rl, R8::A, ShiftStyle::Legacy),
            Mnemonic::Rra => self.shift(mem, Shift::Rr, R8::A, ShiftStyle::Legacy),

            Mnemonic::Jp => self.jp(imm16),
            Mnemonic::JpCond(cond) => taken = self.jp_cond(cond, imm16),
            Mnemonic::JpHl => self.jp(self.regs.hl()),
            Mnemonic::Jr => self.jr(imm8),
            Mnemonic::JrCond(cond) => taken = self.jr_cond(cond, imm8),
            Mnemonic::Call => self.call(mem, imm16),
            Mnemonic::CallCond(cond) => taken = self.call_cond(mem, cond, imm16),
            Mnemonic::Ret => self.ret(mem),
            Mnemonic::RetCond(cond) => taken = self.ret_cond(mem, cond),
            Mnemonic::Reti => self.reti(mem),
            Mnemonic::Rst(vector) => self.rst(mem, vector),

            Mnemonic::Push(pair) => self.push(mem, pair),
            Mnemonic::Pop(pair) => self.pop(mem, pair)?,

            Mnemonic::Shift(op, target) => self.shift(mem, op, target, ShiftStyle::Prefixed),
            Mnemonic::Bit(bit, target) => self.bit(mem, bit, target),
            Mnemonic::Res(bit, target) => self.res(mem, bit, target),
            Mnemonic::Set(bit, target) => self.set(mem, bit, target),

            Mnemonic::Illegal => {
                return Err(Error::IllegalOpcode {
                    opcode: self.opcode,
                    pc: self.opcode_pc,
                });
            }
        }

        Ok(taken)
    }
}

#[inline]
const fn high_page(offset: u8) -> u16 {
    0xFF00 | offset as u16
}
