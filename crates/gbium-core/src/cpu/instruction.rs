use crate::cpu::{mnemonic::Mnemonic, timing::Timing};

/// Immediate bytes that follow the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Operand {
    None,
    Imm8,
    Imm16,
}

impl Operand {
    pub(crate) const fn len(&self) -> u8 {
        match self {
            Operand::None => 0,
            Operand::Imm8 => 1,
            Operand::Imm16 => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Instruction {
    pub(crate) mnemonic: Mnemonic,
    pub(crate) operand: Operand,
    pub(crate) timing: Timing,
}

impl Instruction {
    pub(crate) const fn new(mnemonic: Mnemonic, operand: Operand, timing: Timing) -> Self {
        Self {
            mnemonic,
            operand,
            timing,
        }
    }

    /// Encoded length in bytes, opcode included.
    pub(crate) const fn len(&self) -> u8 {
        1 + self.operand.len()
    }
}

/// 8-bit operand slot in encoding order (`opcode & 7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum R8 {
    B,
    C,
    D,
    E,
    H,
    L,
    /// The byte at the address held in HL.
    HlInd,
    A,
}

impl R8 {
    pub(crate) const fn from_index(index: u8) -> Self {
        match index & 7 {
            0 => R8::B,
            1 => R8::C,
            2 => R8::D,
            3 => R8::E,
            4 => R8::H,
            5 => R8::L,
            6 => R8::HlInd,
            _ => R8::A,
        }
    }
}

/// 16-bit register pair for loads and 16-bit arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum R16 {
    BC,
    DE,
    HL,
    SP,
}

/// Register pair as seen by PUSH/POP, where AF replaces SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Stk {
    BC,
    DE,
    HL,
    AF,
}

/// Indirect accumulator load/store addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Ptr {
    BC,
    DE,
    /// `(HL+)`: HL is incremented after the access.
    HlInc,
    /// `(HL-)`: HL is decremented after the access.
    HlDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Cond {
    NZ,
    Z,
    NC,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Alu {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Shift {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl Shift {
    pub(crate) const fn from_index(index: u8) -> Self {
        match index & 7 {
            0 => Shift::Rlc,
            1 => Shift::Rrc,
            2 => Shift::Rl,
            3 => Shift::Rr,
            4 => Shift::Sla,
            5 => Shift::Sra,
            6 => Shift::Swap,
            _ => Shift::Srl,
        }
    }
}
