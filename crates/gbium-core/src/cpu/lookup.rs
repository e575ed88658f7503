use crate::cpu::instruction::{Alu, Cond, Instruction as I, Operand as O, Ptr, R8, R16, Shift, Stk};
use crate::cpu::mnemonic::Mnemonic as M;
use crate::cpu::timing::{b, f};

// Short aliases for operands (to keep the 16x16 table readable)
const NO: O = O::None;
const D8: O = O::Imm8;
const D16: O = O::Imm16;

const B: R8 = R8::B;
const C: R8 = R8::C;
const D: R8 = R8::D;
const E: R8 = R8::E;
const H: R8 = R8::H;
const L: R8 = R8::L;
/// `(HL)`
const M_: R8 = R8::HlInd;
const A: R8 = R8::A;

const BC: R16 = R16::BC;
const DE: R16 = R16::DE;
const HL: R16 = R16::HL;
const SP: R16 = R16::SP;

const PBC: Stk = Stk::BC;
const PDE: Stk = Stk::DE;
const PHL: Stk = Stk::HL;
const PAF: Stk = Stk::AF;

const IBC: Ptr = Ptr::BC;
const IDE: Ptr = Ptr::DE;
const HLI: Ptr = Ptr::HlInc;
const HLD: Ptr = Ptr::HlDec;

const NZ: Cond = Cond::NZ;
const Z: Cond = Cond::Z;
const NC: Cond = Cond::NC;
const CY: Cond = Cond::C;

const ADD: Alu = Alu::Add;
const ADC: Alu = Alu::Adc;
const SUB: Alu = Alu::Sub;
const SBC: Alu = Alu::Sbc;
const AND: Alu = Alu::And;
const XOR: Alu = Alu::Xor;
const OR: Alu = Alu::Or;
const CP: Alu = Alu::Cp;

macro_rules! op {
    ($m:ident $(($($arg:expr),*))?, $cycles:literal) => {
        I::new(M::$m $(($($arg),*))?, NO, f($cycles))
    };
    ($m:ident $(($($arg:expr),*))?, $operand:ident, $cycles:literal) => {
        I::new(M::$m $(($($arg),*))?, $operand, f($cycles))
    };
    ($m:ident $(($($arg:expr),*))?, $operand:ident, $not_taken:literal / $taken:literal) => {
        I::new(M::$m $(($($arg),*))?, $operand, b($not_taken, $taken))
    };
}

/// Unprefixed opcodes. Cycle counts are machine cycles with the opcode fetch
/// included; `n / t` is not-taken / taken.
#[rustfmt::skip]
pub(crate) static LOOKUP_TABLE: [I; 256] = [
    // 0                          1                          2                          3
    // 4                          5                          6                          7

    // 0x00
    op!(Nop, 1),                  op!(LdImm16(BC), D16, 3),  op!(StoreA(IBC), 2),       op!(Inc16(BC), 2),
    op!(Inc(B), 1),               op!(Dec(B), 1),            op!(LdImm(B), D8, 2),      op!(Rlca, 1),
    op!(LdA16Sp, D16, 5),         op!(AddHl(BC), 2),         op!(LoadA(IBC), 2),        op!(Dec16(BC), 2),
    op!(Inc(C), 1),               op!(Dec(C), 1),            op!(LdImm(C), D8, 2),      op!(Rrca, 1),

    // 0x10
    op!(Stop, 1),                 op!(LdImm16(DE), D16, 3),  op!(StoreA(IDE), 2),       op!(Inc16(DE), 2),
    op!(Inc(D), 1),               op!(Dec(D), 1),            op!(LdImm(D), D8, 2),      op!(Rla, 1),
    op!(Jr, D8, 3),               op!(AddHl(DE), 2),         op!(LoadA(IDE), 2),        op!(Dec16(DE), 2),
    op!(Inc(E), 1),               op!(Dec(E), 1),            op!(LdImm(E), D8, 2),      op!(Rra, 1),

    // 0x20
    op!(JrCond(NZ), D8, 2 / 3),   op!(LdImm16(HL), D16, 3),  op!(StoreA(HLI), 2),       op!(Inc16(HL), 2),
    op!(Inc(H), 1),               op!(Dec(H), 1),            op!(LdImm(H), D8, 2),      op!(Daa, 1),
    op!(JrCond(Z), D8, 2 / 3),    op!(AddHl(HL), 2),         op!(LoadA(HLI), 2),        op!(Dec16(HL), 2),
    op!(Inc(L), 1),               op!(Dec(L), 1),            op!(LdImm(L), D8, 2),      op!(Cpl, 1),

    // 0x30
    op!(JrCond(NC), D8, 2 / 3),   op!(LdImm16(SP), D16, 3),  op!(StoreA(HLD), 2),       op!(Inc16(SP), 2),
    op!(Inc(M_), 3),              op!(Dec(M_), 3),           op!(LdImm(M_), D8, 3),     op!(Scf, 1),
    op!(JrCond(CY), D8, 2 / 3),   op!(AddHl(SP), 2),         op!(LoadA(HLD), 2),        op!(Dec16(SP), 2),
    op!(Inc(A), 1),               op!(Dec(A), 1),            op!(LdImm(A), D8, 2),      op!(Ccf, 1),

    // 0x40
    op!(Ld(B, B), 1),             op!(Ld(B, C), 1),          op!(Ld(B, D), 1),          op!(Ld(B, E), 1),
    op!(Ld(B, H), 1),             op!(Ld(B, L), 1),          op!(Ld(B, M_), 2),         op!(Ld(B, A), 1),
    op!(Ld(C, B), 1),             op!(Ld(C, C), 1),          op!(Ld(C, D), 1),          op!(Ld(C, E), 1),
    op!(Ld(C, H), 1),             op!(Ld(C, L), 1),          op!(Ld(C, M_), 2),         op!(Ld(C, A), 1),

    // 0x50
    op!(Ld(D, B), 1),             op!(Ld(D, C), 1),          op!(Ld(D, D), 1),          op!(Ld(D, E), 1),
    op!(Ld(D, H), 1),             op!(Ld(D, L), 1),          op!(Ld(D, M_), 2),         op!(Ld(D, A), 1),
    op!(Ld(E, B), 1),             op!(Ld(E, C), 1),          op!(Ld(E, D), 1),          op!(Ld(E, E), 1),
    op!(Ld(E, H), 1),             op!(Ld(E, L), 1),          op!(Ld(E, M_), 2),         op!(Ld(E, A), 1),

    // 0x60
    op!(Ld(H, B), 1),             op!(Ld(H, C), 1),          op!(Ld(H, D), 1),          op!(Ld(H, E), 1),
    op!(Ld(H, H), 1),             op!(Ld(H, L), 1),          op!(Ld(H, M_), 2),         op!(Ld(H, A), 1),
    op!(Ld(L, B), 1),             op!(Ld(L, C), 1),          op!(Ld(L, D), 1),          op!(Ld(L, E), 1),
    op!(Ld(L, H), 1),             op!(Ld(L, L), 1),          op!(Ld(L, M_), 2),         op!(Ld(L, A), 1),

    // 0x70
    op!(Ld(M_, B), 2),            op!(Ld(M_, C), 2),         op!(Ld(M_, D), 2),         op!(Ld(M_, E), 2),
    op!(Ld(M_, H), 2),            op!(Ld(M_, L), 2),         op!(Halt, 1),              op!(Ld(M_, A), 2),
    op!(Ld(A, B), 1),             op!(Ld(A, C), 1),          op!(Ld(A, D), 1),          op!(Ld(A, E), 1),
    op!(Ld(A, H), 1),             op!(Ld(A, L), 1),          op!(Ld(A, M_), 2),         op!(Ld(A, A), 1),

    // 0x80
    op!(Alu(ADD, B), 1),          op!(Alu(ADD, C), 1),       op!(Alu(ADD, D), 1),       op!(Alu(ADD, E), 1),
    op!(Alu(ADD, H), 1),          op!(Alu(ADD, L), 1),       op!(Alu(ADD, M_), 2),      op!(Alu(ADD, A), 1),
    op!(Alu(ADC, B), 1),          op!(Alu(ADC, C), 1),       op!(Alu(ADC, D), 1),       op!(Alu(ADC, E), 1),
    op!(Alu(ADC, H), 1),          op!(Alu(ADC, L), 1),       op!(Alu(ADC, M_), 2),      op!(Alu(ADC, A), 1),

    // 0x90
    op!(Alu(SUB, B), 1),          op!(Alu(SUB, C), 1),       op!(Alu(SUB, D), 1),       op!(Alu(SUB, E), 1),
    op!(Alu(SUB, H), 1),          op!(Alu(SUB, L), 1),       op!(Alu(SUB, M_), 2),      op!(Alu(SUB, A), 1),
    op!(Alu(SBC, B), 1),          op!(Alu(SBC, C), 1),       op!(Alu(SBC, D), 1),       op!(Alu(SBC, E), 1),
    op!(Alu(SBC, H), 1),          op!(Alu(SBC, L), 1),       op!(Alu(SBC, M_), 2),      op!(Alu(SBC, A), 1),

    // 0xA0
    op!(Alu(AND, B), 1),          op!(Alu(AND, C), 1),       op!(Alu(AND, D), 1),       op!(Alu(AND, E), 1),
    op!(Alu(AND, H), 1),          op!(Alu(AND, L), 1),       op!(Alu(AND, M_), 2),      op!(Alu(AND, A), 1),
    op!(Alu(XOR, B), 1),          op!(Alu(XOR, C), 1),       op!(Alu(XOR, D), 1),       op!(Alu(XOR, E), 1),
    op!(Alu(XOR, H), 1),          op!(Alu(XOR, L), 1),       op!(Alu(XOR, M_), 2),      op!(Alu(XOR, A), 1),

    // 0xB0
    op!(Alu(OR, B), 1),           op!(Alu(OR, C), 1),        op!(Alu(OR, D), 1),        op!(Alu(OR, E), 1),
    op!(Alu(OR, H), 1),           op!(Alu(OR, L), 1),        op!(Alu(OR, M_), 2),       op!(Alu(OR, A), 1),
    op!(Alu(CP, B), 1),           op!(Alu(CP, C), 1),        op!(Alu(CP, D), 1),        op!(Alu(CP, E), 1),
    op!(Alu(CP, H), 1),           op!(Alu(CP, L), 1),        op!(Alu(CP, M_), 2),       op!(Alu(CP, A), 1),

    // 0xC0
    op!(RetCond(NZ), NO, 2 / 5),  op!(Pop(PBC), 3),          op!(JpCond(NZ), D16, 3 / 4), op!(Jp, D16, 4),
    op!(CallCond(NZ), D16, 3 / 6), op!(Push(PBC), 4),        op!(AluImm(ADD), D8, 2),   op!(Rst(0x00), 4),
    op!(RetCond(Z), NO, 2 / 5),   op!(Ret, 4),               op!(JpCond(Z), D16, 3 / 4), op!(Prefix, D8, 2),
    op!(CallCond(Z), D16, 3 / 6), op!(Call, D16, 6),         op!(AluImm(ADC), D8, 2),   op!(Rst(0x08), 4),

    // 0xD0
    op!(RetCond(NC), NO, 2 / 5),  op!(Pop(PDE), 3),          op!(JpCond(NC), D16, 3 / 4), op!(Illegal, 1),
    op!(CallCond(NC), D16, 3 / 6), op!(Push(PDE), 4),        op!(AluImm(SUB), D8, 2),   op!(Rst(0x10), 4),
    op!(RetCond(CY), NO, 2 / 5),  op!(Reti, 4),              op!(JpCond(CY), D16, 3 / 4), op!(Illegal, 1),
    op!(CallCond(CY), D16, 3 / 6), op!(Illegal, 1),          op!(AluImm(SBC), D8, 2),   op!(Rst(0x18), 4),

    // 0xE0
    op!(LdhA8A, D8, 3),           op!(Pop(PHL), 3),          op!(LdhCA, 2),             op!(Illegal, 1),
    op!(Illegal, 1),              op!(Push(PHL), 4),         op!(AluImm(AND), D8, 2),   op!(Rst(0x20), 4),
    op!(AddSpE8, D8, 4),          op!(JpHl, 1),              op!(LdA16A, D16, 4),       op!(Illegal, 1),
    op!(Illegal, 1),              op!(Illegal, 1),           op!(AluImm(XOR), D8, 2),   op!(Rst(0x28), 4),

    // 0xF0
    op!(LdhAA8, D8, 3),           op!(Pop(PAF), 3),          op!(LdhAC, 2),             op!(Di, 1),
    op!(Illegal, 1),              op!(Push(PAF), 4),         op!(AluImm(OR), D8, 2),    op!(Rst(0x30), 4),
    op!(LdHlSpE8, D8, 3),         op!(LdSpHl, 2),            op!(LdAA16, D16, 4),       op!(Ei, 1),
    op!(Illegal, 1),              op!(Illegal, 1),           op!(AluImm(CP), D8, 2),    op!(Rst(0x38), 4),
];

/// CB-prefixed opcodes. The prefix byte and the second opcode byte are both
/// counted: register forms take 2 cycles, `BIT n,(HL)` 3, other `(HL)` forms 4.
pub(crate) static CB_TABLE: [I; 256] = cb_table();

const fn cb_table() -> [I; 256] {
    let mut table = [I::new(M::Illegal, NO, f(1)); 256];
    let mut opcode = 0;
    while opcode < 256 {
        let target = R8::from_index(opcode as u8);
        let bit = ((opcode >> 3) & 7) as u8;
        let group = opcode >> 6;

        let mnemonic = match group {
            0 => M::Shift(Shift::from_index(bit), target),
            1 => M::Bit(bit, target),
            2 => M::Res(bit, target),
            _ => M::Set(bit, target),
        };
        let cycles = match (target, group) {
            (R8::HlInd, 1) => 3,
            (R8::HlInd, _) => 4,
            _ => 2,
        };

        table[opcode] = I::new(mnemonic, NO, f(cycles));
        opcode += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::timing::Timing;

    const ILLEGAL: [u8; 11] = [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ];

    #[test]
    fn exactly_eleven_illegal_opcodes() {
        let illegal: Vec<u8> = (0..=255u8)
            .filter(|op| LOOKUP_TABLE[*op as usize].mnemonic.is_illegal())
            .collect();
        assert_eq!(illegal, ILLEGAL);
        assert!(CB_TABLE.iter().all(|instr| !instr.mnemonic.is_illegal()));
    }

    #[test]
    fn operand_bytes_fit_inside_the_cycle_budget() {
        for (opcode, instr) in LOOKUP_TABLE.iter().enumerate() {
            let min = instr.timing.cycles(false);
            assert!(
                min >= instr.len(),
                "opcode {opcode:#04X} takes {min} cycles for {} bytes",
                instr.len()
            );
        }
    }

    #[test]
    fn spot_check_encodings() {
        assert_eq!(LOOKUP_TABLE[0x2F].mnemonic, M::Cpl);
        assert_eq!(LOOKUP_TABLE[0x37].mnemonic, M::Scf);
        assert_eq!(LOOKUP_TABLE[0x3F].mnemonic, M::Ccf);
        assert_eq!(LOOKUP_TABLE[0x76].mnemonic, M::Halt);
        assert_eq!(LOOKUP_TABLE[0x87].mnemonic, M::Alu(Alu::Add, R8::A));
        assert_eq!(LOOKUP_TABLE[0xCD].timing, Timing::Fixed(6));
        assert_eq!(
            LOOKUP_TABLE[0xC0].timing,
            Timing::Branch {
                not_taken: 2,
                taken: 5
            }
        );
        assert_eq!(CB_TABLE[0x7C].mnemonic, M::Bit(7, R8::H));
        assert_eq!(CB_TABLE[0x37].mnemonic, M::Shift(Shift::Swap, R8::A));
        assert_eq!(CB_TABLE[0x46].timing, Timing::Fixed(3));
        assert_eq!(CB_TABLE[0x86].timing, Timing::Fixed(4));
        assert_eq!(CB_TABLE[0x11].timing, Timing::Fixed(2));
    }
}
