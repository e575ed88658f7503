/// Machine-cycle cost of an instruction, opcode fetch included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Timing {
    Fixed(u8),
    /// Conditional control flow. The taken path pays the extra cycles.
    Branch { not_taken: u8, taken: u8 },
}

pub(crate) const fn f(cycles: u8) -> Timing {
    Timing::Fixed(cycles)
}

pub(crate) const fn b(not_taken: u8, taken: u8) -> Timing {
    Timing::Branch { not_taken, taken }
}

impl Timing {
    #[inline]
    pub(crate) const fn cycles(&self, taken: bool) -> u8 {
        match *self {
            Timing::Fixed(c) => c,
            Timing::Branch { not_taken, taken: t } => {
                if taken {
                    t
                } else {
                    not_taken
                }
            }
        }
    }
}
