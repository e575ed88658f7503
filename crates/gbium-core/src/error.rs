/// Which bank set an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankKind {
    Rom,
    Ram,
}

impl std::fmt::Display for BankKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BankKind::Rom => f.write_str("ROM"),
            BankKind::Ram => f.write_str("RAM"),
        }
    }
}

/// Unrecoverable conditions: corrupt input or a core logic bug.
///
/// Ordinary "access not permitted" outcomes are reported through
/// [`crate::memory::AccessError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte at `pc` has no defined behaviour.
    #[error("illegal opcode {opcode:#04X} at {pc:#06X}")]
    IllegalOpcode { opcode: u8, pc: u16 },
    /// Cartridge type byte names a mapper this core does not implement.
    #[error("unsupported cartridge type {0:#04X}")]
    UnsupportedCartridge(u8),
    /// A header size code is outside the documented table.
    #[error("invalid {field} code {value:#04X} in cartridge header")]
    InvalidHeader { field: &'static str, value: u8 },
    /// `pop` issued while the stack pointer still sits at its empty-stack value.
    #[error("pop from empty stack (sp={sp:#06X}, pc={pc:#06X})")]
    StackUnderflow { sp: u16, pc: u16 },
    /// A bulk copy targeted a bank slot that does not exist.
    #[error("{kind} bank {bank} out of range ({count} banks present)")]
    BankOutOfRange {
        kind: BankKind,
        bank: usize,
        count: usize,
    },
    /// ROM image shorter than the header or the advertised bank count.
    #[error("ROM image expected at least {expected} bytes, got {actual}")]
    RomTooShort { expected: usize, actual: usize },
    /// `Memory::register` was asked for an address outside the I/O page.
    #[error("{0:#06X} is not a memory-mapped register")]
    NotARegister(u16),
    /// A save state was captured on a different cartridge board.
    #[error("save state does not fit this board: {0}")]
    StateMismatch(&'static str),
    /// Wrapper for I/O errors raised while reading images from disk.
    #[error("i/o error while reading image: {0}")]
    Io(#[from] std::io::Error),
}
