/// Position of the dispatch engine inside the current instruction.
///
/// Every call to [`super::Cpu::clock`] consumes exactly one machine cycle and
/// moves through these states:
/// `FetchOpcode -> [Fetch(1) -> Fetch(2)] -> [Execute(1) -> ...] -> FetchOpcode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Interrupt/halt arbitration and opcode read.
    #[default]
    FetchOpcode,
    /// Reading operand byte `n` (1-based).
    Fetch(u8),
    /// Wait state `n` (1-based) after the effect was applied.
    Execute(u8),
}
