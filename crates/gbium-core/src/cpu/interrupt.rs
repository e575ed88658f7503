use bitflags::bitflags;

bitflags! {
    /// Interrupt sources as laid out in `IF` (`$FF0F`) and `IE` (`$FFFF`).
    ///
    /// Lower bits win: when several sources are pending the one with the
    /// lowest bit is serviced first.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Interrupt: u8 {
        const VBLANK = 0b0000_0001;
        const STAT   = 0b0000_0010;
        const TIMER  = 0b0000_0100;
        const SERIAL = 0b0000_1000;
        const JOYPAD = 0b0001_0000;
    }
}

impl Interrupt {
    /// Highest-priority single source in `self`, if any.
    #[inline]
    pub fn highest_priority(self) -> Option<Interrupt> {
        if self.is_empty() {
            return None;
        }
        Some(Interrupt::from_bits_truncate(1 << self.bits().trailing_zeros()))
    }

    /// Service routine address for a single source.
    pub fn vector(self) -> u16 {
        0x0040 + 8 * self.bits().trailing_zeros() as u16
    }
}
