use core::fmt;

/// Identity of the component holding a [`super::MemoryView`].
///
/// Only [`Permission::Cpu`] accesses are subject to the VRAM and DMA locks.
/// Taking a lock requires the permission of the hardware that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Cpu,
    Ppu,
    Dma,
    /// Loader and debugger access.
    System,
    /// Timer and divider block.
    Counter,
    /// Sprite attribute scanner.
    Oam,
}

impl Permission {
    /// Whether this accessor is gated by the CPU-side locks.
    #[inline]
    pub const fn is_lockable(self) -> bool {
        matches!(self, Permission::Cpu)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Permission::Cpu => "cpu",
            Permission::Ppu => "ppu",
            Permission::Dma => "dma",
            Permission::System => "system",
            Permission::Counter => "counter",
            Permission::Oam => "oam",
        };
        f.write_str(s)
    }
}
