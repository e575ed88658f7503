use core::ops::{Deref, DerefMut};

/// Fixed-size, heap-backed byte storage.
///
/// Banks and the flat address space are large enough that keeping them inline
/// would make every move of `Memory` copy tens of kilobytes, so the payload is
/// always boxed.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemBlock<const N: usize>(Box<[u8; N]>);

pub mod layout {
    use crate::memory::map;

    /// The whole 16-bit address bus as one flat array.
    pub type AddressSpace = super::MemBlock<{ map::ADDRESS_SPACE_SIZE }>;
    /// One switchable 16 KiB program bank.
    pub type RomBank = super::MemBlock<{ map::ROM_BANK_SIZE }>;
    /// One switchable 8 KiB save bank.
    pub type RamBank = super::MemBlock<{ map::RAM_BANK_SIZE }>;
}

impl<const N: usize> MemBlock<N> {
    pub fn new() -> Self {
        Self::filled(0)
    }

    /// Create a block where every byte is initialized to `value`.
    #[inline]
    pub fn filled(value: u8) -> Self {
        let storage: Box<[u8; N]> = vec![value; N]
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| unreachable!("vec length is N"));
        Self(storage)
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0[..]
    }

    /// Copies as much of `data` as fits, starting at `offset`. Returns the
    /// number of bytes written.
    pub fn load(&mut self, offset: usize, data: &[u8]) -> usize {
        let Some(dst) = self.0.get_mut(offset..) else {
            return 0;
        };
        let len = dst.len().min(data.len());
        dst[..len].copy_from_slice(&data[..len]);
        len
    }
}

impl<const N: usize> Default for MemBlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for MemBlock<N> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<const N: usize> DerefMut for MemBlock<N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}
