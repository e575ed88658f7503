use crate::{error::Error, memory::map};

use super::Memory;

/// Alias for one memory-mapped register in the I/O page.
///
/// Handles bypass mapping, locks and the P1 latch: they read and write the
/// backing byte directly, so a value stored through a handle is what a later
/// read of the same address returns, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterHandle {
    addr: u16,
}

impl RegisterHandle {
    pub(super) fn new(addr: u16) -> Result<Self, Error> {
        if addr < map::IO_START {
            return Err(Error::NotARegister(addr));
        }
        Ok(Self { addr })
    }

    pub fn addr(&self) -> u16 {
        self.addr
    }

    #[inline]
    pub fn get(&self, memory: &Memory) -> u8 {
        memory.flat[self.addr as usize]
    }

    #[inline]
    pub fn set(&self, memory: &mut Memory, value: u8) {
        memory.flat[self.addr as usize] = value;
    }

    /// Read-modify-write in one call. Returns the stored value.
    pub fn update(&self, memory: &mut Memory, f: impl FnOnce(u8) -> u8) -> u8 {
        let value = f(self.get(memory));
        self.set(memory, value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Memory, Permission};

    #[test]
    fn rejects_addresses_below_the_io_page() {
        let memory = Memory::default();
        assert!(matches!(
            memory.register(0xC000),
            Err(Error::NotARegister(0xC000))
        ));
        assert!(memory.register(map::io::IE).is_ok());
    }

    #[test]
    fn handle_aliases_the_backing_byte() {
        let mut memory = Memory::default();
        let tima = memory.register(map::io::TIMA).expect("io register");

        tima.set(&mut memory, 0x42);
        assert_eq!(memory.view(Permission::Cpu).read(map::io::TIMA), 0x42);

        memory
            .view(Permission::Cpu)
            .write(map::io::TIMA, 0x17)
            .expect("tima is writable");
        assert_eq!(tima.get(&memory), 0x17);

        assert_eq!(tima.update(&mut memory, |v| v.wrapping_add(1)), 0x18);
    }
}
