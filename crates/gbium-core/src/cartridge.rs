use std::{fs, path::Path};

use tracing::{debug, warn};

use crate::{
    error::Error,
    memory::{Memory, map},
};

use self::header::{CartridgeKind, Header};

pub mod header;

/// Bytes of real storage behind MBC2's 512 x 4-bit RAM.
const MBC2_RAM_BYTES: usize = 512;

/// Metadata of the inserted cartridge. The ROM and RAM contents themselves
/// live in [`Memory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    header: Header,
}

impl Cartridge {
    pub fn new(header: Header) -> Self {
        Self { header }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn kind(&self) -> CartridgeKind {
        self.header.kind
    }

    /// Whether save RAM should be persisted between sessions.
    pub fn has_battery(&self) -> bool {
        self.header.battery
    }

    /// Concatenate the save RAM banks for writing to disk.
    pub fn save_ram(&self, memory: &Memory) -> Vec<u8> {
        let mut out: Vec<u8> = memory
            .ram_banks()
            .iter()
            .flat_map(|bank| bank.iter().copied())
            .collect();
        if self.kind() == CartridgeKind::Mbc2 {
            out.truncate(MBC2_RAM_BYTES);
        }
        out
    }

    /// Load a battery image produced by [`Cartridge::save_ram`]. Images longer
    /// than the board's RAM are rejected.
    pub fn restore_ram(&self, memory: &mut Memory, data: &[u8]) -> Result<(), Error> {
        for (bank, chunk) in data.chunks(map::RAM_BANK_SIZE).enumerate() {
            memory.copy_ram_bank(chunk, bank)?;
        }
        debug!(bytes = data.len(), "battery ram restored");
        Ok(())
    }
}

/// Load a cartridge from an in-memory byte slice.
///
/// Bank 0 is placed in the flat address space; every 16 KiB chunk, bank 0
/// included, is copied into the matching ROM bank slot.
pub fn load_cartridge(bytes: &[u8]) -> Result<(Cartridge, Memory), Error> {
    let header = Header::parse(bytes)?;
    if !header.checksum_valid {
        warn!(
            stored = header.header_checksum,
            computed = header::checksum(bytes),
            "cartridge header checksum mismatch"
        );
    }

    let expected = header.rom_size();
    let rom = bytes.get(..expected).ok_or(Error::RomTooShort {
        expected,
        actual: bytes.len(),
    })?;

    let mut memory = Memory::for_header(&header);
    memory.dump(map::ROM_BANK_0_START, &rom[..map::ROM_BANK_SIZE]);
    for (bank, chunk) in rom.chunks(map::ROM_BANK_SIZE).enumerate() {
        memory.copy_rom_bank(chunk, bank)?;
    }

    debug!(
        title = %header.title,
        kind = %header.kind,
        rom_banks = header.rom_banks,
        ram_banks = header.ram_banks,
        battery = header.battery,
        "cartridge loaded"
    );

    Ok((Cartridge::new(header), memory))
}

/// Load only the memory image of a ROM.
pub fn load_rom(bytes: &[u8]) -> Result<Memory, Error> {
    load_cartridge(bytes).map(|(_, memory)| memory)
}

/// Load a cartridge directly from disk.
pub fn load_cartridge_from_file<P>(path: P) -> Result<(Cartridge, Memory), Error>
where
    P: AsRef<Path>,
{
    let bytes = fs::read(path)?;
    load_cartridge(&bytes)
}
