//! Cartridge header parsing.
//!
//! Every ROM image carries a fixed header at `$0100-$014F` describing the
//! title, which memory bank controller is soldered on the board, and how much
//! ROM and RAM it exposes. Only the fields needed to size the bank arrays and
//! pick a banking scheme are decoded here.
//!
//! Unsupported controllers turn into [`Error::UnsupportedCartridge`]; the core
//! never guesses at a mapper it does not implement.

use crate::{error::Error, memory::map};

/// First byte of the title field.
pub const TITLE_START: u16 = 0x0134;
/// Last byte of the title field (older carts use all 16 bytes).
pub const TITLE_END: u16 = 0x0143;
/// Cartridge type (memory bank controller + extras).
pub const CARTRIDGE_TYPE_ADDR: u16 = 0x0147;
/// ROM size code.
pub const ROM_SIZE_ADDR: u16 = 0x0148;
/// RAM size code.
pub const RAM_SIZE_ADDR: u16 = 0x0149;
/// Header checksum over `$0134-$014C`.
pub const HEADER_CHECKSUM_ADDR: u16 = 0x014D;
/// Last byte of the header.
pub const HEADER_END: u16 = 0x014F;

/// Bank switching scheme implemented by the cartridge board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CartridgeKind {
    /// 32 KiB of ROM, optionally with a single fixed RAM bank.
    #[default]
    RomOnly,
    /// Up to 2 MiB ROM / 32 KiB RAM with a five-bit ROM bank register.
    Mbc1,
    /// Up to 256 KiB ROM with 512 x 4 bits of RAM built into the controller.
    Mbc2,
}

impl CartridgeKind {
    /// Mask applied to values written to the ROM bank select range.
    pub const fn rom_bank_mask(&self) -> u8 {
        match self {
            CartridgeKind::RomOnly => 0x00,
            CartridgeKind::Mbc1 => 0x1F,
            CartridgeKind::Mbc2 => 0x0F,
        }
    }
}

impl std::fmt::Display for CartridgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CartridgeKind::RomOnly => "rom-only",
            CartridgeKind::Mbc1 => "mbc1",
            CartridgeKind::Mbc2 => "mbc2",
        };
        f.write_str(s)
    }
}

/// Decoded cartridge header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    /// Game title, trimmed of padding.
    pub title: String,
    /// Raw cartridge type byte.
    pub cartridge_type: u8,
    /// Banking scheme derived from `cartridge_type`.
    pub kind: CartridgeKind,
    /// Board has save RAM.
    pub has_ram: bool,
    /// Save RAM is battery backed and should be persisted between sessions.
    pub battery: bool,
    /// Number of 16 KiB ROM banks, bank 0 included.
    pub rom_banks: usize,
    /// Number of 8 KiB RAM banks.
    pub ram_banks: usize,
    /// Checksum stored at `$014D`.
    pub header_checksum: u8,
    /// Whether `header_checksum` matches the bytes it covers.
    pub checksum_valid: bool,
}

impl Header {
    /// Parse the header out of a ROM image. `bytes` must include at least the
    /// first `$0150` bytes of the image.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let header_len = HEADER_END as usize + 1;
        if bytes.len() < header_len {
            return Err(Error::RomTooShort {
                expected: header_len,
                actual: bytes.len(),
            });
        }

        let byte = |addr: u16| bytes[addr as usize];

        let cartridge_type = byte(CARTRIDGE_TYPE_ADDR);
        let (kind, has_ram, battery) = match cartridge_type {
            0x00 => (CartridgeKind::RomOnly, false, false),
            0x01 => (CartridgeKind::Mbc1, false, false),
            0x02 => (CartridgeKind::Mbc1, true, false),
            0x03 => (CartridgeKind::Mbc1, true, true),
            0x05 => (CartridgeKind::Mbc2, true, false),
            0x06 => (CartridgeKind::Mbc2, true, true),
            0x08 => (CartridgeKind::RomOnly, true, false),
            0x09 => (CartridgeKind::RomOnly, true, true),
            other => return Err(Error::UnsupportedCartridge(other)),
        };

        let rom_code = byte(ROM_SIZE_ADDR);
        let rom_banks = match rom_code {
            0x00..=0x08 => 2usize << rom_code,
            value => {
                return Err(Error::InvalidHeader {
                    field: "ROM size",
                    value,
                });
            }
        };

        let ram_banks = match kind {
            // MBC2 RAM lives inside the controller regardless of the size code.
            CartridgeKind::Mbc2 => 1,
            _ if !has_ram => 0,
            _ => match byte(RAM_SIZE_ADDR) {
                0x00 => 0,
                // 2 KiB parts still occupy one bank slot.
                0x01 | 0x02 => 1,
                0x03 => 4,
                0x04 => 16,
                0x05 => 8,
                value => {
                    return Err(Error::InvalidHeader {
                        field: "RAM size",
                        value,
                    });
                }
            },
        };

        let title = bytes[TITLE_START as usize..=TITLE_END as usize]
            .iter()
            .take_while(|b| **b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|b| *b as char)
            .collect::<String>()
            .trim_end()
            .to_string();

        let header_checksum = byte(HEADER_CHECKSUM_ADDR);
        let computed = checksum(bytes);

        Ok(Self {
            title,
            cartridge_type,
            kind,
            has_ram,
            battery,
            rom_banks,
            ram_banks,
            header_checksum,
            checksum_valid: computed == header_checksum,
        })
    }

    /// Total ROM size in bytes advertised by the header.
    pub fn rom_size(&self) -> usize {
        self.rom_banks * map::ROM_BANK_SIZE
    }
}

/// Header checksum as computed by the boot ROM.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes[TITLE_START as usize..HEADER_CHECKSUM_ADDR as usize]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_sub(*b).wrapping_sub(1))
}
