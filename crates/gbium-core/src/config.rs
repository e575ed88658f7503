use core::fmt;
use std::str::FromStr;

use crate::cpu::registers::Registers;

/// Oscillator ticks per machine cycle on real hardware.
pub const DEFAULT_TICKS_PER_CYCLE: u32 = 4;

/// Register file the CPU starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerOnState {
    /// State left behind by the boot ROM; execution starts at `$0100`.
    #[default]
    PostBoot,
    /// Zeroed registers starting at `$0000`, for running a boot image.
    Cleared,
}

impl PowerOnState {
    pub fn registers(&self) -> Registers {
        match self {
            PowerOnState::PostBoot => Registers::power_on(),
            PowerOnState::Cleared => Registers::cleared(),
        }
    }
}

impl fmt::Display for PowerOnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PowerOnState::PostBoot => "post-boot",
            PowerOnState::Cleared => "cleared",
        };
        f.write_str(s)
    }
}

impl FromStr for PowerOnState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post-boot" => Ok(PowerOnState::PostBoot),
            "cleared" => Ok(PowerOnState::Cleared),
            other => Err(format!("unknown power-on state `{other}`")),
        }
    }
}

/// Runtime knobs for [`crate::Gameboy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    /// Raw ticks fed to [`crate::Gameboy::tick`] per machine cycle. Zero is
    /// treated as one.
    pub ticks_per_cycle: u32,
    pub power_on: PowerOnState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticks_per_cycle: DEFAULT_TICKS_PER_CYCLE,
            power_on: PowerOnState::default(),
        }
    }
}
