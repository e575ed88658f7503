use std::path::PathBuf;

use clap::Parser;
use gbium_core::config::PowerOnState;
use tracing::Level;

/// Headless runner for the gbium core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the cartridge image
    #[arg(required = true)]
    pub rom: PathBuf,

    /// Machine cycles to run before giving up
    #[arg(short, long, default_value_t = 1_000_000)]
    pub cycles: u64,

    /// Stop when the CPU is about to execute this address (hex, e.g. 0x0150)
    #[arg(short, long, value_parser = parse_addr)]
    pub break_at: Option<u16>,

    /// Register state to power on with (post-boot, cleared)
    #[arg(long, default_value = "post-boot")]
    pub power_on: PowerOnState,

    /// Addresses to print after the run (hex, repeatable)
    #[arg(short, long, value_parser = parse_addr)]
    pub peek: Vec<u16>,

    /// Battery RAM image to restore before running
    #[arg(long)]
    pub load_ram: Option<PathBuf>,

    /// Where to write battery RAM after the run
    #[arg(long)]
    pub save_ram: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: Level,
}

/// Accepts `0x1234`, `$1234` or bare hex.
fn parse_addr(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix('$'))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|err| format!("bad address `{s}`: {err}"))
}
